use std::collections::HashSet;
use std::ptr;
use std::sync::Barrier;
use std::thread;

use once_singleton::serialized::{self, SerializedHolder};

#[test]
fn test_first_call_returns_nothing() {
   let holder = SerializedHolder::new();
   assert!(holder.instance().is_none());
   assert_eq!(holder.constructed(), 0);
}

#[test]
fn test_every_later_call_constructs_a_replacement() {
   let holder = SerializedHolder::new();
   assert!(holder.instance().is_none());

   let second = holder.instance().expect("second call must return a payload");
   let third = holder.instance().expect("third call must return a payload");

   assert!(!ptr::eq(second, third));
   assert_ne!(second.serial(), third.serial());
   assert_eq!(holder.constructed(), 2);
}

#[test]
fn test_contended_calls_return_pairwise_distinct_payloads() {
   let holder = SerializedHolder::new();
   // Priming call, single-threaded: trips the inverted check
   assert!(holder.instance().is_none());

   let barrier = Barrier::new(100);
   let serials = thread::scope(|s| {
      let handles: Vec<_> = (0..100)
         .map(|_| {
            s.spawn(|| {
               barrier.wait();
               holder
                  .instance()
                  .expect("a primed holder must return a payload")
                  .serial()
            })
         })
         .collect();

      handles
         .into_iter()
         .map(|handle| handle.join().unwrap())
         .collect::<Vec<_>>()
   });

   // The accessor serializes completely, so each call returns exactly the
   // payload it constructed: all 100 results are pairwise distinct.
   let distinct: HashSet<u64> = serials.iter().copied().collect();
   assert_eq!(distinct.len(), 100);
   assert_eq!(holder.constructed(), 100);
}

#[test]
fn test_global_accessor_shares_the_defect() {
   assert!(serialized::instance().is_none());
   let second = serialized::instance().expect("second call must return a payload");
   let third = serialized::instance().expect("third call must return a payload");
   assert!(!ptr::eq(second, third));
}
