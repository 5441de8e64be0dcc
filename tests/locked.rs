use std::ptr;
use std::sync::Barrier;
use std::thread;

use once_singleton::locked::{self, LockedHolder};

#[test]
fn test_first_call_returns_nothing() {
   let holder = LockedHolder::new();
   assert!(holder.instance().is_none());
   assert_eq!(holder.constructed(), 0);
}

#[test]
fn test_every_later_call_constructs_a_replacement() {
   let holder = LockedHolder::new();
   assert!(holder.instance().is_none());

   let second = holder.instance().expect("second call must return a payload");
   let third = holder.instance().expect("third call must return a payload");

   // Not a singleton: the third call replaced the second call's payload
   assert!(!ptr::eq(second, third));
   assert_ne!(second.serial(), third.serial());
   assert_eq!(holder.constructed(), 2);

   // Old references stay valid after being replaced
   assert_eq!(second.serial(), 0);
   assert_eq!(third.serial(), 1);
}

#[test]
fn test_contended_calls_each_construct() {
   let holder = LockedHolder::new();
   // Priming call, single-threaded: trips the inverted check
   assert!(holder.instance().is_none());

   let barrier = Barrier::new(100);
   thread::scope(|s| {
      for _ in 0..100 {
         s.spawn(|| {
            barrier.wait();
            holder
               .instance()
               .expect("a primed holder must return a payload");
         });
      }
   });

   // Every concurrent call built a replacement instance
   assert_eq!(holder.constructed(), 100);
}

#[test]
fn test_global_accessor_shares_the_defect() {
   assert!(locked::instance().is_none());
   let second = locked::instance().expect("second call must return a payload");
   let third = locked::instance().expect("third call must return a payload");
   assert!(!ptr::eq(second, third));
}
