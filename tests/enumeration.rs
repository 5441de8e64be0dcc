use std::ptr;
use std::sync::Barrier;
use std::thread;

use once_singleton::enumeration::{self, Singleton};

#[test]
fn test_member_is_identical_across_access_points() {
   let first = enumeration::instance();
   for _ in 0..5 {
      assert!(ptr::eq(first, enumeration::instance()));
   }
}

#[test]
fn test_execute_accepts_any_string_like_value() {
   let singleton = enumeration::instance();
   singleton.execute("anything");
   singleton.execute(String::from("owned"));
   singleton.execute(&String::from("borrowed"));
}

#[test]
fn test_pattern_matching_covers_the_single_member() {
   match enumeration::instance() {
      Singleton::Instance => {}
   }
}

#[test]
fn test_hundred_threads_observe_one_member() {
   let barrier = Barrier::new(100);

   thread::scope(|s| {
      let handles: Vec<_> = (0..100)
         .map(|_| {
            s.spawn(|| {
               barrier.wait();
               let singleton = enumeration::instance();
               singleton.execute("stress");
               singleton
            })
         })
         .collect();

      let expected = enumeration::instance();
      for handle in handles {
         assert!(ptr::eq(handle.join().unwrap(), expected));
      }
   });
}
