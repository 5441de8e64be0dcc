use std::ptr;
use std::sync::Barrier;
use std::thread;

use once_singleton::eager;

#[test]
fn test_sequential_calls_are_idempotent() {
   let first = eager::instance();
   for _ in 0..5 {
      assert!(ptr::eq(first, eager::instance()));
   }
}

#[test]
fn test_hundred_threads_observe_one_instance() {
   let barrier = Barrier::new(100);

   thread::scope(|s| {
      let handles: Vec<_> = (0..100)
         .map(|_| {
            s.spawn(|| {
               barrier.wait();
               eager::instance()
            })
         })
         .collect();

      let expected = eager::instance();
      for handle in handles {
         assert!(ptr::eq(handle.join().unwrap(), expected));
      }
   });
}
