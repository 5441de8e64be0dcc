//! Guarded-accessor lazy holder: the entire accessor is one critical
//! section.
//!
//! Same inverted existence check as [`locked`](crate::locked), and therefore
//! the same observable defect: the first call returns `None`, every later
//! call constructs a fresh payload and overwrites the cache. The difference
//! is scope, not outcome. Here the whole accessor body holds the lock, so
//! calls fully serialize and throughput under contention is lower; in
//! exchange, each post-first call returns exactly the payload it constructed,
//! since no other thread can slip in between the overwrite and the read.

use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicPtr, AtomicU64, Ordering};

use crate::state::RawLock;

/// Payload constructed by a [`SerializedHolder`]. Serial numbers are unique
/// within the holder and count constructions from 0.
pub struct Instance {
   serial: u64,
}

impl Instance {
   /// Serial number of this construction.
   #[inline]
   pub fn serial(&self) -> u64 {
      self.serial
   }
}

/// Shared instance holder whose accessor body is one critical section.
pub struct SerializedHolder {
   accessed: AtomicBool,
   lock: RawLock,
   instance: AtomicPtr<Instance>,
   constructed: AtomicU64,
}

impl SerializedHolder {
   /// Creates an empty holder.
   #[inline]
   #[must_use]
   pub const fn new() -> Self {
      Self {
         accessed: AtomicBool::new(false),
         lock: RawLock::new(),
         instance: AtomicPtr::new(ptr::null_mut()),
         constructed: AtomicU64::new(0),
      }
   }

   /// Returns the cached payload, constructing a replacement first on every
   /// call after the first.
   ///
   /// Identical observable defect to [`LockedHolder::instance`]
   /// (`None` first, then a fresh payload per call), but the check, the
   /// overwrite, and the read all happen under the lock, so concurrent calls
   /// serialize completely.
   ///
   /// [`LockedHolder::instance`]: crate::locked::LockedHolder::instance
   pub fn instance(&self) -> Option<&'static Instance> {
      let _guard = self.lock.lock();
      // Plain orderings are enough below: the lock already orders everything
      // inside the critical section.
      if self.accessed.swap(true, Ordering::Relaxed) {
         let serial = self.constructed.fetch_add(1, Ordering::Relaxed);
         // Leaked on purpose; see the locked holder.
         let fresh = Box::into_raw(Box::new(Instance { serial }));
         self.instance.store(fresh, Ordering::Relaxed);
      }
      // SAFETY: Any non-null pointer in the cache came from Box::into_raw
      // above and is never deallocated.
      unsafe { self.instance.load(Ordering::Relaxed).as_ref() }
   }

   /// Number of payload constructions this holder has performed.
   #[inline]
   pub fn constructed(&self) -> u64 {
      self.constructed.load(Ordering::Relaxed)
   }
}

impl Default for SerializedHolder {
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

static HOLDER: SerializedHolder = SerializedHolder::new();

/// Returns the process-wide payload via a process-global
/// [`SerializedHolder`].
#[inline]
pub fn instance() -> Option<&'static Instance> {
   HOLDER.instance()
}
