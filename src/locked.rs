//! Explicit-lock lazy holder, with the construction step in a critical
//! section.
//!
//! This holder reproduces a broken double-checked locking idiom: the
//! existence check guarding construction is inverted. It asks "has this
//! holder been accessed before?" instead of "is the payload missing?", so
//! the first call returns `None` without constructing anything, and every
//! later call builds a **fresh** payload under the lock and overwrites the
//! cache. The single-instance invariant is never upheld past the first call.
//!
//! The behavior is preserved on purpose so it can be characterized by tests;
//! see [`on_demand`](crate::on_demand) for a holder that initializes exactly
//! once.

use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicPtr, AtomicU64, Ordering};

use crate::state::RawLock;

/// Payload constructed by a [`LockedHolder`].
///
/// Every construction receives a serial number unique within its holder,
/// which makes replacement instances distinguishable by more than their
/// address.
pub struct Instance {
   serial: u64,
}

impl Instance {
   /// Serial number of this construction, starting at 0 for the first
   /// payload the holder ever builds.
   #[inline]
   pub fn serial(&self) -> u64 {
      self.serial
   }
}

/// Shared instance holder whose construction step runs inside an explicit
/// critical section.
pub struct LockedHolder {
   accessed: AtomicBool,
   lock: RawLock,
   instance: AtomicPtr<Instance>,
   constructed: AtomicU64,
}

impl LockedHolder {
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
   /// The first call returns `None`: the inverted existence check sees a
   /// holder that has never been accessed and skips construction entirely.
   /// Every later call constructs a fresh payload inside the critical
   /// section, overwrites the cache, and returns whatever the cache holds
   /// by the time it is read back (the read itself is outside the lock).
   pub fn instance(&self) -> Option<&'static Instance> {
      // Inverted check: construction is guarded by "accessed before", not by
      // "payload missing". Only the overwrite is serialized.
      if self.accessed.swap(true, Ordering::AcqRel) {
         let _guard = self.lock.lock();
         let serial = self.constructed.fetch_add(1, Ordering::Relaxed);
         // Replaced payloads are leaked: callers hold plain references with
         // process lifetime, so nothing may ever be freed.
         let fresh = Box::into_raw(Box::new(Instance { serial }));
         self.instance.store(fresh, Ordering::Release);
      }
      // SAFETY: Any non-null pointer in the cache came from Box::into_raw
      // above and is never deallocated.
      unsafe { self.instance.load(Ordering::Acquire).as_ref() }
   }

   /// Number of payload constructions this holder has performed.
   ///
   /// A correct holder would never report more than 1; this one reports one
   /// construction per call after the first.
   #[inline]
   pub fn constructed(&self) -> u64 {
      self.constructed.load(Ordering::Relaxed)
   }
}

impl Default for LockedHolder {
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

static HOLDER: LockedHolder = LockedHolder::new();

/// Returns the process-wide payload via a process-global [`LockedHolder`].
///
/// Carries the same deliberately broken contract as
/// [`LockedHolder::instance`].
#[inline]
pub fn instance() -> Option<&'static Instance> {
   HOLDER.instance()
}
