//! Internal synchronization primitives for the instance holders.
//!
//! Everything here is built on a single `AtomicU8` plus `parking_lot_core`'s
//! futex-style park/unpark, keyed on the atomic's address:
//!
//! - [`InitState`] is the one-time-initialization state machine behind
//!   [`InitCell`](crate::cell::InitCell). Bit 0: the cell holds a value.
//!   Bit 1: a thread holds the initialization lock. Bit 2: at least one
//!   thread is parked waiting for the outcome.
//! - [`RawLock`] is a plain mutual-exclusion lock for the holders whose
//!   contract is an explicit critical section rather than one-time
//!   initialization.
//!
//! Reads of an initialized cell stay lock-free; threads only park while
//! another thread is running an initializer or sitting in a critical
//! section.

use core::mem;
use core::sync::atomic::{AtomicU8, Ordering};

use parking_lot_core::{DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};

/// Parks the calling thread while `state` still reads `expected`.
#[inline]
fn wait(state: &AtomicU8, expected: u8) {
   // SAFETY: The park key is the address of `state`, matching `notify_all`.
   unsafe {
      // park() re-checks the condition before sleeping and only sleeps while
      // the state still equals `expected`. Wake-ups may be spurious; callers
      // re-check in their own loops.
      let _ = parking_lot_core::park(
         state.as_ptr() as usize,
         || state.load(Ordering::Acquire) == expected,
         || {},
         |_, _| {},
         DEFAULT_PARK_TOKEN,
         None,
      );
   }
}

/// Wakes every thread parked on `state`.
#[inline]
fn notify_all(state: &AtomicU8) {
   // SAFETY: Same key as `wait`.
   unsafe {
      parking_lot_core::unpark_all(state.as_ptr() as usize, DEFAULT_UNPARK_TOKEN);
   }
}

/// Atomic state for one-time initialization.
#[repr(transparent)]
pub(crate) struct InitState(AtomicU8);

impl InitState {
   /// Bit flag: the cell holds an initialized value.
   const INITIALIZED: u8 = 1;
   /// Bit flag: a thread holds the initialization lock.
   const LOCKED: u8 = 2;
   /// Bit flag: at least one thread is parked waiting for the outcome.
   const WAITING: u8 = 4;

   /// State of an empty cell.
   #[inline]
   pub(crate) const fn new() -> Self {
      Self(AtomicU8::new(0))
   }

   /// State of a cell that already holds a value.
   #[inline]
   pub(crate) const fn initialized() -> Self {
      Self(AtomicU8::new(Self::INITIALIZED))
   }

   #[inline]
   pub(crate) fn is_initialized(&self, ordering: Ordering) -> bool {
      self.0.load(ordering) & Self::INITIALIZED != 0
   }

   /// Publishes the value: marks the cell initialized and wakes any parked
   /// threads. Only called while holding the initialization lock.
   fn complete(&self) {
      // Release pairs with the Acquire load in `is_initialized`, ordering the
      // value write before the flag becomes visible.
      let prev = self.0.swap(Self::INITIALIZED, Ordering::Release);
      if prev & Self::WAITING != 0 {
         notify_all(&self.0);
      }
   }

   /// Releases the lock without publishing, waking parked threads so one of
   /// them can retry. Runs when an initializer fails or panics.
   fn abort(&self) {
      let prev = self.0.swap(0, Ordering::Release);
      if prev & Self::WAITING != 0 {
         notify_all(&self.0);
      }
   }

   /// One attempt at acquiring the initialization lock.
   ///
   /// - `Ok(None)`: the cell is already initialized.
   /// - `Ok(Some(guard))`: lock acquired.
   /// - `Err(state)`: another thread holds the lock; `state` is the value to
   ///   park against (WAITING set).
   fn lock_step(&self) -> Result<Option<InitGuard<'_>>, u8> {
      loop {
         let state = self.0.load(Ordering::Relaxed);
         if state & Self::INITIALIZED != 0 {
            return Ok(None);
         }
         if state & Self::LOCKED == 0 {
            match self.0.compare_exchange_weak(
               state,
               state | Self::LOCKED,
               Ordering::Acquire,
               Ordering::Relaxed,
            ) {
               Ok(_) => return Ok(Some(InitGuard { state: self })),
               Err(_) => {
                  core::hint::spin_loop();
                  continue;
               }
            }
         }
         if state & Self::WAITING == 0 {
            match self.0.compare_exchange_weak(
               state,
               state | Self::WAITING,
               Ordering::Relaxed,
               Ordering::Relaxed,
            ) {
               Ok(_) => return Err(state | Self::WAITING),
               Err(_) => {
                  core::hint::spin_loop();
                  continue;
               }
            }
         }
         return Err(state);
      }
   }

   /// Acquires the initialization lock, parking while another thread holds
   /// it. Returns `None` once the cell is initialized.
   pub(crate) fn lock(&self) -> Option<InitGuard<'_>> {
      match self.lock_step() {
         Ok(guard) => guard,
         Err(mut observed) => loop {
            wait(&self.0, observed);
            match self.lock_step() {
               Ok(guard) => return guard,
               Err(state) => observed = state,
            }
         },
      }
   }
}

/// RAII guard for the initialization lock.
///
/// Dropping the guard without calling [`commit`](Self::commit) aborts the
/// attempt: the state resets to empty and another thread may retry.
pub(crate) struct InitGuard<'a> {
   state: &'a InitState,
}

impl InitGuard<'_> {
   /// Marks initialization complete, consumes the guard, wakes waiters.
   #[inline]
   pub(crate) fn commit(self) {
      self.state.complete();
      mem::forget(self); // skip Drop, which would reset the state
   }
}

impl Drop for InitGuard<'_> {
   #[inline]
   fn drop(&mut self) {
      self.state.abort();
   }
}

/// Mutual-exclusion lock for holders that serialize their accessor.
#[repr(transparent)]
pub(crate) struct RawLock(AtomicU8);

impl RawLock {
   /// Bit flag: a thread is inside the critical section.
   const LOCKED: u8 = 1;
   /// Bit flag: at least one thread is parked waiting for the lock.
   const WAITING: u8 = 2;

   #[inline]
   pub(crate) const fn new() -> Self {
      Self(AtomicU8::new(0))
   }

   /// Enters the critical section, parking while another thread holds it.
   pub(crate) fn lock(&self) -> LockGuard<'_> {
      loop {
         let state = self.0.load(Ordering::Relaxed);
         if state & Self::LOCKED == 0 {
            if self
               .0
               .compare_exchange_weak(
                  state,
                  state | Self::LOCKED,
                  Ordering::Acquire,
                  Ordering::Relaxed,
               )
               .is_ok()
            {
               return LockGuard { lock: self };
            }
            core::hint::spin_loop();
            continue;
         }
         if state & Self::WAITING == 0
            && self
               .0
               .compare_exchange_weak(
                  state,
                  state | Self::WAITING,
                  Ordering::Relaxed,
                  Ordering::Relaxed,
               )
               .is_err()
         {
            core::hint::spin_loop();
            continue;
         }
         wait(&self.0, Self::LOCKED | Self::WAITING);
      }
   }

   fn unlock(&self) {
      let prev = self.0.swap(0, Ordering::Release);
      if prev & Self::WAITING != 0 {
         notify_all(&self.0);
      }
   }
}

/// RAII guard for [`RawLock`]; releases the lock on drop.
pub(crate) struct LockGuard<'a> {
   lock: &'a RawLock,
}

impl Drop for LockGuard<'_> {
   #[inline]
   fn drop(&mut self) {
      self.lock.unlock();
   }
}
