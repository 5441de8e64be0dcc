//! One-time-initialization cell.
//!
//! [`InitCell<T>`] is a thread-safe cell written at most once. It backs the
//! initialization-on-demand holder and stands on its own wherever a value
//! must be constructed exactly once across arbitrarily many concurrent first
//! callers. The fast path (reading an initialized cell) is a single atomic
//! load; threads only park while another thread's initializer is running.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::fmt;
use core::sync::atomic::Ordering;

use crate::state::InitState;

/// A thread-safe cell which can be written to only once.
///
/// When several threads race to initialize the cell, exactly one initializer
/// runs; the losers park until the value is published and then every caller
/// observes the same reference for the rest of the process lifetime.
///
/// # Examples
///
/// ```rust
/// use once_singleton::InitCell;
///
/// static NAME: InitCell<String> = InitCell::new();
///
/// NAME.get_or_init(|| "production".to_string());
///
/// // Later calls return the same value without re-running the initializer.
/// assert_eq!(NAME.get().map(String::as_str), Some("production"));
/// ```
pub struct InitCell<T> {
   value: UnsafeCell<MaybeUninit<T>>,
   state: InitState,
}

impl<T> InitCell<T> {
   /// Creates a new, empty cell.
   #[inline]
   #[must_use]
   pub const fn new() -> Self {
      Self {
         value: UnsafeCell::new(MaybeUninit::uninit()),
         state: InitState::new(),
      }
   }

   /// Creates a cell already initialized with `value`.
   #[inline]
   #[must_use]
   pub const fn with_value(value: T) -> Self {
      Self {
         value: UnsafeCell::new(MaybeUninit::new(value)),
         state: InitState::initialized(),
      }
   }

   /// Checks whether the cell holds a value. Never blocks.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.state.is_initialized(Ordering::Acquire)
   }

   /// Returns the value if initialized, `None` otherwise. Never blocks.
   #[inline]
   pub fn get(&self) -> Option<&T> {
      if self.is_initialized() {
         // SAFETY: The Acquire load in is_initialized() synchronizes with the
         // Release store that published the value.
         Some(unsafe { self.get_unchecked() })
      } else {
         None
      }
   }

   /// Returns the value without checking initialization.
   ///
   /// # Safety
   ///
   /// The cell must be initialized. Calling this on an empty cell is
   /// undefined behavior.
   #[inline]
   pub unsafe fn get_unchecked(&self) -> &T {
      debug_assert!(
         self.is_initialized(),
         "get_unchecked called on an empty InitCell"
      );
      (*self.value.get()).assume_init_ref()
   }

   /// Returns the value, running `f` to construct it if the cell is empty.
   ///
   /// If multiple threads call this concurrently, only one initializer runs;
   /// the rest block until the value is published and then all observe the
   /// same reference.
   #[inline]
   pub fn get_or_init<F>(&self, f: F) -> &T
   where
      F: FnOnce() -> T,
   {
      if let Some(value) = self.get() {
         return value;
      }
      self.initialize(f);
      // SAFETY: initialize() only returns once the cell is initialized.
      unsafe { self.get_unchecked() }
   }

   /// Fallible counterpart of [`get_or_init`](Self::get_or_init).
   ///
   /// On `Err` the cell stays empty and a later call may retry; nothing is
   /// cached from a failed attempt.
   pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
   where
      F: FnOnce() -> Result<T, E>,
   {
      if let Some(value) = self.get() {
         return Ok(value);
      }
      self.try_initialize(f)?;
      debug_assert!(self.is_initialized());
      // SAFETY: try_initialize() returned Ok, so the cell is initialized.
      Ok(unsafe { self.get_unchecked() })
   }

   /// Cold path for `get_or_init`.
   #[cold]
   fn initialize<F>(&self, f: F)
   where
      F: FnOnce() -> T,
   {
      let Some(guard) = self.state.lock() else {
         return; // another thread initialized it while we waited
      };
      // SAFETY: Holding the guard gives exclusive access to the slot.
      unsafe { (*self.value.get()).write(f()) };
      guard.commit();
   }

   /// Cold path for `get_or_try_init`.
   #[cold]
   fn try_initialize<F, E>(&self, f: F) -> Result<(), E>
   where
      F: FnOnce() -> Result<T, E>,
   {
      let Some(guard) = self.state.lock() else {
         return Ok(()); // another thread initialized it while we waited
      };
      let value = f()?; // on Err the guard drops and resets the state
      // SAFETY: Holding the guard gives exclusive access to the slot.
      unsafe { (*self.value.get()).write(value) };
      guard.commit();
      Ok(())
   }

   /// Takes the value out of the cell by consuming it.
   #[inline]
   pub fn into_inner(mut self) -> Option<T> {
      if self.is_initialized() {
         // Reset the state first so Drop does not free the value again.
         self.state = InitState::new();
         // SAFETY: The cell was initialized and we own it.
         Some(unsafe { self.value.get_mut().assume_init_read() })
      } else {
         None
      }
   }
}

// SAFETY: Publication of the value from one thread to readers on others is
// ordered by the state machine, so the usual cell bounds apply: readers see
// &T (T: Sync) and a value written by one thread may be dropped by another
// (T: Send).
unsafe impl<T: Sync + Send> Sync for InitCell<T> {}
// SAFETY: Ownership of T moves with the cell.
unsafe impl<T: Send> Send for InitCell<T> {}

impl<T> Default for InitCell<T> {
   /// Creates a new, empty cell.
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

impl<T: fmt::Debug> fmt::Debug for InitCell<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("InitCell");
      match self.get() {
         Some(v) => d.field(v),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}

impl<T> From<T> for InitCell<T> {
   /// Creates an initialized cell holding `value`.
   #[inline]
   fn from(value: T) -> Self {
      Self::with_value(value)
   }
}

impl<T> Drop for InitCell<T> {
   #[inline]
   fn drop(&mut self) {
      if self.is_initialized() {
         // SAFETY: Exclusive access, the cell is initialized, and the value
         // is never read again.
         unsafe { self.value.get_mut().assume_init_drop() };
      }
   }
}
