//! Initialization-on-demand holder.
//!
//! The payload lives in a one-time cell that is first touched inside
//! [`instance`], so construction happens on first access and the cell's own
//! guarantee makes it happen exactly once, even when many threads make their
//! first call concurrently. This is the only lazy holder with a lock-free
//! hot path: after initialization, `instance()` is a single atomic load.

use crate::cell::InitCell;

/// The lazily constructed payload.
pub struct Instance {
   _private: (),
}

impl Instance {
   fn new() -> Self {
      Self { _private: () }
   }
}

// The nested container: referenced for the first time inside `instance()`,
// never earlier.
static HOLDER: InitCell<Instance> = InitCell::new();

/// Returns the process-wide instance, constructing it on first call.
///
/// Concurrent first callers race to run the initializer; exactly one
/// construction happens and every caller observes that same reference.
/// Calls after initialization never block.
///
/// # Examples
///
/// ```rust
/// use once_singleton::on_demand;
///
/// assert!(std::ptr::eq(on_demand::instance(), on_demand::instance()));
/// ```
#[inline]
pub fn instance() -> &'static Instance {
   HOLDER.get_or_init(Instance::new)
}
