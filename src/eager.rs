//! Eager holder: the instance exists before any caller can run.
//!
//! The payload is bound to a `static` with a constant initializer, so it is
//! fully constructed before [`instance`] can be called from any thread. No
//! caller can race with construction, and no access path pays any
//! synchronization cost.

/// The eagerly constructed payload. It carries no state; its identity is the
/// whole contract.
pub struct Instance {
   _private: (),
}

static INSTANCE: Instance = Instance { _private: () };

/// Returns the process-wide instance.
///
/// Every call, from every thread, returns a reference to the same static
/// payload.
///
/// # Examples
///
/// ```rust
/// use once_singleton::eager;
///
/// assert!(std::ptr::eq(eager::instance(), eager::instance()));
/// ```
#[inline]
pub fn instance() -> &'static Instance {
   &INSTANCE
}
