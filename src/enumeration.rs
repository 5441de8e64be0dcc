//! Single-value enumeration holder.
//!
//! The payload is a closed enumeration with exactly one member, so the type
//! system itself guarantees that exactly one value of the type can exist.
//! The member is constructed before first observable use with no explicit
//! synchronization.

/// A closed enumeration with exactly one member.
#[derive(Debug)]
pub enum Singleton {
   /// The one permitted value.
   Instance,
}

impl Singleton {
   /// Placeholder for caller-supplied behavior.
   ///
   /// Accepts any string-like value and has no observable effect: it never
   /// panics, mutates no shared state, and returns nothing.
   #[inline]
   pub fn execute(&self, _value: impl AsRef<str>) {}
}

static INSTANCE: Singleton = Singleton::Instance;

/// Returns the process-wide enumeration member.
///
/// The member is reference-identical across all access points.
///
/// # Examples
///
/// ```rust
/// use once_singleton::enumeration;
///
/// let singleton = enumeration::instance();
/// singleton.execute("anything");
/// assert!(std::ptr::eq(singleton, enumeration::instance()));
/// ```
#[inline]
pub fn instance() -> &'static Singleton {
   &INSTANCE
}
