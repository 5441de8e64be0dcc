//! Five single-instance access strategies built around one-time
//! initialization under contention.
//!
//! Each module is an independent "shared instance holder": a process-wide
//! cell that hands out at most one payload instance (or tries to). The
//! strategies differ in when the instance is created and in what concurrent
//! callers are guaranteed to observe:
//!
//! - [`eager`]: constructed at load time; zero synchronization on access.
//! - [`locked`]: lazy, with a critical section around the construction step
//!   only. Faithfully reproduces an inverted-check double-checked-locking
//!   defect: the first call yields nothing, every later call builds a fresh
//!   instance.
//! - [`serialized`]: lazy, with the whole accessor inside the critical
//!   section. Same inverted-check defect, lower throughput under contention.
//! - [`on_demand`]: lazy through a one-time cell; constructed exactly once
//!   on first access, lock-free reads afterwards.
//! - [`enumeration`]: a single-member enum, unique by the type system, with
//!   a no-op `execute` hook.
//!
//! The one-time machinery itself is exposed as [`InitCell`]. It packs its
//! state into one atomic byte and uses `parking_lot_core`'s futex-style
//! parking: reads of an initialized cell are lock-free, and threads park
//! only while an initializer is running.
//!
//! # Examples
//!
//! The correct holders always agree with themselves:
//!
//! ```rust
//! use once_singleton::{eager, on_demand};
//!
//! assert!(std::ptr::eq(eager::instance(), eager::instance()));
//! assert!(std::ptr::eq(on_demand::instance(), on_demand::instance()));
//! ```
//!
//! The inverted-check holders are broken by design — nothing on the first
//! call, a fresh instance on every call after it:
//!
//! ```rust
//! use once_singleton::locked::LockedHolder;
//!
//! let holder = LockedHolder::new();
//! assert!(holder.instance().is_none());
//!
//! let second = holder.instance().unwrap();
//! let third = holder.instance().unwrap();
//! assert!(!std::ptr::eq(second, third));
//! ```

/// One-time-initialization cell.
pub mod cell;

/// Eager holder.
pub mod eager;

/// Single-member enumeration holder.
pub mod enumeration;

/// Explicit-lock lazy holder (broken by design).
pub mod locked;

/// Initialization-on-demand holder.
pub mod on_demand;

/// Guarded-accessor lazy holder (broken by design).
pub mod serialized;

/// Internal synchronization state management.
mod state;

pub use cell::InitCell;
