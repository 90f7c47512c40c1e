//! Framer Builder API modules
//!
//! Fluent configuration of blocking and async framers.

pub mod core;

pub use self::core::*;
