//! Tracing/logging setup shared by dashboard hosts.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{init, init_with};
