//! Core error model.

use thiserror::Error;

/// Result type used across the core crates.
pub type CoreResult<T> = Result<T, CoreError>;

/// Core-level error.
///
/// Keep this focused on deterministic failures (malformed ids, bad
/// configuration). Access decisions never produce errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A configuration variable held an unusable value.
    #[error("invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },
}

impl CoreError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
