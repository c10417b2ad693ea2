//! Error types for scopechain.
//!
//! Chain inspection itself never fails: a missing handle, a missing parent and
//! a missing key are all reported as `None` or an empty collection. The errors
//! below only come from the surfaces around the core (configuration and
//! snapshot serialization).

use thiserror::Error;

/// The main error type for scopechain operations.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// A configuration value could not be accepted.
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig {
        /// The offending field or environment variable.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Serialization of a chain snapshot failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScopeError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ScopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
