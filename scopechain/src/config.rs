//! Configuration for chain inspection.

use crate::errors::ScopeError;
use serde::{Deserialize, Serialize};

/// Environment variable holding the traversal depth limit.
pub const MAX_DEPTH_ENV: &str = "SCOPECHAIN_MAX_DEPTH";

/// Settings applied by an [`Inspector`](crate::inspect::Inspector).
///
/// The default is an unbounded traversal, which is what the free functions in
/// [`inspect`](crate::inspect) use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Maximum number of links visited from the leaf. `None` walks to the root.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl InspectConfig {
    /// Creates an unbounded configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unbounded configuration.
    #[must_use]
    pub fn unbounded() -> Self {
        Self { max_depth: None }
    }

    /// Sets the maximum traversal depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::InvalidConfig` if `SCOPECHAIN_MAX_DEPTH` is set to
    /// something other than a positive integer.
    pub fn from_env() -> Result<Self, ScopeError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::InvalidConfig` if the depth limit is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScopeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_depth = match lookup(MAX_DEPTH_ENV) {
            Some(raw) if !raw.trim().is_empty() => {
                let depth = raw.trim().parse::<usize>().map_err(|err| {
                    ScopeError::invalid_config(MAX_DEPTH_ENV, format!("'{raw}': {err}"))
                })?;
                Some(depth)
            }
            _ => None,
        };

        let config = Self { max_depth };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::InvalidConfig` for a zero depth limit.
    pub fn validate(&self) -> Result<(), ScopeError> {
        if self.max_depth == Some(0) {
            return Err(ScopeError::invalid_config(
                "max_depth",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
