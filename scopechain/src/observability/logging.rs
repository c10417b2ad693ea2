//! Subscriber setup on top of `tracing-subscriber`.

use crate::errors::ScopeError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SCOPECHAIN_LOG";

/// Environment variable switching to JSON output.
pub const LOG_JSON_ENV: &str = "SCOPECHAIN_LOG_JSON";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `warn` or `scopechain=trace`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Creates a text logging configuration at the given level.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            json: false,
        }
    }

    /// Switches JSON output on or off.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::InvalidConfig` if `SCOPECHAIN_LOG_JSON` is not a
    /// boolean.
    pub fn from_env() -> Result<Self, ScopeError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::InvalidConfig` for a malformed JSON switch.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScopeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(LOG_ENV).filter(|l| !l.trim().is_empty()) {
            config.level = level.trim().to_string();
        }

        if let Some(raw) = lookup(LOG_JSON_ENV) {
            config.json = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "" | "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(ScopeError::invalid_config(
                        LOG_JSON_ENV,
                        format!("expected a boolean, got '{other}'"),
                    ))
                }
            };
        }

        Ok(config)
    }

    /// Builds the filter for this configuration. `RUST_LOG` takes precedence.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::InvalidConfig` if the level is not a valid
    /// filter directive.
    pub fn env_filter(&self) -> Result<EnvFilter, ScopeError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.level)
            .map_err(|err| ScopeError::invalid_config("level", err.to_string()))
    }
}

/// Installs a global `fmt` subscriber for the given configuration.
///
/// A subscriber that is already installed is left in place.
///
/// # Errors
///
/// Returns `ScopeError::InvalidConfig` if the filter directive is malformed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ScopeError> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(err) = installed {
        tracing::debug!(error = %err, "Global subscriber already installed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert!(!config.json);
    }

    #[test]
    fn test_from_lookup() {
        let config = LoggingConfig::from_lookup(|name| match name {
            LOG_ENV => Some("scopechain=trace".to_string()),
            LOG_JSON_ENV => Some("TRUE".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config, LoggingConfig::new("scopechain=trace").with_json(true));
    }

    // Only test that touches SCOPECHAIN_LOG and SCOPECHAIN_LOG_JSON.
    #[test]
    fn test_from_env() {
        std::env::set_var(LOG_ENV, "scopechain=debug");
        std::env::set_var(LOG_JSON_ENV, "on");
        let configured = LoggingConfig::from_env();

        std::env::set_var(LOG_JSON_ENV, "maybe");
        let malformed = LoggingConfig::from_env();

        std::env::remove_var(LOG_ENV);
        std::env::remove_var(LOG_JSON_ENV);
        let unset = LoggingConfig::from_env();

        assert_eq!(
            configured.unwrap(),
            LoggingConfig::new("scopechain=debug").with_json(true)
        );
        assert!(matches!(malformed, Err(ScopeError::InvalidConfig { .. })));
        assert_eq!(unset.unwrap(), LoggingConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_json_switch() {
        let result = LoggingConfig::from_lookup(|name| {
            (name == LOG_JSON_ENV).then(|| "sometimes".to_string())
        });

        assert!(matches!(result, Err(ScopeError::InvalidConfig { .. })));
    }

    #[test]
    fn test_init_logging_twice() {
        let config = LoggingConfig::new("scopechain=debug");
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }
}
