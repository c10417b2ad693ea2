//! Observability utilities.
//!
//! Inspection emits `tracing` events at traversal boundaries; this module
//! installs a subscriber for binaries and tests that want to see them.

mod logging;

pub use logging::{init_logging, LoggingConfig, LOG_ENV, LOG_JSON_ENV};
