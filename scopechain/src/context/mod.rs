//! Context handles.
//!
//! This module provides:
//! - The immutable [`Context`] chain with root, value and control links
//! - The [`Canceller`] handed out with every control link

mod cancel;
mod chain;
#[cfg(test)]
mod context_tests;

pub use cancel::{CancelCallback, Canceller};
pub use chain::Context;
