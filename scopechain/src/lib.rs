//! # Scopechain
//!
//! Introspection of immutable, chain-structured request contexts.
//!
//! A context is a singly-linked chain: every derived handle wraps the one it
//! was derived from and may attach one key. Scopechain recovers the history
//! that produced a handle:
//!
//! - **Keys**: every attached key, in the order it was attached
//! - **Pairs**: those keys with the value visible from the handle
//! - **Flatten**: a mapping in which the attachment closest to the handle wins
//!
//! Any type implementing [`Scope`](scope::Scope) can be inspected. The crate's
//! own [`Context`](context::Context) provides root, value and control
//! (cancel/deadline) links.
//!
//! ## Quick Start
//!
//! ```rust
//! use scopechain::prelude::*;
//!
//! let ctx = Context::background()
//!     .with_value("a", "1")
//!     .with_value("b", "2");
//! let (ctx, _cancel) = ctx.with_cancel();
//! let ctx = ctx.with_value("b", "20");
//!
//! assert_eq!(keys(Some(&ctx)), vec![&"a", &"b", &"b"]);
//! assert_eq!(flatten(Some(&ctx)).get(&"b"), Some(&Some(&"20")));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod errors;
pub mod inspect;
pub mod observability;
pub mod scope;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::InspectConfig;
    pub use crate::context::{Canceller, Context};
    pub use crate::errors::ScopeError;
    pub use crate::inspect::{
        ancestors, attached_pairs, depth, flatten, keys, local_key_of, pairs, parent_of,
        snapshot, ChainSnapshot, Inspector, Pair,
    };
    pub use crate::observability::{init_logging, LoggingConfig};
    pub use crate::scope::{ControlKind, LinkKind, RootKind, Scope};
}
