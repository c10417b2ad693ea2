//! Testing utilities for context chains.
//!
//! This module provides:
//! - Assertions for the consistency guarantees of inspection
//! - A fixture for building chains with control links

mod assertions;
mod fixtures;

pub use assertions::{assert_chain_consistent, assert_keys, assert_mapping};
pub use fixtures::ChainFixture;
