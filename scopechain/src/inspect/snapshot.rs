//! Serializable view of a context chain.

use crate::errors::ScopeError;
use crate::scope::LinkKind;
use serde::Serialize;

/// One link of a [`ChainSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSnapshot<'a, K, V> {
    /// Position in construction order. The root-most visible link is 0.
    pub depth: usize,
    /// What the link is.
    pub kind: LinkKind,
    /// The key attached at this link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'a K>,
    /// The value visible for `key` from the leaf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a V>,
}

/// The links of a chain in construction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSnapshot<'a, K, V> {
    /// Links, root-most first.
    pub links: Vec<LinkSnapshot<'a, K, V>>,
}

impl<'a, K, V> ChainSnapshot<'a, K, V> {
    /// Creates a snapshot from links in construction order.
    #[must_use]
    pub fn new(links: Vec<LinkSnapshot<'a, K, V>>) -> Self {
        Self { links }
    }

    /// Returns the number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if no link was visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns the links that attach a key.
    pub fn keyed(&self) -> impl Iterator<Item = &LinkSnapshot<'a, K, V>> {
        self.links.iter().filter(|link| link.key.is_some())
    }
}

impl<K: Serialize, V: Serialize> ChainSnapshot<'_, K, V> {
    /// Serializes the snapshot to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::Serialization` if a key or value fails to
    /// serialize.
    pub fn to_json(&self) -> Result<String, ScopeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the snapshot to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::Serialization` if a key or value fails to
    /// serialize.
    pub fn to_value(&self) -> Result<serde_json::Value, ScopeError> {
        Ok(serde_json::to_value(self)?)
    }
}
