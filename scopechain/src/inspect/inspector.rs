//! Configured chain traversal.

use super::{ancestors, ChainSnapshot, LinkSnapshot, Pair};
use crate::config::InspectConfig;
use crate::errors::ScopeError;
use crate::scope::Scope;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{trace, warn};

/// Runs the inspection operations under an [`InspectConfig`].
///
/// With a `max_depth`, at most that many links are visited starting at the
/// leaf, and the last visited link is treated as the root of the visible
/// chain. Value lookups still belong to the leaf handle and are not limited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inspector {
    config: InspectConfig,
}

impl Inspector {
    /// Creates an inspector with the given configuration.
    #[must_use]
    pub const fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    /// Creates an inspector that walks whole chains.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            config: InspectConfig { max_depth: None },
        }
    }

    /// Creates an inspector configured from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::InvalidConfig` for a malformed depth limit.
    pub fn from_env() -> Result<Self, ScopeError> {
        InspectConfig::from_env().map(Self::new)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &InspectConfig {
        &self.config
    }

    /// Returns the visible links, leaf first.
    pub fn links<'a, K, V, S>(&self, scope: Option<&'a S>) -> Vec<&'a dyn Scope<K, V>>
    where
        K: 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        let limit = self.config.max_depth.unwrap_or(usize::MAX);
        let mut walk = ancestors(scope);
        let links: Vec<_> = walk.by_ref().take(limit).collect();

        if walk.next().is_some() {
            warn!(
                max_depth = limit,
                "Context chain exceeds the depth limit, truncating traversal"
            );
        } else if let Some(last) = links.last() {
            let kind = last.kind();
            if !kind.is_root() {
                trace!(
                    %kind,
                    depth = links.len(),
                    "Context chain ends at a link without a parent"
                );
            }
        }

        trace!(depth = links.len(), "Walked context chain");
        links
    }

    /// Returns the link `scope` wraps.
    pub fn parent_of<'a, K, V, S>(&self, scope: Option<&'a S>) -> Option<&'a dyn Scope<K, V>>
    where
        K: 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        super::parent_of(scope)
    }

    /// Returns the key attached at exactly this link.
    pub fn local_key_of<'a, K, V, S>(&self, scope: Option<&'a S>) -> Option<&'a K>
    where
        K: 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        super::local_key_of(scope)
    }

    /// Counts the visible links.
    pub fn depth<'a, K, V, S>(&self, scope: Option<&'a S>) -> usize
    where
        K: 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        self.links(scope).len()
    }

    /// Returns every visible attached key in construction order.
    pub fn keys<'a, K, V, S>(&self, scope: Option<&'a S>) -> Vec<&'a K>
    where
        K: 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        self.links(scope)
            .into_iter()
            .rev()
            .filter_map(|link| link.local_key())
            .collect()
    }

    /// Returns every visible attached key with the value visible from the
    /// leaf.
    pub fn pairs<'a, K, V, S>(&self, scope: Option<&'a S>) -> Vec<Pair<'a, K, V>>
    where
        K: 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        let links = self.links(scope);
        let Some(&leaf) = links.first() else {
            return Vec::new();
        };

        links
            .into_iter()
            .rev()
            .filter_map(|link| link.local_key())
            .map(|key| Pair::new(key, leaf.lookup(key)))
            .collect()
    }

    /// Returns every visible attached key with the value attached alongside
    /// it.
    pub fn attached_pairs<'a, K, V, S>(&self, scope: Option<&'a S>) -> Vec<Pair<'a, K, V>>
    where
        K: 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        self.links(scope)
            .into_iter()
            .rev()
            .filter_map(|link| link.local_key().map(|key| Pair::new(key, link.lookup(key))))
            .collect()
    }

    /// Collapses the visible chain into a mapping, closest attachment wins.
    pub fn flatten<'a, K, V, S>(&self, scope: Option<&'a S>) -> HashMap<&'a K, Option<&'a V>>
    where
        K: Eq + Hash + 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        let mut mapping = HashMap::new();
        for pair in self.pairs(scope) {
            mapping.insert(pair.key, pair.value);
        }
        mapping
    }

    /// Captures the visible chain in construction order.
    pub fn snapshot<'a, K, V, S>(&self, scope: Option<&'a S>) -> ChainSnapshot<'a, K, V>
    where
        K: 'a,
        V: 'a,
        S: Scope<K, V>,
    {
        let links = self.links(scope);
        let leaf = links.first().copied();

        let links = links
            .into_iter()
            .rev()
            .enumerate()
            .map(|(depth, link)| {
                let key = link.local_key();
                LinkSnapshot {
                    depth,
                    kind: link.kind(),
                    key,
                    value: key.and_then(|key| leaf.and_then(|leaf| leaf.lookup(key))),
                }
            })
            .collect();

        ChainSnapshot::new(links)
    }
}
