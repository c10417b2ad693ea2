//! Chain inspection.
//!
//! Two primitives read a single link:
//! - [`parent_of`]: the link this one wraps
//! - [`local_key_of`]: the key attached at exactly this link
//!
//! Everything else composes them. [`keys`], [`pairs`] and [`flatten`] walk
//! from the given handle to the root and report in construction order, the
//! root-most attachment first. None of them fail: an absent handle, a root and
//! a handle of unknown shape all simply end the walk.
//!
//! The free functions walk the whole chain. Use an [`Inspector`] to apply an
//! [`InspectConfig`](crate::config::InspectConfig).

mod inspector;
mod snapshot;


pub use inspector::Inspector;
pub use snapshot::{ChainSnapshot, LinkSnapshot};

use crate::scope::Scope;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// A key discovered in a chain, with the value visible for it.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Pair<'a, K, V> {
    /// The attached key.
    pub key: &'a K,
    /// The value found for the key. `None` only when a handle reports a key
    /// that its own lookup cannot resolve.
    pub value: Option<&'a V>,
}

impl<'a, K, V> Pair<'a, K, V> {
    /// Creates a pair.
    #[must_use]
    pub const fn new(key: &'a K, value: Option<&'a V>) -> Self {
        Self { key, value }
    }
}

impl<K, V> Clone for Pair<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Pair<'_, K, V> {}

/// Iterator over the links of a chain, from the leaf toward the root.
///
/// The leaf itself is yielded first. The walk ends at the first link that
/// reports no parent.
pub struct Ancestors<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    next: Option<&'a dyn Scope<K, V>>,
}

impl<'a, K: 'a, V: 'a> Iterator for Ancestors<'a, K, V> {
    type Item = &'a dyn Scope<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.parent();
        Some(link)
    }
}

impl<'a, K: 'a, V: 'a> std::iter::FusedIterator for Ancestors<'a, K, V> {}

/// Returns the link `scope` wraps.
///
/// Returns `None` for an absent handle, a root, or a handle that exposes no
/// parent. Repeated calls return the same link.
pub fn parent_of<'a, K, V, S>(scope: Option<&'a S>) -> Option<&'a dyn Scope<K, V>>
where
    K: 'a,
    V: 'a,
    S: Scope<K, V>,
{
    scope.and_then(|s| s.parent())
}

/// Returns the key attached at exactly this link, if any.
pub fn local_key_of<'a, K, V, S>(scope: Option<&'a S>) -> Option<&'a K>
where
    K: 'a,
    V: 'a,
    S: Scope<K, V>,
{
    scope.and_then(|s| s.local_key())
}

/// Iterates the links of the chain ending at `scope`, leaf first.
///
/// The leaf yielded is `scope` itself. If `scope` is a reference to a handle,
/// such as `&&dyn Scope`, the leaf is that reference rather than the link it
/// points to; every link after it is the real parent.
pub fn ancestors<'a, K, V, S>(scope: Option<&'a S>) -> Ancestors<'a, K, V>
where
    K: 'a,
    V: 'a,
    S: Scope<K, V>,
{
    Ancestors {
        next: scope.map(|s| s as &dyn Scope<K, V>),
    }
}

/// Counts the links of the chain ending at `scope`, the leaf included.
pub fn depth<'a, K, V, S>(scope: Option<&'a S>) -> usize
where
    K: 'a,
    V: 'a,
    S: Scope<K, V>,
{
    ancestors(scope).count()
}

/// Returns every attached key in construction order.
///
/// Keys attached more than once appear once per attachment.
pub fn keys<'a, K, V, S>(scope: Option<&'a S>) -> Vec<&'a K>
where
    K: 'a,
    V: 'a,
    S: Scope<K, V>,
{
    Inspector::unbounded().keys(scope)
}

/// Returns every attached key with the value visible for it from `scope`.
///
/// Values are looked up against the leaf, so a key that was attached again
/// closer to the leaf reports the newer value at both positions. See
/// [`attached_pairs`] for the value stored at each link.
pub fn pairs<'a, K, V, S>(scope: Option<&'a S>) -> Vec<Pair<'a, K, V>>
where
    K: 'a,
    V: 'a,
    S: Scope<K, V>,
{
    Inspector::unbounded().pairs(scope)
}

/// Returns every attached key with the value attached alongside it.
pub fn attached_pairs<'a, K, V, S>(scope: Option<&'a S>) -> Vec<Pair<'a, K, V>>
where
    K: 'a,
    V: 'a,
    S: Scope<K, V>,
{
    Inspector::unbounded().attached_pairs(scope)
}

/// Collapses the chain into a mapping. The attachment closest to the leaf
/// wins.
pub fn flatten<'a, K, V, S>(scope: Option<&'a S>) -> HashMap<&'a K, Option<&'a V>>
where
    K: Eq + Hash + 'a,
    V: 'a,
    S: Scope<K, V>,
{
    Inspector::unbounded().flatten(scope)
}

/// Captures the chain as a serializable list of links in construction order.
pub fn snapshot<'a, K, V, S>(scope: Option<&'a S>) -> ChainSnapshot<'a, K, V>
where
    K: 'a,
    V: 'a,
    S: Scope<K, V>,
{
    Inspector::unbounded().snapshot(scope)
}

/// Returns true if both references point at the same link.
///
/// Identity is by address. A handle reached through an extra reference (see
/// [`ancestors`]) is a different address from the link it forwards to, so
/// compare leaves using the link itself.
pub fn same_link<K, V>(a: &dyn Scope<K, V>, b: &dyn Scope<K, V>) -> bool {
    std::ptr::eq(a as *const _ as *const (), b as *const _ as *const ())
}
