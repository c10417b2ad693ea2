//! The capability set every context handle exposes to inspection.
//!
//! A context is a singly-linked chain of links. Each link may wrap a parent
//! and may attach one key. [`Scope`] makes both facts queryable, together with
//! the leaf-to-root value lookup that every context supports:
//!
//! ```text
//! Context::background()          root, no key
//!    ↑
//! .with_value("key-1", "val-1")  attaches "key-1"
//!    ↑
//! .with_cancel()                 control link, no key
//!    ↑
//! .with_value("key-2", "val-2")  attaches "key-2"
//! ```
//!
//! Every method has a default describing an opaque handle: no parent, no key,
//! no values. A foreign handle type therefore opts in with an empty impl and
//! is inspected as a single-link chain that carries nothing.

mod kind;

pub use kind::{ControlKind, LinkKind, RootKind};

/// One link of a request-scoped context chain.
pub trait Scope<K, V> {
    /// Returns the link this one wraps, or `None` for a root or opaque link.
    fn parent(&self) -> Option<&dyn Scope<K, V>> {
        None
    }

    /// Returns the key attached at exactly this link.
    ///
    /// Presence is decided by the link's shape, never by the key's value: an
    /// empty string or a zero is still a key.
    fn local_key(&self) -> Option<&K> {
        None
    }

    /// Looks a key up from this link toward the root. The closest attachment
    /// wins.
    ///
    /// The key is borrowed for as long as the link.
    fn lookup<'s>(&'s self, key: &'s K) -> Option<&'s V> {
        self.parent().and_then(|parent| parent.lookup(key))
    }

    /// Describes what kind of link this is.
    fn kind(&self) -> LinkKind {
        LinkKind::Opaque
    }
}

impl<K, V, T> Scope<K, V> for &T
where
    T: Scope<K, V> + ?Sized,
{
    fn parent(&self) -> Option<&dyn Scope<K, V>> {
        (**self).parent()
    }

    fn local_key(&self) -> Option<&K> {
        (**self).local_key()
    }

    fn lookup<'s>(&'s self, key: &'s K) -> Option<&'s V> {
        (**self).lookup(key)
    }

    fn kind(&self) -> LinkKind {
        (**self).kind()
    }
}
