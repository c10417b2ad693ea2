//! The immutable, `Arc`-linked context chain.

use super::cancel::{CancelState, Canceller};
use crate::scope::{ControlKind, LinkKind, RootKind, Scope};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A request-scoped context handle.
///
/// Handles never change after creation. Deriving a new handle wraps the
/// current one as its parent, so a chain is built leaf-last and can only be
/// walked from the leaf toward the root. Cloning a handle is cheap and yields
/// the same link.
pub struct Context<K, V> {
    link: Arc<Link<K, V>>,
}

struct Link<K, V> {
    /// `None` for roots, and for other links only while the chain is dropped.
    parent: Option<Context<K, V>>,
    node: Node<K, V>,
}

enum Node<K, V> {
    Root(RootKind),
    Value { key: K, value: V },
    Control(Control),
}

struct Control {
    kind: ControlKind,
    deadline: Option<DateTime<Utc>>,
    state: Arc<CancelState>,
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("kind", &self.kind)
            .field("deadline", &self.deadline)
            .field("cancelled", &self.state.is_cancelled())
            .finish()
    }
}

impl<K, V> Context<K, V> {
    fn root(kind: RootKind) -> Self {
        Self {
            link: Arc::new(Link {
                parent: None,
                node: Node::Root(kind),
            }),
        }
    }

    fn derive(&self, node: Node<K, V>) -> Self {
        Self {
            link: Arc::new(Link {
                parent: Some(self.clone()),
                node,
            }),
        }
    }

    fn derive_control(
        &self,
        kind: ControlKind,
        deadline: Option<DateTime<Utc>>,
    ) -> (Self, Canceller) {
        let state = Arc::new(CancelState::default());
        let ctx = self.derive(Node::Control(Control {
            kind,
            deadline,
            state: Arc::clone(&state),
        }));
        (ctx, Canceller::new(state))
    }

    /// Creates the ordinary top-level context.
    #[must_use]
    pub fn background() -> Self {
        Self::root(RootKind::Background)
    }

    /// Creates a placeholder root for code that has not decided on a context.
    #[must_use]
    pub fn todo() -> Self {
        Self::root(RootKind::Todo)
    }

    /// Derives a context that attaches `key` with `value`.
    #[must_use]
    pub fn with_value(&self, key: K, value: V) -> Self {
        self.derive(Node::Value { key, value })
    }

    /// Derives a cancellable context that attaches no key.
    #[must_use]
    pub fn with_cancel(&self) -> (Self, Canceller) {
        self.derive_control(ControlKind::Cancel, None)
    }

    /// Derives a cancellable context carrying a deadline.
    #[must_use]
    pub fn with_deadline(&self, deadline: DateTime<Utc>) -> (Self, Canceller) {
        self.derive_control(ControlKind::Deadline, Some(deadline))
    }

    /// Derives a cancellable context whose deadline is `timeout` from now.
    ///
    /// Timeouts too large to represent saturate to the latest representable
    /// instant.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> (Self, Canceller) {
        let deadline = chrono::Duration::from_std(timeout)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.with_deadline(deadline)
    }

    /// Returns the context this one wraps, or `None` for a root.
    #[must_use]
    pub fn parent_context(&self) -> Option<&Self> {
        self.link.parent.as_ref()
    }

    /// Returns the key attached at this link.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        match &self.link.node {
            Node::Value { key, .. } => Some(key),
            Node::Root(_) | Node::Control(_) => None,
        }
    }

    /// Returns what kind of link this is.
    #[must_use]
    pub fn link_kind(&self) -> LinkKind {
        match &self.link.node {
            Node::Root(kind) => LinkKind::Root(*kind),
            Node::Value { .. } => LinkKind::Value,
            Node::Control(control) => LinkKind::Control(control.kind),
        }
    }

    /// Returns whether this link was cancelled. Only control links can be.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.control().is_some_and(|control| control.state.is_cancelled())
    }

    /// Returns the reason this link was cancelled with.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<String> {
        self.control().and_then(|control| control.state.reason())
    }

    /// Returns the deadline of the nearest deadline link, this one included.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if let Some(deadline) = ctx.control().and_then(|control| control.deadline) {
                return Some(deadline);
            }
            current = ctx.parent_context();
        }
        None
    }

    /// Returns whether the nearest deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline().is_some_and(|deadline| Utc::now() >= deadline)
    }

    /// Returns true if both handles are the same link.
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.link, &other.link)
    }

    fn control(&self) -> Option<&Control> {
        match &self.link.node {
            Node::Control(control) => Some(control),
            Node::Root(_) | Node::Value { .. } => None,
        }
    }
}

impl<K: PartialEq, V> Context<K, V> {
    /// Looks `key` up from this link toward the root. The closest attachment
    /// wins.
    #[must_use]
    pub fn value(&self, key: &K) -> Option<&V> {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if let Node::Value {
                key: attached,
                value,
            } = &ctx.link.node
            {
                if attached == key {
                    return Some(value);
                }
            }
            current = ctx.parent_context();
        }
        None
    }
}

impl<K: PartialEq, V> Scope<K, V> for Context<K, V> {
    fn parent(&self) -> Option<&dyn Scope<K, V>> {
        self.parent_context().map(|parent| parent as &dyn Scope<K, V>)
    }

    fn local_key(&self) -> Option<&K> {
        self.key()
    }

    fn lookup<'s>(&'s self, key: &'s K) -> Option<&'s V> {
        self.value(key)
    }

    fn kind(&self) -> LinkKind {
        self.link_kind()
    }
}

impl<K, V> Clone for Context<K, V> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl<K, V> Default for Context<K, V> {
    fn default() -> Self {
        Self::background()
    }
}

// Unlinks uniquely owned ancestors one at a time so deep chains do not
// recurse on drop.
impl<K, V> Drop for Context<K, V> {
    fn drop(&mut self) {
        let mut next = Arc::get_mut(&mut self.link).and_then(|link| link.parent.take());
        while let Some(mut ctx) = next {
            next = Arc::get_mut(&mut ctx.link).and_then(|link| link.parent.take());
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Context<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut links = f.debug_list();
        let mut current = Some(self);
        while let Some(ctx) = current {
            match &ctx.link.node {
                Node::Root(kind) => links.entry(kind),
                Node::Value { key, value } => links.entry(&(key, value)),
                Node::Control(control) => links.entry(control),
            };
            current = ctx.parent_context();
        }
        links.finish()
    }
}
