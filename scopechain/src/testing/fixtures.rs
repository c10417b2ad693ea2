//! Chain fixtures for tests.

use crate::context::{Canceller, Context};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Builds a context chain step by step, keeping every canceller alive.
///
/// ```
/// use scopechain::testing::ChainFixture;
///
/// let fixture = ChainFixture::background()
///     .value("key-1", "value-1")
///     .cancel()
///     .value("key-2", "value-2");
///
/// assert_eq!(fixture.cancellers().len(), 1);
/// assert_eq!(fixture.context().value(&"key-1"), Some(&"value-1"));
/// ```
#[derive(Debug)]
pub struct ChainFixture<K, V> {
    context: Context<K, V>,
    cancellers: Vec<Canceller>,
}

impl<K, V> ChainFixture<K, V> {
    /// Starts from a background root.
    #[must_use]
    pub fn background() -> Self {
        Self::from_context(Context::background())
    }

    /// Starts from a todo root.
    #[must_use]
    pub fn todo() -> Self {
        Self::from_context(Context::todo())
    }

    /// Starts from an existing context.
    #[must_use]
    pub fn from_context(context: Context<K, V>) -> Self {
        Self {
            context,
            cancellers: Vec::new(),
        }
    }

    /// Attaches a key and value.
    #[must_use]
    pub fn value(mut self, key: K, value: V) -> Self {
        self.context = self.context.with_value(key, value);
        self
    }

    /// Wraps the chain in a cancel link.
    #[must_use]
    pub fn cancel(self) -> Self {
        let (context, canceller) = self.context.with_cancel();
        self.push(context, canceller)
    }

    /// Wraps the chain in a cancel link and cancels it right away.
    #[must_use]
    pub fn cancelled(self, reason: &str) -> Self {
        let fixture = self.cancel();
        if let Some(canceller) = fixture.cancellers.last() {
            canceller.cancel(reason);
        }
        fixture
    }

    /// Wraps the chain in a deadline link.
    #[must_use]
    pub fn deadline(self, deadline: DateTime<Utc>) -> Self {
        let (context, canceller) = self.context.with_deadline(deadline);
        self.push(context, canceller)
    }

    /// Wraps the chain in a deadline link `timeout` from now.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        let (context, canceller) = self.context.with_timeout(timeout);
        self.push(context, canceller)
    }

    /// Returns the current leaf.
    #[must_use]
    pub fn context(&self) -> &Context<K, V> {
        &self.context
    }

    /// Returns the cancellers of every control link, oldest first.
    #[must_use]
    pub fn cancellers(&self) -> &[Canceller] {
        &self.cancellers
    }

    /// Returns the leaf, dropping the cancellers.
    #[must_use]
    pub fn into_context(self) -> Context<K, V> {
        self.context
    }

    fn push(mut self, context: Context<K, V>, canceller: Canceller) -> Self {
        self.context = context;
        self.cancellers.push(canceller);
        self
    }
}
