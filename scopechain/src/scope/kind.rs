//! Link kinds reported by [`Scope::kind`](super::Scope::kind).

use serde::Serialize;
use std::fmt;

/// The flavour of a root link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootKind {
    /// The ordinary top-level context.
    Background,
    /// A placeholder root for code that has not decided on a context yet.
    Todo,
}

/// The flavour of a control link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Carries a cancellation signal.
    Cancel,
    /// Carries a cancellation signal and a deadline.
    Deadline,
}

/// What a link in a context chain is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// A link without a parent.
    Root(RootKind),
    /// A link attaching one key and its value.
    Value,
    /// A link adding cancellation or a deadline, without a key.
    Control(ControlKind),
    /// A link whose shape is not known to this crate.
    Opaque,
}

impl LinkKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root(RootKind::Background) => "background",
            Self::Root(RootKind::Todo) => "todo",
            Self::Value => "value",
            Self::Control(ControlKind::Cancel) => "cancel",
            Self::Control(ControlKind::Deadline) => "deadline",
            Self::Opaque => "opaque",
        }
    }

    /// Returns true for root links.
    #[must_use]
    pub const fn is_root(self) -> bool {
        matches!(self, Self::Root(_))
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
