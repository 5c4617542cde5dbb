//! Report events emitted during a dedupe run.
//!
//! The deduplicator never prints. Every keep/duplicate designation,
//! deletion, dry-run notice and failure is emitted as a [`DedupeEvent`] the
//! moment it happens, to whatever [`EventSink`] the caller supplies. The
//! CLI writes them to the terminal; an embedding application can collect
//! them or forward them over a channel.
//!
//! # Example
//!
//! ```
//! use fileman::duplicates::{CollectingSink, DedupeEvent, EventSink};
//! use std::path::PathBuf;
//!
//! let sink = CollectingSink::new();
//! sink.emit(&DedupeEvent::DryRunDelete { path: PathBuf::from("/d/b.txt") });
//! assert_eq!(sink.lines(), vec!["[dry-run] delete /d/b.txt"]);
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::scanner::{hash_to_hex, Digest};

/// Role of a member within a duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    /// The preserved copy
    Keep,
    /// A deletion candidate
    Duplicate,
}

/// One line of the dedupe audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupeEvent {
    /// A file could not be hashed and was left out of every group.
    HashFailed {
        /// File that failed
        path: PathBuf,
        /// Rendered error
        error: String,
    },
    /// Start of a duplicate group.
    GroupHeader {
        /// Shared digest
        digest: Digest,
    },
    /// One member of the current group.
    Member {
        /// Member path
        path: PathBuf,
        /// Keep or duplicate
        role: MemberRole,
    },
    /// Deletion that would happen without `--dry-run`.
    DryRunDelete {
        /// Candidate path
        path: PathBuf,
    },
    /// A candidate was removed.
    Deleted {
        /// Removed path
        path: PathBuf,
    },
    /// A candidate could not be removed.
    DeleteFailed {
        /// Candidate path
        path: PathBuf,
        /// Rendered error
        error: String,
    },
    /// Final count, emitted whenever deletion ran without dry-run.
    Summary {
        /// Number of files removed
        deleted: usize,
    },
}

impl DedupeEvent {
    /// Whether this event describes a failure (routed to stderr by the CLI).
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::HashFailed { .. } | Self::DeleteFailed { .. })
    }
}

impl fmt::Display for DedupeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashFailed { path, error } => {
                write!(f, "Hash failed: {}: {}", path.display(), error)
            }
            Self::GroupHeader { digest } => {
                write!(f, "Duplicate group (hash={}):", hash_to_hex(digest))
            }
            Self::Member {
                path,
                role: MemberRole::Keep,
            } => write!(f, "  [keep] {}", path.display()),
            Self::Member {
                path,
                role: MemberRole::Duplicate,
            } => write!(f, "  [dup]  {}", path.display()),
            Self::DryRunDelete { path } => write!(f, "[dry-run] delete {}", path.display()),
            Self::Deleted { path } => write!(f, "[deleted] {}", path.display()),
            Self::DeleteFailed { path, error } => {
                write!(f, "Delete failed: {}: {}", path.display(), error)
            }
            Self::Summary { deleted } => write!(f, "Deleted duplicates: {deleted}"),
        }
    }
}

/// Destination for dedupe events.
pub trait EventSink {
    /// Receive one event.
    fn emit(&self, event: &DedupeEvent);
}

impl<F> EventSink for F
where
    F: Fn(&DedupeEvent),
{
    fn emit(&self, event: &DedupeEvent) {
        self(event);
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &DedupeEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DedupeEvent>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<DedupeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events rendered as report lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: &DedupeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
