//! File actions module.
//!
//! This module provides functionality for:
//! - Permanent deletion of duplicate files
//! - Moving files into an `organized/` tree by extension or date
//! - Regex-based batch renaming
//! - Removing empty directories
//!
//! Every action that mutates the filesystem supports a dry-run mode that
//! only announces what it would do. Per-file failures are reported through
//! an [`ActionSink`] and counted; they never abort the action.
//!
//! ```no_run
//! use fileman::actions::{ActionEvent, Organizer, OrganizeOptions};
//! use std::path::Path;
//!
//! let organizer = Organizer::new(OrganizeOptions::default().with_dry_run(true));
//! let report = organizer
//!     .run(Path::new("Downloads"), &|e: &ActionEvent| println!("{e}"))
//!     .unwrap();
//! println!("{} files would move", report.would_move);
//! ```

pub mod delete;
pub mod organize;
pub mod prune;
pub mod rename;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::scanner::ScanError;

// Re-export commonly used types
pub use delete::{delete_file, DeleteError, DeleteResult};
pub use organize::{OrganizeMode, OrganizeOptions, OrganizeReport, Organizer};
pub use prune::{EmptyDirCleaner, PruneReport};
pub use rename::{RenameOptions, RenameReport, Renamer};

/// Fatal errors for an action. Per-file failures are events, not errors.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The target directory does not exist.
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),

    /// The target is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The rename pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern as given
        pattern: String,
        /// Compile error
        #[source]
        source: regex::Error,
    },

    /// The target directory could not be inspected.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl From<ScanError> for ActionError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotFound(path) => Self::NotFound(path),
            ScanError::NotADirectory(path) => Self::NotADirectory(path),
            ScanError::Io { path, source } => Self::Io { path, source },
        }
    }
}

/// One user-visible line produced by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEvent {
    /// Move that would happen without dry-run.
    DryRunMove {
        /// Source
        from: PathBuf,
        /// Destination
        to: PathBuf,
    },
    /// A file could not be moved.
    MoveFailed {
        /// Source
        path: PathBuf,
        /// Rendered error
        error: String,
    },
    /// Number of files moved.
    MoveSummary {
        /// Files moved
        moved: usize,
    },
    /// Rename that would happen without dry-run.
    DryRunRename {
        /// Old path
        from: PathBuf,
        /// New path
        to: PathBuf,
    },
    /// A file could not be renamed.
    RenameFailed {
        /// Old path
        path: PathBuf,
        /// Rendered error
        error: String,
    },
    /// Number of files renamed.
    RenameSummary {
        /// Files renamed
        renamed: usize,
    },
    /// Empty directory removal that would happen without dry-run.
    DryRunRemoveDir {
        /// Directory
        path: PathBuf,
    },
    /// An empty directory was removed.
    RemovedDir {
        /// Directory
        path: PathBuf,
    },
}

impl ActionEvent {
    /// Whether this event describes a failure (routed to stderr by the CLI).
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::MoveFailed { .. } | Self::RenameFailed { .. })
    }
}

impl fmt::Display for ActionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DryRunMove { from, to } => {
                write!(f, "[dry-run] move {} => {}", from.display(), to.display())
            }
            Self::MoveFailed { path, error } => {
                write!(f, "Failed to move: {}: {}", path.display(), error)
            }
            Self::MoveSummary { moved } => write!(f, "Moved files: {moved}"),
            Self::DryRunRename { from, to } => {
                write!(f, "[dry-run] rename {} => {}", from.display(), to.display())
            }
            Self::RenameFailed { path, error } => {
                write!(f, "Failed to rename: {}: {}", path.display(), error)
            }
            Self::RenameSummary { renamed } => write!(f, "Renamed files: {renamed}"),
            Self::DryRunRemoveDir { path } => write!(f, "[dry-run] remove {}", path.display()),
            Self::RemovedDir { path } => write!(f, "Removed empty dir: {}", path.display()),
        }
    }
}

/// Destination for action events.
pub trait ActionSink {
    /// Receive one event.
    fn emit(&self, event: &ActionEvent);
}

impl<F> ActionSink for F
where
    F: Fn(&ActionEvent),
{
    fn emit(&self, event: &ActionEvent) {
        self(event);
    }
}
