//! Permanent file deletion.
//!
//! # Overview
//!
//! Deletion candidates are unlinked one at a time. Failures are classified
//! so the caller can report them per file and keep going.
//!
//! # Safety
//!
//! This is irreversible. The deduplicator only calls into this module when
//! deletion was explicitly requested and dry-run is off, and never for a
//! group's keeper.
//!
//! # Example
//!
//! ```no_run
//! use fileman::actions::delete::delete_file;
//! use std::path::Path;
//!
//! match delete_file(Path::new("/path/to/duplicate.txt")) {
//!     Ok(result) => println!("Deleted: {} ({} bytes)", result.path.display(), result.size),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Path exists but is not a regular file.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O error raised while deleting `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::NotAFile(p) => p,
            Self::Io { path, .. } => path,
        }
    }

    /// The failure without the path, for report lines that already name it.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::NotFound(_) => "file not found".to_string(),
            Self::PermissionDenied(_) => "permission denied".to_string(),
            Self::NotAFile(_) => "not a regular file".to_string(),
            Self::Io { source, .. } => source.to_string(),
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file vanished
/// - `PermissionDenied` if deletion is not allowed
/// - `NotAFile` if the path is now a directory
/// - `Io` for anything else
pub fn delete_file(path: &Path) -> Result<DeleteResult, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
    if metadata.is_dir() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }

    let size = metadata.len();

    fs::remove_file(path).map_err(|e| {
        log::error!("Delete failed for {}: {}", path.display(), e);
        DeleteError::from_io(path, e)
    })?;

    log::debug!("Deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
    })
}
