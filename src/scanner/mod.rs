//! Scanner module for directory enumeration and file hashing.
//!
//! This module provides functionality for:
//! - Iterative directory enumeration (flat or recursive)
//! - Streaming content hashing with BLAKE3 or SHA-256
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal producing [`FileEntry`] values
//! - [`hasher`]: Streaming 256-bit content digests
//!
//! # Example
//!
//! ```no_run
//! use fileman::scanner::{scan, FileEntry};
//! use std::path::Path;
//!
//! // Immediate children only
//! let entries: Vec<FileEntry> = scan(Path::new("."), false);
//! for entry in entries.iter().filter(|e| !e.is_dir) {
//!     println!("{}: {} bytes", entry.path.display(), entry.metadata.size);
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

// Re-export main types
pub use hasher::{
    hash_to_hex, hex_to_hash, Digest, HashAlgorithm, Hasher, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE,
};
pub use walker::{scan, Walker};

/// Filesystem metadata captured for an entry at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

impl EntryMetadata {
    /// Capture the fields we care about from [`std::fs::Metadata`].
    #[must_use]
    pub fn from_fs(metadata: &std::fs::Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }
}

/// One filesystem object discovered during a scan.
///
/// Entries are created fresh on every scan and never shared across scans.
/// Directories are kept in the output so callers can recurse manually or
/// filter them out.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute path, unique within one scan
    pub path: PathBuf,
    /// Absolute path of the containing directory
    pub parent_dir: PathBuf,
    /// Base name
    pub name: String,
    /// Whether this entry is a directory (after following symlinks)
    pub is_dir: bool,
    /// Whether this entry is a regular file (after following symlinks)
    pub is_file: bool,
    /// Whether the entry itself is a symbolic link
    pub is_symlink: bool,
    /// Size and modification time
    pub metadata: EntryMetadata,
}

impl FileEntry {
    /// Create a new FileEntry from a path and its metadata.
    ///
    /// The parent directory and base name are derived from `path`. Anything
    /// that is not a directory is assumed to be a regular, non-symlink file;
    /// the walker overrides both flags from the real file type.
    #[must_use]
    pub fn new(path: PathBuf, is_dir: bool, metadata: EntryMetadata) -> Self {
        let parent_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            parent_dir,
            name,
            is_dir,
            is_file: !is_dir,
            is_symlink: false,
            metadata,
        }
    }

    /// A regular file that is not reached through a symlink.
    #[must_use]
    pub fn is_regular_file(&self) -> bool {
        self.is_file && !self.is_symlink
    }

    /// File extension including the leading dot, as written on disk.
    ///
    /// Returns an empty string for names without an extension and for
    /// dotfiles such as `.bashrc`.
    #[must_use]
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }
}

/// Errors that can occur while validating or scanning a directory.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The failure without the path, for report lines that already name it.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::NotFound(_) => "file not found".to_string(),
            Self::PermissionDenied(_) => "permission denied".to_string(),
            Self::Interrupted(_) => "interrupted".to_string(),
            Self::Io { source, .. } => source.to_string(),
        }
    }
}

/// Resolve `path` to an absolute path and check that it is a directory.
///
/// Every command validates its target with this before doing any work; the
/// walker itself assumes a valid directory.
///
/// # Errors
///
/// - [`ScanError::NotFound`] if nothing exists at `path`
/// - [`ScanError::NotADirectory`] if `path` exists but is not a directory
pub fn ensure_directory(path: &Path) -> Result<PathBuf, ScanError> {
    let absolute = std::path::absolute(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match std::fs::metadata(&absolute) {
        Ok(metadata) if metadata.is_dir() => Ok(absolute),
        Ok(_) => Err(ScanError::NotADirectory(absolute)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ScanError::NotFound(absolute)),
        Err(source) => Err(ScanError::Io {
            path: absolute,
            source,
        }),
    }
}
