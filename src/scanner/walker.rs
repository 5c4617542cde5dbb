//! Directory enumeration built on walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which enumerates a directory
//! either flat (immediate children only) or recursively, and produces a flat
//! list of [`FileEntry`] values. Traversal is iterative: walkdir keeps an
//! explicit stack of open directories, so deep trees never grow the call
//! stack.
//!
//! # Behavior
//!
//! - Directories are emitted as entries, and in recursive mode their
//!   contents follow them (depth-first).
//! - Sibling order is whatever the OS reports; nothing is sorted.
//! - Metadata follows symlinks. Entries whose metadata cannot be read
//!   (broken symlinks, permission denied, removed mid-scan) are skipped.
//! - Symlinks to directories are reported but never descended into.
//! - No filtering of any kind; callers decide what they want.
//!
//! # Example
//!
//! ```no_run
//! use fileman::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads")).recursive(true);
//! for entry in walker.walk() {
//!     let kind = if entry.is_dir { "dir" } else { "file" };
//!     println!("{kind}: {}", entry.path.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{EntryMetadata, FileEntry};

/// Directory walker producing [`FileEntry`] values.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Descend into subdirectories
    recursive: bool,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new, non-recursive walker for the given path.
    ///
    /// The root is made absolute so every emitted path is absolute too.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        let root = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self {
            root,
            recursive: false,
            shutdown_flag: None,
        }
    }

    /// Enable or disable recursive traversal.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root directory being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory, yielding entries as they are discovered.
    ///
    /// Unreadable entries are skipped rather than surfaced, so a single bad
    /// entry never aborts a large scan.
    pub fn walk(&self) -> impl Iterator<Item = FileEntry> + '_ {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let is_symlink = entry.path_is_symlink();
                    let path = entry.into_path();
                    match std::fs::metadata(&path) {
                        Ok(metadata) => Some(FileEntry {
                            is_file: metadata.is_file(),
                            is_symlink,
                            ..FileEntry::new(
                                path,
                                metadata.is_dir(),
                                EntryMetadata::from_fs(&metadata),
                            )
                        }),
                        Err(e) => {
                            log::debug!("Skipping unreadable entry {}: {}", path.display(), e);
                            None
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::debug!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
    }

    /// Walk the directory and collect every entry.
    #[must_use]
    pub fn scan(&self) -> Vec<FileEntry> {
        let entries: Vec<FileEntry> = self.walk().collect();
        log::debug!(
            "Scanned {} ({} entries, recursive={})",
            self.root.display(),
            entries.len(),
            self.recursive
        );
        entries
    }
}

/// Enumerate `root`, optionally recursively.
///
/// `root` is expected to be an existing directory; validate it first with
/// [`super::ensure_directory`].
#[must_use]
pub fn scan(root: &Path, recursive: bool) -> Vec<FileEntry> {
    Walker::new(root).recursive(recursive).scan()
}
