//! Empty directory removal.
//!
//! Directories are visited post-order (contents before the directory
//! itself), so a directory holding only empty directories is removed after
//! its children. The target directory is removed too if it ends up empty.
//! Symlinks are never followed and count as content.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{ActionError, ActionEvent, ActionSink};
use crate::scanner::ensure_directory;

/// Outcome of an empty-directory sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Directories removed, or that would be removed under dry-run
    pub removed: Vec<PathBuf>,
    /// Whether shutdown cut the run short
    pub interrupted: bool,
}

/// Removes empty directories below a root.
#[derive(Debug, Clone, Default)]
pub struct EmptyDirCleaner {
    dry_run: bool,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl EmptyDirCleaner {
    /// Create a cleaner that removes directories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only announce removals.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop before the next directory once `flag` is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Remove every empty directory under `dir`, `dir` included.
    ///
    /// Directories that cannot be read or removed are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` is not an existing directory.
    pub fn run(&self, dir: &Path, sink: &dyn ActionSink) -> Result<PruneReport, ActionError> {
        let root = ensure_directory(dir)?;
        let mut report = PruneReport::default();
        // Directories treated as gone under dry-run
        let mut removed: HashSet<PathBuf> = HashSet::new();

        let dirs = WalkDir::new(&root)
            .contents_first(true)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => Some(entry.into_path()),
                Ok(_) => None,
                Err(e) => {
                    log::debug!("Skipping unreadable entry: {e}");
                    None
                }
            });

        for path in dirs {
            if self.is_shutdown_requested() {
                report.interrupted = true;
                break;
            }
            if !self.is_empty(&path, &removed) {
                continue;
            }

            if self.dry_run {
                sink.emit(&ActionEvent::DryRunRemoveDir { path: path.clone() });
                removed.insert(path.clone());
                report.removed.push(path);
                continue;
            }

            match fs::remove_dir(&path) {
                Ok(()) => {
                    sink.emit(&ActionEvent::RemovedDir { path: path.clone() });
                    report.removed.push(path);
                }
                Err(e) => log::debug!("Could not remove {}: {}", path.display(), e),
            }
        }

        Ok(report)
    }

    fn is_empty(&self, dir: &Path, removed: &HashSet<PathBuf>) -> bool {
        match fs::read_dir(dir) {
            Ok(mut entries) => entries.all(|entry| {
                entry
                    .map(|e| removed.contains(&e.path()))
                    .unwrap_or(false)
            }),
            Err(e) => {
                log::debug!("Cannot read {}: {}", dir.display(), e);
                false
            }
        }
    }
}
