//! Move files into an `organized/` tree.
//!
//! Files are grouped either by extension
//! (`organized/by-ext/<ext>/<name>`, `noext` for files without one) or by
//! modification month (`organized/by-date/<YYYY>/<MM>/<name>`, local time).
//! Anything already under the organized directory is left where it is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{ActionError, ActionEvent, ActionSink};
use crate::scanner::{ensure_directory, FileEntry, Walker};

/// Default name of the directory files are moved into.
pub const DEFAULT_ORGANIZE_DIR: &str = "organized";

/// How files are grouped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OrganizeMode {
    /// `by-ext/<ext>/`
    #[default]
    Ext,
    /// `by-date/<YYYY>/<MM>/`
    Date,
}

/// Options for an organize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeOptions {
    /// Grouping mode
    pub mode: OrganizeMode,
    /// Include files in subdirectories
    pub recursive: bool,
    /// Only announce moves
    pub dry_run: bool,
    /// Name of the directory created under the target
    pub organize_dir: String,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            mode: OrganizeMode::default(),
            recursive: false,
            dry_run: false,
            organize_dir: DEFAULT_ORGANIZE_DIR.to_string(),
        }
    }
}

impl OrganizeOptions {
    /// Set the grouping mode.
    #[must_use]
    pub fn with_mode(mut self, mode: OrganizeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set recursive mode.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the organized directory name.
    #[must_use]
    pub fn with_organize_dir(mut self, name: impl Into<String>) -> Self {
        self.organize_dir = name.into();
        self
    }
}

/// Outcome of an organize run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    /// Files eligible to move
    pub considered: usize,
    /// Files already under the organized directory
    pub skipped: usize,
    /// Files moved
    pub moved: usize,
    /// Files that would move under dry-run
    pub would_move: usize,
    /// Files that could not be moved
    pub failures: usize,
    /// Whether shutdown cut the run short
    pub interrupted: bool,
}

impl OrganizeReport {
    /// True if any move failed.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.failures > 0
    }
}

/// Moves files into the organized tree.
#[derive(Debug, Clone, Default)]
pub struct Organizer {
    options: OrganizeOptions,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Organizer {
    /// Create an organizer with the given options.
    #[must_use]
    pub fn new(options: OrganizeOptions) -> Self {
        Self {
            options,
            shutdown_flag: None,
        }
    }

    /// Stop before the next file once `flag` is set.
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

    /// Organize the files of `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` is not an existing directory or the
    /// organized directory cannot be created.
    pub fn run(&self, dir: &Path, sink: &dyn ActionSink) -> Result<OrganizeReport, ActionError> {
        let root = ensure_directory(dir)?;
        let organized_root = root.join(&self.options.organize_dir);

        let files: Vec<FileEntry> = Walker::new(&root)
            .recursive(self.options.recursive)
            .walk()
            .filter(|e| e.is_file)
            .collect();

        if !self.options.dry_run {
            fs::create_dir_all(&organized_root).map_err(|source| ActionError::Io {
                path: organized_root.clone(),
                source,
            })?;
        }

        let mut report = OrganizeReport::default();
        for file in &files {
            if self.is_shutdown_requested() {
                report.interrupted = true;
                break;
            }
            if file.path.starts_with(&organized_root) {
                report.skipped += 1;
                continue;
            }
            report.considered += 1;

            let dest = destination(&organized_root, file, self.options.mode);
            if self.options.dry_run {
                report.would_move += 1;
                sink.emit(&ActionEvent::DryRunMove {
                    from: file.path.clone(),
                    to: dest,
                });
                continue;
            }

            match move_file(&file.path, &dest) {
                Ok(()) => {
                    log::debug!("Moved {} => {}", file.path.display(), dest.display());
                    report.moved += 1;
                }
                Err(e) => {
                    log::warn!("Failed to move {}: {}", file.path.display(), e);
                    report.failures += 1;
                    sink.emit(&ActionEvent::MoveFailed {
                        path: file.path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if !self.options.dry_run {
            sink.emit(&ActionEvent::MoveSummary {
                moved: report.moved,
            });
        }

        Ok(report)
    }
}

/// Where `file` ends up under `organized_root`.
#[must_use]
pub fn destination(organized_root: &Path, file: &FileEntry, mode: OrganizeMode) -> PathBuf {
    match mode {
        OrganizeMode::Ext => {
            let ext = Path::new(&file.name)
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "noext".to_string());
            organized_root.join("by-ext").join(ext).join(&file.name)
        }
        OrganizeMode::Date => {
            let modified: DateTime<Local> = file.metadata.modified.into();
            organized_root
                .join("by-date")
                .join(modified.format("%Y").to_string())
                .join(modified.format("%m").to_string())
                .join(&file.name)
        }
    }
}

/// Move `src` to `dest`, creating parent directories.
///
/// Refuses to replace an existing destination. Falls back to copy and
/// remove when the two paths are on different filesystems.
fn move_file(src: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::symlink_metadata(dest).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination exists: {}", dest.display()),
        ));
    }
    match fs::rename(src, dest) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(src, dest)?;
            fs::remove_file(src)
        }
        other => other,
    }
}
