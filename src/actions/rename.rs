//! Regex-based batch renaming.
//!
//! Only regular files directly inside the target directory are considered.
//! The first match of the pattern in each file name is replaced; `$1` and
//! `${name}` in the replacement refer to capture groups.

use std::fs;
use std::path::Path;

use regex::Regex;

use super::{ActionError, ActionEvent, ActionSink};
use crate::scanner::{ensure_directory, FileEntry, Walker};

/// Options for a rename run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameOptions {
    /// Regex matched against each file name; empty means no renames
    pub pattern: String,
    /// Replacement for the first match
    pub replacement: String,
    /// Only files with exactly this extension, leading dot included
    pub extension: Option<String>,
    /// Only announce renames
    pub dry_run: bool,
}

impl RenameOptions {
    /// Rename the first match of `pattern` to `replacement`.
    #[must_use]
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            ..Self::default()
        }
    }

    /// Restrict to files with this extension (e.g. `.pdf`).
    #[must_use]
    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    /// Set dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of a rename run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    /// Files that passed the extension filter
    pub considered: usize,
    /// Files renamed
    pub renamed: usize,
    /// Files that would be renamed under dry-run
    pub would_rename: usize,
    /// Files whose name the pattern left unchanged
    pub unchanged: usize,
    /// Files that could not be renamed
    pub failures: usize,
}

impl RenameReport {
    /// True if any rename failed.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.failures > 0
    }
}

/// Renames files in one directory.
#[derive(Debug, Clone)]
pub struct Renamer {
    pattern: Option<Regex>,
    options: RenameOptions,
}

impl Renamer {
    /// Compile the pattern.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidPattern`] if the pattern does not compile.
    pub fn new(options: RenameOptions) -> Result<Self, ActionError> {
        let pattern = if options.pattern.is_empty() {
            None
        } else {
            Some(
                Regex::new(&options.pattern).map_err(|source| ActionError::InvalidPattern {
                    pattern: options.pattern.clone(),
                    source,
                })?,
            )
        };
        Ok(Self { pattern, options })
    }

    /// New name for `name`, if the pattern changes it.
    #[must_use]
    pub fn new_name(&self, name: &str) -> Option<String> {
        let pattern = self.pattern.as_ref()?;
        let renamed = pattern.replacen(name, 1, self.options.replacement.as_str());
        (renamed != name).then(|| renamed.into_owned())
    }

    fn accepts(&self, file: &FileEntry) -> bool {
        self.options
            .extension
            .as_deref()
            .is_none_or(|ext| file.extension() == ext)
    }

    /// Rename matching files directly inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` is not an existing directory.
    pub fn run(&self, dir: &Path, sink: &dyn ActionSink) -> Result<RenameReport, ActionError> {
        let root = ensure_directory(dir)?;
        let files: Vec<FileEntry> = Walker::new(&root)
            .walk()
            .filter(FileEntry::is_regular_file)
            .collect();

        let mut report = RenameReport::default();
        for file in files.iter().filter(|f| self.accepts(f)) {
            report.considered += 1;

            let Some(new_name) = self.new_name(&file.name) else {
                report.unchanged += 1;
                continue;
            };
            let new_path = root.join(&new_name);

            if self.options.dry_run {
                report.would_rename += 1;
                sink.emit(&ActionEvent::DryRunRename {
                    from: file.path.clone(),
                    to: new_path,
                });
                continue;
            }

            match rename_file(&file.path, &file.name, &new_name, &new_path) {
                Ok(()) => {
                    log::debug!("Renamed {} => {}", file.path.display(), new_path.display());
                    report.renamed += 1;
                }
                Err(error) => {
                    log::warn!("Failed to rename {}: {}", file.path.display(), error);
                    report.failures += 1;
                    sink.emit(&ActionEvent::RenameFailed {
                        path: file.path.clone(),
                        error,
                    });
                }
            }
        }

        if !self.options.dry_run {
            sink.emit(&ActionEvent::RenameSummary {
                renamed: report.renamed,
            });
        }

        Ok(report)
    }
}

fn rename_file(old: &Path, old_name: &str, new_name: &str, new_path: &Path) -> Result<(), String> {
    if new_name.is_empty() || new_name.contains(std::path::is_separator) {
        return Err(format!("invalid file name '{new_name}'"));
    }
    // On case-insensitive filesystems a case-only rename finds the file itself at the new path.
    let case_only_self = new_name.eq_ignore_ascii_case(old_name) && is_same_file(old, new_path);
    if !case_only_self && fs::symlink_metadata(new_path).is_ok() {
        return Err(format!("destination exists: {}", new_path.display()));
    }
    fs::rename(old, new_path).map_err(|e| e.to_string())
}

#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    matches!((fs::canonicalize(a), fs::canonicalize(b)), (Ok(a), Ok(b)) if a == b)
}
