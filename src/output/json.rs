//! JSON output for dedupe results.
//!
//! Provides machine-readable output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "abc123...",
//!       "size": 5,
//!       "keep": "/dir/a.txt",
//!       "duplicates": ["/dir/b.txt"]
//!     }
//!   ],
//!   "deleted": ["/dir/b.txt"],
//!   "failures": [
//!     { "stage": "hash", "path": "/dir/locked.bin", "error": "permission denied" }
//!   ],
//!   "summary": {
//!     "root": "/dir",
//!     "algorithm": "blake3",
//!     "files_scanned": 4,
//!     "files_hashed": 3,
//!     "hash_failures": 1,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 5,
//!     "delete_requested": true,
//!     "dry_run": false,
//!     "deleted": 1,
//!     "would_delete": 0,
//!     "delete_failures": 0,
//!     "duration_ms": 12,
//!     "interrupted": false,
//!     "exit_code": 3,
//!     "exit_code_name": "FM003"
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use fileman::duplicates::{CollectingSink, DedupeOptions, Deduplicator};
//! use fileman::error::ExitCode;
//! use fileman::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let sink = CollectingSink::new();
//! let report = Deduplicator::new(DedupeOptions::default())
//!     .run(Path::new("."), &sink)
//!     .unwrap();
//!
//! let output = JsonOutput::new(&report, &sink.events(), ExitCode::from_report(&report));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::duplicates::{DedupeEvent, DedupeReport, HashGroup};
use crate::error::ExitCode;
use crate::scanner::HashAlgorithm;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Digest as hexadecimal string (64 characters)
    pub hash: String,
    /// Size of each member in bytes
    pub size: u64,
    /// The preserved file
    pub keep: String,
    /// Every other member, in discovery order
    pub duplicates: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON group from a [`HashGroup`].
    #[must_use]
    pub fn from_hash_group(group: &HashGroup) -> Self {
        Self {
            hash: group.digest_hex(),
            size: group.keeper().map_or(0, |f| f.metadata.size),
            keep: group
                .keeper()
                .map(|f| path_string(&f.path))
                .unwrap_or_default(),
            duplicates: group
                .candidates()
                .iter()
                .map(|f| path_string(&f.path))
                .collect(),
        }
    }
}

/// A per-file failure in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonFailure {
    /// `hash` or `delete`
    pub stage: &'static str,
    /// File that failed
    pub path: String,
    /// Reason
    pub error: String,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Directory that was deduplicated
    pub root: String,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Regular files found in the root
    pub files_scanned: usize,
    /// Files hashed successfully
    pub files_hashed: usize,
    /// Files that could not be hashed
    pub hash_failures: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding keepers)
    pub duplicate_files: usize,
    /// Space held by duplicates (bytes)
    pub reclaimable_space: u64,
    /// Whether deletion was requested
    pub delete_requested: bool,
    /// Whether deletions were only announced
    pub dry_run: bool,
    /// Files removed
    pub deleted: usize,
    /// Files that would be removed without dry-run
    pub would_delete: usize,
    /// Candidates that could not be removed
    pub delete_failures: usize,
    /// Duration of the run in milliseconds
    pub duration_ms: u64,
    /// Whether the run was interrupted
    pub interrupted: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "FM000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a [`DedupeReport`] and an exit code.
    #[must_use]
    pub fn from_report(report: &DedupeReport, exit_code: ExitCode) -> Self {
        Self {
            root: path_string(&report.root),
            algorithm: report.algorithm,
            files_scanned: report.files_scanned,
            files_hashed: report.files_hashed,
            hash_failures: report.hash_failures,
            duplicate_groups: report.duplicate_groups,
            duplicate_files: report.duplicate_files,
            reclaimable_space: report.reclaimable_bytes,
            delete_requested: report.delete_requested,
            dry_run: report.dry_run,
            deleted: report.deleted,
            would_delete: report.would_delete,
            delete_failures: report.delete_failures,
            duration_ms: u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX),
            interrupted: report.interrupted,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Files actually deleted
    pub deleted: Vec<String>,
    /// Per-file hash and delete failures
    pub failures: Vec<JsonFailure>,
    /// Run summary
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the output from a report and the events emitted during the run.
    ///
    /// # Example
    ///
    /// ```
    /// use fileman::duplicates::DedupeReport;
    /// use fileman::error::ExitCode;
    /// use fileman::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(&DedupeReport::default(), &[], ExitCode::Success);
    /// assert!(output.duplicates.is_empty());
    /// assert_eq!(output.summary.exit_code_name, "FM000");
    /// ```
    #[must_use]
    pub fn new(report: &DedupeReport, events: &[DedupeEvent], exit_code: ExitCode) -> Self {
        let mut deleted = Vec::new();
        let mut failures = Vec::new();
        for event in events {
            match event {
                DedupeEvent::Deleted { path } => deleted.push(path_string(path)),
                DedupeEvent::HashFailed { path, error } => failures.push(JsonFailure {
                    stage: "hash",
                    path: path_string(path),
                    error: error.clone(),
                }),
                DedupeEvent::DeleteFailed { path, error } => failures.push(JsonFailure {
                    stage: "delete",
                    path: path_string(path),
                    error: error.clone(),
                }),
                _ => {}
            }
        }

        Self {
            duplicates: report
                .groups
                .iter()
                .map(JsonDuplicateGroup::from_hash_group)
                .collect(),
            deleted,
            failures,
            summary: JsonSummary::from_report(report, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
