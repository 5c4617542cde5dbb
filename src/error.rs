//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::{DedupeReport, RunStatus};

/// Exit codes for the fileman application.
///
/// - 0: Success
/// - 1: General error (missing or invalid directory, bad pattern, config)
/// - 3: Completed, but some files could not be hashed, deleted, moved or
///   renamed
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the command completed without per-file failures.
    Success = 0,
    /// General error: the command could not run.
    GeneralError = 1,
    /// Completed with warnings: some per-file operations failed.
    CompletedWithWarnings = 3,
    /// Interrupted: the command was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FM000",
            Self::GeneralError => "FM001",
            Self::CompletedWithWarnings => "FM003",
            Self::Interrupted => "FM130",
        }
    }

    /// Exit code for a finished run.
    #[must_use]
    pub fn from_status(status: RunStatus) -> Self {
        match status {
            RunStatus::Clean => Self::Success,
            RunStatus::CompletedWithWarnings => Self::CompletedWithWarnings,
            RunStatus::Interrupted => Self::Interrupted,
        }
    }

    /// Exit code for a dedupe report.
    #[must_use]
    pub fn from_report(report: &DedupeReport) -> Self {
        Self::from_status(report.status())
    }

    /// Exit code for an action that tracks interruption and failures.
    #[must_use]
    pub fn from_outcome(interrupted: bool, has_warnings: bool) -> Self {
        if interrupted {
            Self::Interrupted
        } else if has_warnings {
            Self::CompletedWithWarnings
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "FM001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
