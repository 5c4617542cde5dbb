//! Command-line interface definitions for fileman.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! one subcommand per file operation.
//!
//! # Example
//!
//! ```bash
//! # Report duplicate files in the current directory
//! fileman dedupe
//!
//! # Show what would be deleted, then delete
//! fileman dedupe ~/Downloads --delete --dry-run
//! fileman dedupe ~/Downloads --delete
//!
//! # Sort a folder into organized/by-date/YYYY/MM
//! fileman organize ~/Pictures --by date --recursive
//!
//! # Verbose mode for debugging
//! fileman -v tree . --depth 2
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::actions::OrganizeMode;
use crate::scanner::HashAlgorithm;

/// File organization toolkit.
///
/// Organizes files by extension or date, prints directory trees, removes
/// empty directories, batch-renames by regex, audits for missing PDFs and
/// finds duplicate files by content hash.
#[derive(Debug, Parser)]
#[command(name = "fileman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (default: platform config dir, fileman/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find duplicate files by content hash; optionally delete duplicates
    Dedupe(DedupeArgs),
    /// Move files into organized/by-ext or organized/by-date
    Organize(OrganizeArgs),
    /// Print a directory tree
    Tree(TreeArgs),
    /// Remove empty directories
    CleanEmpty(CleanEmptyArgs),
    /// Batch-rename files using a regular expression
    Rename(RenameArgs),
    /// List non-PDF files and whether a same-name PDF exists
    AuditNonpdf(AuditArgs),
}

/// Arguments for the dedupe subcommand.
#[derive(Debug, Args)]
pub struct DedupeArgs {
    /// Directory whose files are compared (subdirectories are not entered)
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Delete duplicates, keeping the first occurrence
    #[arg(long)]
    pub delete: bool,

    /// Show planned deletions without deleting
    #[arg(long)]
    pub dry_run: bool,

    /// Content hash algorithm (default from config, else blake3)
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Number of hashing threads; 1 hashes sequentially
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub hash_threads: Option<u16>,

    /// Read buffer size for hashing (e.g., 64KiB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub buffer_size: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the organize subcommand.
#[derive(Debug, Args)]
pub struct OrganizeArgs {
    /// Directory to organize
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Group mode
    #[arg(long, value_enum, default_value = "ext", ignore_case = true)]
    pub by: OrganizeMode,

    /// Scan subdirectories recursively
    #[arg(long)]
    pub recursive: bool,

    /// Show actions without moving files
    #[arg(long)]
    pub dry_run: bool,

    /// Name of the directory files are moved into (default from config, else "organized")
    #[arg(long, value_name = "NAME")]
    pub organize_dir: Option<String>,
}

/// Arguments for the tree subcommand.
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Directory to print
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Max depth to display
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// List directories before files
    #[arg(long)]
    pub dirs_first: bool,
}

/// Arguments for the clean-empty subcommand.
#[derive(Debug, Args)]
pub struct CleanEmptyArgs {
    /// Directory to clean
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Show directories that would be removed
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the rename subcommand.
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Directory containing files to rename
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Directory containing files to rename (overrides DIR)
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Regex pattern to match in the file name
    #[arg(long = "match", value_name = "REGEX", default_value = "")]
    pub pattern: String,

    /// Replacement string ($1 refers to the first capture group)
    #[arg(long, value_name = "STR", default_value = "")]
    pub replace: String,

    /// Only rename files with this extension (e.g., .pdf)
    #[arg(long, value_name = "EXT")]
    pub ext: Option<String>,

    /// Show actions without renaming
    #[arg(long)]
    pub dry_run: bool,
}

impl RenameArgs {
    /// Directory the rename runs in.
    #[must_use]
    pub fn target(&self) -> &PathBuf {
        self.path.as_ref().unwrap_or(&self.dir)
    }
}

/// Arguments for the audit-nonpdf subcommand.
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Directory to scan
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Directory to scan (overrides DIR)
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Scan subdirectories recursively
    #[arg(long)]
    pub recursive: bool,
}

impl AuditArgs {
    /// Directory the audit runs in.
    #[must_use]
    pub fn target(&self) -> &PathBuf {
        self.path.as_ref().unwrap_or(&self.dir)
    }
}

/// Output format for dedupe results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report lines
    Text,
    /// JSON document for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use fileman::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
