//! Output for command results.
//!
//! This module provides:
//! - A terminal sink for dedupe and action events
//! - JSON for automation and scripting
//! - The directory tree printer
//! - The non-PDF audit listing
//!
//! # Example
//!
//! ```no_run
//! use fileman::duplicates::{DedupeOptions, Deduplicator};
//! use fileman::output::StdioSink;
//! use std::path::Path;
//!
//! let sink = StdioSink::new(true);
//! let report = Deduplicator::new(DedupeOptions::default())
//!     .run(Path::new("."), &sink)
//!     .unwrap();
//! ```

pub mod audit;
pub mod json;
pub mod stdio;
pub mod tree;

// Re-export main types
pub use audit::{AuditEntry, PdfAudit};
pub use json::JsonOutput;
pub use stdio::StdioSink;
pub use tree::{print_tree, TreeOptions, TreeStats};
