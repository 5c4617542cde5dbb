//! Audit of non-PDF files.
//!
//! Lists every file whose extension is not `.pdf` (any case) and whether a
//! file with the same stem and a `.pdf` extension sits next to it.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{FileEntry, Walker};

/// One audited file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// The non-PDF file
    pub path: PathBuf,
    /// Whether `<stem>.pdf` exists in the same directory
    pub has_pdf: bool,
}

/// Result of an audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PdfAudit {
    /// Audited files in enumeration order
    pub entries: Vec<AuditEntry>,
}

impl PdfAudit {
    /// Audit the files of `root`.
    ///
    /// `root` is expected to be an existing directory.
    #[must_use]
    pub fn run(root: &Path, recursive: bool) -> Self {
        let entries = Walker::new(root)
            .recursive(recursive)
            .walk()
            .filter(|e| e.is_file && !is_pdf(e))
            .map(|e| AuditEntry {
                has_pdf: pdf_counterpart(&e).exists(),
                path: e.path,
            })
            .collect();
        Self { entries }
    }

    /// Number of non-PDF files.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Number of non-PDF files with a PDF alongside.
    #[must_use]
    pub fn with_pdf(&self) -> usize {
        self.entries.iter().filter(|e| e.has_pdf).count()
    }

    /// Write one line per file followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for entry in &self.entries {
            let status = if entry.has_pdf { "yes" } else { "no" };
            writeln!(out, "{} | pdf: {}", entry.path.display(), status)?;
        }
        writeln!(out, "Non-PDF files: {}", self.total())?;
        writeln!(out, "With PDF counterpart: {}", self.with_pdf())?;
        Ok(())
    }
}

fn is_pdf(entry: &FileEntry) -> bool {
    entry.extension().eq_ignore_ascii_case(".pdf")
}

fn pdf_counterpart(entry: &FileEntry) -> PathBuf {
    let stem = Path::new(&entry.name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    entry.parent_dir.join(format!("{stem}.pdf"))
}
