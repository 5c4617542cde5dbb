//! Directory tree printer.
//!
//! ```text
//! 📂 project
//!   📁 src
//!     📄 main.rs
//!   📄 Cargo.toml
//! ```
//!
//! Siblings are sorted by name (case-insensitive first, then exact), or
//! directories first when requested. Symlinks are listed as files and not
//! followed. A directory that cannot be read is reported on the error
//! writer and skipped.

use std::cmp::Ordering;
use std::io::{self, Write};
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

/// Options for [`print_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeOptions {
    /// Deepest level printed; children of the root are level 1
    pub depth: Option<usize>,
    /// List directories before files
    pub dirs_first: bool,
}

/// Counts from one tree print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Directories printed
    pub dirs: usize,
    /// Files (and other non-directories) printed
    pub files: usize,
    /// Directories that could not be read
    pub unreadable: usize,
}

fn compare(a: &DirEntry, b: &DirEntry, dirs_first: bool) -> Ordering {
    let by_kind = if dirs_first {
        b.file_type().is_dir().cmp(&a.file_type().is_dir())
    } else {
        Ordering::Equal
    };
    let an = a.file_name().to_string_lossy();
    let bn = b.file_name().to_string_lossy();
    by_kind
        .then_with(|| an.to_lowercase().cmp(&bn.to_lowercase()))
        .then_with(|| an.cmp(&bn))
}

/// Print the tree rooted at `root`.
///
/// `root` is expected to be an existing directory.
///
/// # Errors
///
/// Returns an error only if writing to `out` or `err` fails.
pub fn print_tree<W: Write, E: Write>(
    root: &Path,
    options: TreeOptions,
    out: &mut W,
    err: &mut E,
) -> io::Result<TreeStats> {
    let name = root
        .file_name()
        .map_or_else(|| root.to_string_lossy(), |n| n.to_string_lossy());
    writeln!(out, "📂 {name}")?;

    let mut stats = TreeStats::default();
    let dirs_first = options.dirs_first;
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(options.depth.unwrap_or(usize::MAX))
        .follow_links(false)
        .sort_by(move |a, b| compare(a, b, dirs_first));

    for entry in walker {
        match entry {
            Ok(entry) => {
                let is_dir = entry.file_type().is_dir();
                let icon = if is_dir { "📁" } else { "📄" };
                if is_dir {
                    stats.dirs += 1;
                } else {
                    stats.files += 1;
                }
                writeln!(
                    out,
                    "{}{} {}",
                    "  ".repeat(entry.depth()),
                    icon,
                    entry.file_name().to_string_lossy()
                )?;
            }
            Err(e) => {
                stats.unreadable += 1;
                let path = e.path().unwrap_or(root);
                let reason = e
                    .io_error()
                    .map_or_else(|| e.to_string(), ToString::to_string);
                writeln!(err, "Cannot read: {}: {}", path.display(), reason)?;
            }
        }
    }

    Ok(stats)
}
