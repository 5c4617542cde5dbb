//! Content-hash deduplication of a single directory.
//!
//! # Overview
//!
//! [`Deduplicator::run`] is a single pass over the immediate children of a
//! directory:
//! 1. **Enumerate**: regular files directly inside the root (no recursion)
//! 2. **Hash**: stream every file through the configured digest
//! 3. **Group**: bucket by digest; buckets of two or more are duplicates
//! 4. **Resolve**: the first member of each group is kept, the rest are
//!    deletion candidates
//! 5. **Delete** (optional): unlink candidates, or only announce them under
//!    dry-run
//!
//! A file that cannot be hashed is left out of every group and reported;
//! a candidate that cannot be deleted is reported. Neither stops the run.
//!
//! # Example
//!
//! ```no_run
//! use fileman::duplicates::{CollectingSink, DedupeOptions, Deduplicator};
//! use std::path::Path;
//!
//! let options = DedupeOptions::default().with_delete(true).with_dry_run(true);
//! let sink = CollectingSink::new();
//! let report = Deduplicator::new(options).run(Path::new("."), &sink).unwrap();
//!
//! for line in sink.lines() {
//!     println!("{line}");
//! }
//! println!("{} files would be deleted", report.would_delete);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::events::{DedupeEvent, EventSink, MemberRole};
use super::groups::{duplicate_groups, group_by_digest, HashGroup};
use crate::actions::delete::delete_file;
use crate::progress::ProgressCallback;
use crate::scanner::{
    ensure_directory, Digest, FileEntry, HashAlgorithm, HashError, Hasher, ScanError, Walker,
    DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE,
};

/// Options for one dedupe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeOptions {
    /// Remove deletion candidates
    pub delete: bool,
    /// Announce deletions without performing them
    pub dry_run: bool,
    /// Content digest
    pub algorithm: HashAlgorithm,
    /// Hashing threads; 1 hashes sequentially on the calling thread
    pub hash_threads: usize,
    /// Read buffer size for hashing
    pub buffer_size: usize,
}

impl Default for DedupeOptions {
    fn default() -> Self {
        Self {
            delete: false,
            dry_run: false,
            algorithm: HashAlgorithm::default(),
            hash_threads: 1,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl DedupeOptions {
    /// Set whether candidates are deleted.
    #[must_use]
    pub fn with_delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    /// Set dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the number of hashing threads (clamped to at least 1).
    #[must_use]
    pub fn with_hash_threads(mut self, threads: usize) -> Self {
        self.hash_threads = threads.max(1);
        self
    }

    /// Set the hashing buffer size, clamped to `1..=MAX_BUFFER_SIZE`.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.clamp(1, MAX_BUFFER_SIZE);
        self
    }

    /// Whether this run mutates the filesystem.
    #[must_use]
    pub fn deletes_files(&self) -> bool {
        self.delete && !self.dry_run
    }
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every file was hashed and every requested deletion succeeded
    Clean,
    /// The run finished but some files could not be hashed or deleted
    CompletedWithWarnings,
    /// Shutdown was requested before the run finished
    Interrupted,
}

/// Counts and groups produced by a dedupe run.
#[derive(Debug, Clone, Default)]
pub struct DedupeReport {
    /// Directory that was deduplicated
    pub root: PathBuf,
    /// Digest used
    pub algorithm: HashAlgorithm,
    /// Regular files found in the root
    pub files_scanned: usize,
    /// Files hashed successfully
    pub files_hashed: usize,
    /// Files that could not be hashed
    pub hash_failures: usize,
    /// Groups with two or more members
    pub duplicate_groups: usize,
    /// Non-keeper members across all groups
    pub duplicate_files: usize,
    /// Bytes held by non-keeper members
    pub reclaimable_bytes: u64,
    /// Whether deletion was requested
    pub delete_requested: bool,
    /// Whether deletions were only announced
    pub dry_run: bool,
    /// Files actually removed
    pub deleted: usize,
    /// Files that would have been removed without dry-run
    pub would_delete: usize,
    /// Candidates that could not be removed
    pub delete_failures: usize,
    /// Bytes actually freed
    pub bytes_freed: u64,
    /// Whether shutdown cut the run short
    pub interrupted: bool,
    /// Duplicate groups in order of first appearance
    pub groups: Vec<HashGroup>,
    /// Wall-clock time of the run
    pub duration: Duration,
}

impl DedupeReport {
    /// Derive the run status from the counters.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        if self.interrupted {
            RunStatus::Interrupted
        } else if self.hash_failures > 0 || self.delete_failures > 0 {
            RunStatus::CompletedWithWarnings
        } else {
            RunStatus::Clean
        }
    }

    /// Reclaimable space in human-readable form.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_bytes).to_string()
    }
}

/// Fatal errors for a dedupe run. Per-file failures are never fatal.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The root does not exist.
    #[error("Directory not found: {0}")]
    PathNotFound(PathBuf),

    /// The root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root could not be inspected.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl From<ScanError> for FinderError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotFound(path) => Self::PathNotFound(path),
            ScanError::NotADirectory(path) => Self::NotADirectory(path),
            ScanError::Io { path, source } => Self::Io { path, source },
        }
    }
}

/// Finds and optionally removes duplicate files.
pub struct Deduplicator {
    options: DedupeOptions,
    hasher: Hasher,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Deduplicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deduplicator")
            .field("options", &self.options)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Deduplicator {
    /// Create a deduplicator with the given options.
    #[must_use]
    pub fn new(options: DedupeOptions) -> Self {
        let hasher = Hasher::new(options.algorithm).with_buffer_size(options.buffer_size);
        Self {
            options,
            hasher,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Stop at the next file or deletion once `flag` is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.hasher = self.hasher.with_shutdown_flag(Arc::clone(&flag));
        self.shutdown_flag = Some(flag);
        self
    }

    /// Report hashing progress to `callback`.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Options this deduplicator was built with.
    #[must_use]
    pub fn options(&self) -> &DedupeOptions {
        &self.options
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Deduplicate the regular files directly inside `root`.
    ///
    /// Every designation, deletion and failure is emitted to `sink` as it
    /// happens.
    ///
    /// # Errors
    ///
    /// Only an invalid root is fatal: [`FinderError::PathNotFound`],
    /// [`FinderError::NotADirectory`] or [`FinderError::Io`].
    pub fn run(&self, root: &Path, sink: &dyn EventSink) -> Result<DedupeReport, FinderError> {
        let root = ensure_directory(root)?;

        let mut walker = Walker::new(&root).recursive(false);
        if let Some(ref flag) = self.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        let files: Vec<FileEntry> = walker
            .walk()
            .filter(FileEntry::is_regular_file)
            .collect();

        log::info!(
            "Deduplicating {} files in {} ({})",
            files.len(),
            root.display(),
            self.options.algorithm
        );

        let mut report = self.run_on_files(files, sink);
        report.root = root;
        Ok(report)
    }

    /// Deduplicate an already enumerated list of files.
    ///
    /// The order of `files` is the enumeration order: it decides which
    /// member of each group is kept.
    pub fn run_on_files(&self, files: Vec<FileEntry>, sink: &dyn EventSink) -> DedupeReport {
        let start = Instant::now();
        let mut report = DedupeReport {
            algorithm: self.options.algorithm,
            files_scanned: files.len(),
            delete_requested: self.options.delete,
            dry_run: self.options.dry_run,
            ..DedupeReport::default()
        };

        let hashed = self.hash_files(files, sink, &mut report);
        if self.is_shutdown_requested() {
            report.interrupted = true;
        }
        let groups = duplicate_groups(group_by_digest(hashed));

        report.duplicate_groups = groups.len();
        report.duplicate_files = groups.iter().map(|g| g.candidates().len()).sum();
        report.reclaimable_bytes = groups.iter().map(HashGroup::wasted_space).sum();

        if report.interrupted {
            log::warn!("Hashing interrupted; skipping duplicate resolution");
            report.groups = groups;
            report.duration = start.elapsed();
            return report;
        }

        for group in &groups {
            self.resolve_group(group, sink, &mut report);
            if report.interrupted {
                break;
            }
        }

        if self.options.deletes_files() {
            sink.emit(&DedupeEvent::Summary {
                deleted: report.deleted,
            });
        }

        report.groups = groups;
        report.duration = start.elapsed();

        log::info!(
            "Found {} duplicate groups ({} duplicates, {} reclaimable) in {:.2?}",
            report.duplicate_groups,
            report.duplicate_files,
            report.reclaimable_display(),
            report.duration
        );

        report
    }

    fn hash_files(
        &self,
        files: Vec<FileEntry>,
        sink: &dyn EventSink,
        report: &mut DedupeReport,
    ) -> Vec<(FileEntry, Digest)> {
        let total = files.len();
        let mut hashed = Vec::with_capacity(total);

        if let Some(ref cb) = self.progress_callback {
            cb.on_phase_start("hashing", total);
        }

        if self.options.hash_threads > 1 {
            self.hash_parallel(files, sink, report, &mut hashed);
        } else {
            for (i, file) in files.into_iter().enumerate() {
                if self.is_shutdown_requested() {
                    report.interrupted = true;
                    break;
                }
                if let Some(ref cb) = self.progress_callback {
                    cb.on_progress(i + 1, &file.path.to_string_lossy());
                }
                let result = self.hasher.full_hash(&file.path);
                self.record_hash(file, result, sink, report, &mut hashed);
            }
        }

        if let Some(ref cb) = self.progress_callback {
            cb.on_phase_end("hashing");
        }

        hashed
    }

    /// Hash on a dedicated pool. Workers send results back over a channel and
    /// the calling thread records them in input order as soon as each prefix
    /// is complete, so failures are reported while hashing continues and the
    /// output matches a sequential run.
    fn hash_parallel(
        &self,
        files: Vec<FileEntry>,
        sink: &dyn EventSink,
        report: &mut DedupeReport,
        hashed: &mut Vec<(FileEntry, Digest)>,
    ) {
        let threads = self.options.hash_threads;

        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.in_place_scope(|scope| {
                self.stream_hashes(scope, files, sink, report, hashed);
            }),
            Err(e) => {
                log::warn!("Failed to build {threads}-thread hashing pool: {e}; using global pool");
                rayon::in_place_scope(|scope| {
                    self.stream_hashes(scope, files, sink, report, hashed);
                });
            }
        }
    }

    fn stream_hashes<'s>(
        &'s self,
        scope: &rayon::Scope<'s>,
        files: Vec<FileEntry>,
        sink: &dyn EventSink,
        report: &mut DedupeReport,
        hashed: &mut Vec<(FileEntry, Digest)>,
    ) {
        let (tx, rx) = mpsc::channel();

        scope.spawn(move |_| {
            let counter = AtomicUsize::new(0);
            let sent = files
                .into_par_iter()
                .enumerate()
                .try_for_each_with(tx, |tx, (index, file)| {
                    let (file, result) = self.hash_one(file, &counter);
                    tx.send((index, file, result))
                });
            if let Err(e) = sent {
                log::debug!("Hash results dropped: {e}");
            }
        });

        let mut pending = BTreeMap::new();
        let mut next = 0;
        for (index, file, result) in rx {
            pending.insert(index, (file, result));
            while let Some((file, result)) = pending.remove(&next) {
                self.record_hash(file, result, sink, report, hashed);
                next += 1;
            }
        }
    }

    fn hash_one(
        &self,
        file: FileEntry,
        counter: &AtomicUsize,
    ) -> (FileEntry, Result<Digest, HashError>) {
        if self.is_shutdown_requested() {
            let path = file.path.clone();
            return (file, Err(HashError::Interrupted(path)));
        }
        let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref cb) = self.progress_callback {
            cb.on_progress(current, &file.path.to_string_lossy());
        }
        let result = self.hasher.full_hash(&file.path);
        (file, result)
    }

    fn record_hash(
        &self,
        file: FileEntry,
        result: Result<Digest, HashError>,
        sink: &dyn EventSink,
        report: &mut DedupeReport,
        hashed: &mut Vec<(FileEntry, Digest)>,
    ) {
        match result {
            Ok(digest) => {
                report.files_hashed += 1;
                if let Some(ref cb) = self.progress_callback {
                    cb.on_item_completed(file.metadata.size);
                }
                hashed.push((file, digest));
            }
            Err(HashError::Interrupted(_)) => {
                report.interrupted = true;
            }
            Err(e) => {
                log::warn!("Failed to hash {}: {}", file.path.display(), e);
                report.hash_failures += 1;
                sink.emit(&DedupeEvent::HashFailed {
                    path: file.path,
                    error: e.reason(),
                });
            }
        }
    }

    fn resolve_group(&self, group: &HashGroup, sink: &dyn EventSink, report: &mut DedupeReport) {
        sink.emit(&DedupeEvent::GroupHeader {
            digest: group.digest,
        });
        for (i, member) in group.members.iter().enumerate() {
            let role = if i == 0 {
                MemberRole::Keep
            } else {
                MemberRole::Duplicate
            };
            sink.emit(&DedupeEvent::Member {
                path: member.path.clone(),
                role,
            });
        }

        if !self.options.delete {
            return;
        }

        for candidate in group.candidates() {
            if self.is_shutdown_requested() {
                report.interrupted = true;
                return;
            }
            self.remove_candidate(candidate, sink, report);
        }
    }

    fn remove_candidate(&self, candidate: &FileEntry, sink: &dyn EventSink, report: &mut DedupeReport) {
        if self.options.dry_run {
            report.would_delete += 1;
            sink.emit(&DedupeEvent::DryRunDelete {
                path: candidate.path.clone(),
            });
            return;
        }

        match delete_file(&candidate.path) {
            Ok(result) => {
                report.deleted += 1;
                report.bytes_freed += result.size;
                sink.emit(&DedupeEvent::Deleted { path: result.path });
            }
            Err(e) => {
                report.delete_failures += 1;
                sink.emit(&DedupeEvent::DeleteFailed {
                    path: candidate.path.clone(),
                    error: e.reason(),
                });
            }
        }
    }
}
