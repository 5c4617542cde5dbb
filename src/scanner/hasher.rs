//! Streaming file hasher.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing 256-bit
//! cryptographic digests of file contents. Files are read in fixed-size
//! chunks and fed to the digest incrementally, so memory use does not depend
//! on file size.
//!
//! Two algorithms are supported:
//! - [`HashAlgorithm::Blake3`] (default)
//! - [`HashAlgorithm::Sha256`], for digests that match `sha256sum`
//!
//! # Example
//!
//! ```no_run
//! use fileman::scanner::{hash_to_hex, HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(HashAlgorithm::Sha256);
//! let digest = hasher.full_hash(Path::new("report.pdf")).unwrap();
//! println!("{}", hash_to_hex(&digest));
//! ```

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::HashError;

/// 32-byte content digest.
pub type Digest = [u8; 32];

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Largest read buffer a hasher allocates (64 MiB).
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Content hash algorithm.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3
    #[default]
    Blake3,
    /// SHA-256
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Incremental state for one digest computation.
enum DigestState {
    Blake3(Box<blake3::Hasher>),
    Sha256(sha2::Sha256),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Blake3(h) => {
                h.update(bytes);
            }
            Self::Sha256(h) => h.update(bytes),
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Blake3(h) => *h.finalize().as_bytes(),
            Self::Sha256(h) => h.finalize().into(),
        }
    }
}

/// Streaming file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    buffer_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl Hasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            buffer_size: DEFAULT_BUFFER_SIZE,
            shutdown_flag: None,
        }
    }

    /// Set the read buffer size, clamped to `1..=MAX_BUFFER_SIZE`.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.clamp(1, MAX_BUFFER_SIZE);
        self
    }

    /// Set the shutdown flag. It is checked between chunks.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Algorithm used by this hasher.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash the full content of a file.
    ///
    /// # Errors
    ///
    /// - [`HashError::NotFound`] / [`HashError::PermissionDenied`] when the
    ///   file cannot be opened
    /// - [`HashError::Io`] on any read failure, including mid-file
    /// - [`HashError::Interrupted`] if shutdown was requested
    pub fn full_hash(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(path, file)
    }

    /// Hash everything readable from `reader`. `path` is only used for errors.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::full_hash`], minus the open failures.
    pub fn hash_reader<R: Read>(&self, path: &Path, mut reader: R) -> Result<Digest, HashError> {
        let mut state = DigestState::new(self.algorithm);
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            state.update(&buffer[..bytes_read]);
        }

        Ok(state.finalize())
    }
}

/// Convert a digest to a lowercase hexadecimal string.
#[must_use]
pub fn hash_to_hex(hash: &Digest) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse a 64-character hexadecimal string back into a digest.
///
/// Returns `None` for wrong lengths or non-hex characters.
#[must_use]
pub fn hex_to_hash(hex: &str) -> Option<Digest> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    let mut hash = [0u8; 32];
    for (i, byte) in hash.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(hash)
}
