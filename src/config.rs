//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, else `<config dir>/fileman/config.toml`)
//! 3. `FILEMAN_*` environment variables (e.g. `FILEMAN_HASH_THREADS=4`)
//! 4. Command-line flags
//!
//! A file that fails to parse is reported and ignored as a whole; the run
//! continues with defaults.
//!
//! ```toml
//! algorithm = "sha256"
//! hash_threads = 4
//! buffer_size = 131072
//! organize_dir = "sorted"
//! progress = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::organize::DEFAULT_ORGANIZE_DIR;
use crate::actions::OrganizeOptions;
use crate::cli::{DedupeArgs, OrganizeArgs};
use crate::duplicates::DedupeOptions;
use crate::scanner::{HashAlgorithm, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FILEMAN_";

const KNOWN_KEYS: [&str; 5] = [
    "algorithm",
    "hash_threads",
    "buffer_size",
    "organize_dir",
    "progress",
];

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content hash for dedupe
    pub algorithm: HashAlgorithm,
    /// Hashing threads for dedupe; 1 is sequential
    pub hash_threads: usize,
    /// Hashing read buffer in bytes
    pub buffer_size: usize,
    /// Directory name used by organize
    pub organize_dir: String,
    /// Show the progress bar while hashing
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            hash_threads: 1,
            buffer_size: DEFAULT_BUFFER_SIZE,
            organize_dir: DEFAULT_ORGANIZE_DIR.to_string(),
            progress: true,
        }
    }
}

impl Config {
    /// Default platform-specific configuration file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "fileman").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path` if given, else from the default location.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from_path(path),
            None => {
                log::debug!("No config directory on this platform; using defaults and environment");
                Self::extract(Self::figment(None), "environment")
            }
        }
    }

    /// Load configuration from a specific TOML file plus the environment.
    ///
    /// A missing file is not an error.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            log::debug!("Loading config from {}", path.display());
            warn_unknown_keys(path);
        }
        Self::extract(Self::figment(Some(path)), &path.display().to_string())
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn extract(figment: Figment, source: &str) -> Self {
        match figment.extract::<Self>() {
            Ok(config) => config.validated(),
            Err(e) => {
                log::warn!("Invalid configuration ({source}): {e}; using defaults");
                Self::default()
            }
        }
    }

    /// Replace out-of-range values with defaults.
    #[must_use]
    fn validated(mut self) -> Self {
        if self.hash_threads == 0 {
            log::warn!("hash_threads must be at least 1; using 1");
            self.hash_threads = 1;
        }
        if self.buffer_size == 0 {
            log::warn!("buffer_size must be positive; using {DEFAULT_BUFFER_SIZE}");
            self.buffer_size = DEFAULT_BUFFER_SIZE;
        }
        if self.buffer_size > MAX_BUFFER_SIZE {
            log::warn!(
                "buffer_size {} exceeds the {MAX_BUFFER_SIZE}-byte maximum; using the maximum",
                self.buffer_size
            );
            self.buffer_size = MAX_BUFFER_SIZE;
        }
        if self.organize_dir.is_empty()
            || self.organize_dir.contains(std::path::is_separator)
            || self.organize_dir == ".."
        {
            log::warn!(
                "organize_dir '{}' is not a plain directory name; using '{DEFAULT_ORGANIZE_DIR}'",
                self.organize_dir
            );
            self.organize_dir = DEFAULT_ORGANIZE_DIR.to_string();
        }
        self
    }

    /// Apply dedupe flags given on the command line.
    pub fn merge_dedupe_args(&mut self, args: &DedupeArgs) {
        if let Some(algorithm) = args.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(threads) = args.hash_threads {
            self.hash_threads = usize::from(threads);
        }
        if let Some(size) = args.buffer_size {
            let size = usize::try_from(size).unwrap_or(usize::MAX);
            if size > MAX_BUFFER_SIZE {
                log::warn!(
                    "--buffer-size {size} exceeds the {MAX_BUFFER_SIZE}-byte maximum; using the maximum"
                );
            }
            self.buffer_size = size.clamp(1, MAX_BUFFER_SIZE);
        }
        if args.no_progress {
            self.progress = false;
        }
    }

    /// Apply organize flags given on the command line.
    pub fn merge_organize_args(&mut self, args: &OrganizeArgs) {
        if let Some(ref name) = args.organize_dir {
            self.organize_dir.clone_from(name);
            *self = self.clone().validated();
        }
    }

    /// Dedupe options for this configuration and the given flags.
    #[must_use]
    pub fn dedupe_options(&self, args: &DedupeArgs) -> DedupeOptions {
        DedupeOptions::default()
            .with_delete(args.delete)
            .with_dry_run(args.dry_run)
            .with_algorithm(self.algorithm)
            .with_hash_threads(self.hash_threads)
            .with_buffer_size(self.buffer_size)
    }

    /// Organize options for this configuration and the given flags.
    #[must_use]
    pub fn organize_options(&self, args: &OrganizeArgs) -> OrganizeOptions {
        OrganizeOptions::default()
            .with_mode(args.by)
            .with_recursive(args.recursive)
            .with_dry_run(args.dry_run)
            .with_organize_dir(self.organize_dir.clone())
    }
}

fn warn_unknown_keys(path: &Path) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        // Reported by the figment extraction.
        return;
    };
    for key in table.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        log::warn!("Unknown configuration key '{}' in {}", key, path.display());
    }
}
