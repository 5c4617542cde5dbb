//! Diagnostic logging.
//!
//! Diagnostics go through the `log` facade to stderr via `env_logger`. They
//! are separate from the report lines each command prints. The level comes
//! from, in priority order:
//!
//! 1. `RUST_LOG`, if set
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Info otherwise
//!
//! Debug builds prefix each line with a timestamp (and the module path with
//! `-v`); release builds print the level and message only.
//!
//! ```rust,no_run
//! use fileman::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initialize the logger from the CLI verbosity flags.
///
/// Call once per process; later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    let from_env = env::var("RUST_LOG").is_ok();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_ok() {
        log::debug!(
            "Logging initialized at level {} ({})",
            current_level_name(),
            if from_env { "RUST_LOG" } else { "flags" }
        );
    }
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_seconds(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} {}",
                buf.timestamp_seconds(),
                level,
                record.args()
            )
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });
}

/// Name of the active maximum log level.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
