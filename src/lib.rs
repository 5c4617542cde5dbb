//! fileman - file organization toolkit
//!
//! Finds and optionally removes byte-identical files in a directory, and
//! offers a few companion commands for tidying a folder: sorting files into
//! an `organized/` tree, regex renaming, removing empty directories, printing
//! a directory tree and auditing which documents have a PDF export.
//!
//! The binary is a thin wrapper around [`run_app`]; every engine is usable as
//! a library through its module.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::Context;

use crate::actions::{EmptyDirCleaner, Organizer, RenameOptions, Renamer};
use crate::cli::{
    AuditArgs, CleanEmptyArgs, Cli, Commands, DedupeArgs, OrganizeArgs, OutputFormat, RenameArgs,
    TreeArgs,
};
use crate::config::Config;
use crate::duplicates::{CollectingSink, Deduplicator};
use crate::error::ExitCode;
use crate::output::{print_tree, JsonOutput, PdfAudit, StdioSink, TreeOptions};
use crate::progress::Progress;
use crate::scanner::ensure_directory;
use crate::signal::ShutdownHandler;

/// Settings shared by every subcommand.
struct AppContext {
    config: Config,
    shutdown: ShutdownHandler,
    sink: StdioSink,
    quiet: bool,
}

/// Run one fileman invocation.
///
/// Report lines are written to stdout (failures to stderr) as they happen.
/// The returned code reflects per-file failures and interruption.
///
/// # Errors
///
/// Returns an error when the command cannot run at all: a missing or
/// non-directory target, an invalid rename pattern, or a failed signal
/// handler installation.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref());
    log::debug!("Effective configuration: {config:?}");

    let shutdown = signal::install_handler().context("Could not set up Ctrl+C handling")?;
    let color = !cli.no_color && io::stdout().is_terminal();
    let ctx = AppContext {
        config,
        shutdown,
        sink: StdioSink::new(color),
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Dedupe(args) => run_dedupe(ctx, &args),
        Commands::Organize(args) => run_organize(ctx, &args),
        Commands::Tree(args) => run_tree(&args),
        Commands::CleanEmpty(args) => run_clean_empty(&ctx, &args),
        Commands::Rename(args) => run_rename(&ctx, &args),
        Commands::AuditNonpdf(args) => run_audit(&args),
    }
}

fn run_dedupe(mut ctx: AppContext, args: &DedupeArgs) -> anyhow::Result<ExitCode> {
    ctx.config.merge_dedupe_args(args);
    let options = ctx.config.dedupe_options(args);
    let json = args.output == OutputFormat::Json;

    let progress = Progress::new(ctx.quiet || json || !ctx.config.progress);
    let dedupe = Deduplicator::new(options)
        .with_shutdown_flag(ctx.shutdown.get_flag())
        .with_progress_callback(Arc::new(progress));

    if json {
        let sink = CollectingSink::new();
        let report = dedupe.run(&args.dir, &sink)?;
        let code = ExitCode::from_report(&report);
        let output = JsonOutput::new(&report, &sink.events(), code);
        output
            .write_to(&mut io::stdout().lock(), true)
            .context("Failed to write JSON report")?;
        return Ok(code);
    }

    let report = dedupe.run(&args.dir, &ctx.sink)?;
    log::info!(
        "{} duplicate groups, {} reclaimable, finished in {:.2?}",
        report.duplicate_groups,
        report.reclaimable_display(),
        report.duration
    );
    Ok(ExitCode::from_report(&report))
}

fn run_organize(mut ctx: AppContext, args: &OrganizeArgs) -> anyhow::Result<ExitCode> {
    ctx.config.merge_organize_args(args);
    let organizer = Organizer::new(ctx.config.organize_options(args))
        .with_shutdown_flag(ctx.shutdown.get_flag());
    let report = organizer.run(&args.dir, &ctx.sink)?;
    Ok(ExitCode::from_outcome(report.interrupted, report.has_warnings()))
}

fn run_tree(args: &TreeArgs) -> anyhow::Result<ExitCode> {
    let root = ensure_directory(&args.dir)?;
    let options = TreeOptions {
        depth: args.depth,
        dirs_first: args.dirs_first,
    };
    let stats = print_tree(
        &root,
        options,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
    .or_else(ignore_broken_pipe)?;
    log::debug!("Tree: {} dirs, {} files", stats.dirs, stats.files);
    Ok(ExitCode::from_outcome(false, stats.unreadable > 0))
}

fn run_clean_empty(ctx: &AppContext, args: &CleanEmptyArgs) -> anyhow::Result<ExitCode> {
    let cleaner = EmptyDirCleaner::new()
        .with_dry_run(args.dry_run)
        .with_shutdown_flag(ctx.shutdown.get_flag());
    let report = cleaner.run(&args.dir, &ctx.sink)?;
    log::debug!("{} empty directories handled", report.removed.len());
    Ok(ExitCode::from_outcome(report.interrupted, false))
}

fn run_rename(ctx: &AppContext, args: &RenameArgs) -> anyhow::Result<ExitCode> {
    let dir = args.target();
    // A bad directory is reported before a bad pattern.
    ensure_directory(dir)?;
    let options = RenameOptions::new(args.pattern.as_str(), args.replace.as_str())
        .with_extension(args.ext.clone())
        .with_dry_run(args.dry_run);
    let report = Renamer::new(options)?.run(dir, &ctx.sink)?;
    Ok(ExitCode::from_outcome(false, report.has_warnings()))
}

fn run_audit(args: &AuditArgs) -> anyhow::Result<ExitCode> {
    let root = ensure_directory(args.target())?;
    let audit = PdfAudit::run(&root, args.recursive);
    audit
        .write_to(&mut io::stdout().lock())
        .or_else(ignore_broken_pipe)?;
    Ok(ExitCode::Success)
}

fn ignore_broken_pipe<T: Default>(err: io::Error) -> io::Result<T> {
    if err.kind() == io::ErrorKind::BrokenPipe {
        Ok(T::default())
    } else {
        Err(err)
    }
}
