//! DirMirror command-line tool.
//!
//! Mirrors the top-level files of a source directory into a replica
//! directory on a fixed interval for a fixed number of passes, logging
//! every create, update and delete to a file and to stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dirmirror_core::config::MirrorConfig;
use dirmirror_core::scheduler::{run_scheduled, SystemClock};
use dirmirror_core::sync_engine::SyncEngine;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// DirMirror command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "dirmirror",
    version,
    about = "Periodically mirror the top-level files of one directory into another"
)]
struct Args {
    /// Directory to mirror from.
    source: PathBuf,

    /// Directory to mirror into.
    replica: PathBuf,

    /// Seconds between the start of consecutive passes.
    interval: u64,

    /// Number of passes to run before exiting.
    runs: u32,

    /// File the action log is appended to.
    log_file: PathBuf,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries the action log echo.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = MirrorConfig {
        source: args.source,
        replica: args.replica,
        interval_secs: args.interval,
        runs: args.runs,
        log_file: args.log_file,
    }
    .canonicalized()
    .context("invalid configuration")?;

    info!("Source  : {}", config.source.display());
    info!("Replica : {}", config.replica.display());
    info!("Interval: {}s", config.interval_secs);
    info!("Runs    : {}", config.runs);
    info!("Log file: {}", config.log_file.display());

    let mut engine = SyncEngine::new(&config);
    let interval = Duration::from_secs(config.interval_secs);

    run_scheduled(&SystemClock, config.runs, interval, |pass| {
        match engine.run_sync_pass() {
            Ok(stats) => {
                info!(
                    pass = pass + 1,
                    created = stats.created,
                    updated = stats.updated,
                    deleted = stats.deleted,
                    "sync pass completed"
                );
                Ok(())
            }
            // A failed stale-file deletion keeps its snapshot entry, so the
            // next pass retries it. Everything else aborts the run.
            Err(e) if e.is_retryable() => {
                error!(pass = pass + 1, error = %e, "sync pass failed, will retry next pass");
                Ok(())
            }
            Err(e) => Err(e),
        }
    })
    .context("mirroring aborted")?;

    info!("All {} passes completed", config.runs);

    Ok(())
}
