// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod snapshot;
pub mod types;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_raw_or_default, ConfigFile};
use crate::engine::{
    relay_interrupts, InterruptOutcome, Runtime, RuntimeOptions, StopReason, WatchCore,
    FORCED_EXIT_CODE,
};
use crate::exec::{ChangeHandler, CommandHandler, LogHandler};
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - the initial snapshot (fatal on failure)
/// - the change handler (shell command or log-only)
/// - Ctrl-C handling
/// - the polling runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_raw_or_default(args.config.as_deref())?;
    args.apply_to(&mut raw);
    let cfg = ConfigFile::try_from(raw)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let core = {
        let fs = Arc::clone(&fs);
        let spec = cfg.watch_spec();
        tokio::task::spawn_blocking(move || WatchCore::start(fs.as_ref(), spec))
            .await
            .map_err(|e| anyhow!("initial scan aborted: {e}"))??
    };

    // First Ctrl-C → graceful shutdown, second → exit without waiting.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if relay_interrupts(tokio::signal::ctrl_c, shutdown_tx).await == InterruptOutcome::Forced {
            std::process::exit(FORCED_EXIT_CODE);
        }
    });

    let options = RuntimeOptions {
        interval: cfg.interval,
    };

    let reason = match cfg.on_change.cmd.clone() {
        Some(cmd) => {
            let handler = CommandHandler::new(cmd, cfg.on_change.stop_on_failure);
            watch(core, fs, handler, options, shutdown_rx).await?
        }
        None => watch(core, fs, LogHandler, options, shutdown_rx).await?,
    };

    info!(?reason, "pollwatch finished");
    Ok(())
}

async fn watch<H: ChangeHandler + 'static>(
    core: WatchCore,
    fs: Arc<dyn FileSystem>,
    handler: H,
    options: RuntimeOptions,
    shutdown_rx: mpsc::Receiver<()>,
) -> Result<StopReason> {
    let runtime = Runtime::new(core, fs, handler, options, shutdown_rx);
    Ok(runtime.run().await?)
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("pollwatch dry-run");
    println!("  roots:");
    for root in &cfg.roots {
        println!("    - {}", root.display());
    }
    println!("  pattern: {}", cfg.pattern);
    println!("  fingerprint: {}", cfg.mode);
    println!("  interval: {:?}", cfg.interval);
    println!("  recursive: {}", cfg.recursive);
    match &cfg.on_change.cmd {
        Some(cmd) => {
            println!("  on_change.cmd: {cmd}");
            println!("  on_change.stop_on_failure: {}", cfg.on_change.stop_on_failure);
        }
        None => println!("  on_change: log only"),
    }

    debug!("dry-run complete (no watching)");
}
