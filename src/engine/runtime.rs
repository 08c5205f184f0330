// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::errors::{PollwatchError, Result};
use crate::exec::ChangeHandler;
use crate::fs::FileSystem;

use super::core::WatchCore;
use super::{RuntimeOptions, StopReason, WatchState};

/// Drives a [`WatchCore`] at a fixed polling interval.
///
/// This is a pure IO shell: it sleeps, listens for shutdown, and hands each
/// blocking scan + diff + handler step to Tokio's blocking pool. The sleep is
/// the only point where a shutdown can interrupt the loop, so a step always
/// runs to completion and nothing is left half-applied.
pub struct Runtime<H: ChangeHandler + 'static> {
    core: WatchCore,
    fs: Arc<dyn FileSystem>,
    handler: H,
    options: RuntimeOptions,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<H: ChangeHandler + 'static> fmt::Debug for Runtime<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<H: ChangeHandler + 'static> Runtime<H> {
    pub fn new(
        core: WatchCore,
        fs: Arc<dyn FileSystem>,
        handler: H,
        options: RuntimeOptions,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            core,
            fs,
            handler,
            options,
            shutdown_rx,
        }
    }

    /// Main polling loop.
    ///
    /// Runs until the handler declines to continue or a shutdown message
    /// arrives. Dropping every shutdown sender simply disables interruption.
    pub async fn run(self) -> Result<StopReason> {
        let Runtime {
            mut core,
            fs,
            mut handler,
            options,
            mut shutdown_rx,
        } = self;

        info!(interval = ?options.interval, "watch loop started");

        loop {
            tokio::select! {
                _ = sleep(options.interval) => {}
                Some(()) = shutdown_rx.recv() => {
                    info!("shutdown requested; stopping watch loop");
                    return Ok(StopReason::Interrupted);
                }
            }

            let scan_fs = Arc::clone(&fs);
            let (returned_core, returned_handler, state) = tokio::task::spawn_blocking(move || {
                let state = core.poll_once(scan_fs.as_ref(), &mut handler);
                (core, handler, state)
            })
            .await
            .map_err(|e| PollwatchError::Other(anyhow!("watch step aborted: {e}")))?;

            core = returned_core;
            handler = returned_handler;

            match state {
                WatchState::Running => debug!("poll complete"),
                WatchState::Stopped => {
                    info!("watch loop exiting");
                    return Ok(StopReason::HandlerDeclined);
                }
            }
        }
    }
}
