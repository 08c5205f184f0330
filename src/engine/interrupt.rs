// src/engine/interrupt.rs

use std::future::Future;
use std::io;

use tokio::sync::mpsc;
use tracing::{info, warn};

/// Exit status used when a second interrupt cuts the process short.
pub const FORCED_EXIT_CODE: i32 = 130;

/// How [`relay_interrupts`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// A second interrupt arrived while the graceful shutdown was pending.
    Forced,
    /// The interrupt source failed; no further interrupts will be seen.
    ListenerFailed,
}

/// Turn the first interrupt into a graceful shutdown request and report a
/// second one as [`InterruptOutcome::Forced`].
///
/// `next_interrupt` resolves once per interrupt; in the binary it is
/// `tokio::signal::ctrl_c`.
pub async fn relay_interrupts<F, Fut>(
    mut next_interrupt: F,
    shutdown_tx: mpsc::Sender<()>,
) -> InterruptOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(err) = next_interrupt().await {
        warn!(error = %err, "failed to listen for interrupts");
        return InterruptOutcome::ListenerFailed;
    }

    info!("interrupt received; stopping after the current poll (interrupt again to exit now)");
    // A full channel means a shutdown request is already queued.
    let _ = shutdown_tx.try_send(());

    match next_interrupt().await {
        Ok(()) => {
            warn!("second interrupt received; exiting immediately");
            InterruptOutcome::Forced
        }
        Err(err) => {
            warn!(error = %err, "failed to listen for interrupts");
            InterruptOutcome::ListenerFailed
        }
    }
}
