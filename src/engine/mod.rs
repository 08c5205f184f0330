// src/engine/mod.rs

//! The polling watch loop.
//!
//! Two layers, same split as everywhere else in this crate:
//! - [`core`]: a synchronous state machine that owns the previous snapshot,
//!   diffs each new scan against it and consults the change handler. It does
//!   no sleeping and knows nothing about Tokio.
//! - [`runtime`]: the async shell that sleeps for the polling interval,
//!   listens for shutdown, and runs each blocking scan step on the blocking
//!   thread pool.
//!
//! [`interrupt`] maps Ctrl-C onto the runtime's shutdown channel.

use std::time::Duration;

/// Polling interval used when nothing else is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// State of a watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Running,
    /// Terminal. A stopped core never scans or calls the handler again.
    Stopped,
}

/// Why [`Runtime::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The change handler returned something other than "keep watching".
    HandlerDeclined,
    /// A shutdown signal (e.g. Ctrl-C) arrived while waiting for the next poll.
    Interrupted,
}

/// Runtime options for the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Time slept before every scan. Trades detection latency for I/O load.
    pub interval: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub mod core;
pub mod interrupt;
pub mod runtime;

pub use self::core::WatchCore;
pub use interrupt::{relay_interrupts, InterruptOutcome, FORCED_EXIT_CODE};
pub use runtime::Runtime;
