// src/exec/backend.rs

//! Pluggable change handler abstraction.
//!
//! The watch loop talks to a `ChangeHandler` and never cares what it does
//! with a change set. Production uses [`CommandHandler`](super::CommandHandler)
//! or [`LogHandler`]; tests pass closures or recording fakes.

use anyhow::Result;
use tracing::info;

use crate::snapshot::ChangeSet;

/// Receives every non-empty change set.
///
/// The return value decides whether watching continues:
/// - `Ok(true)`: keep watching.
/// - `Ok(false)`: stop the loop.
/// - `Err(_)` (or a panic): logged by the loop, which then keeps watching.
pub trait ChangeHandler: Send {
    fn on_change(&mut self, changes: &ChangeSet) -> Result<bool>;
}

impl<F> ChangeHandler for F
where
    F: FnMut(&ChangeSet) -> Result<bool> + Send,
{
    fn on_change(&mut self, changes: &ChangeSet) -> Result<bool> {
        self(changes)
    }
}

/// Handler used when no command is configured: log and keep going.
#[derive(Debug, Clone, Default)]
pub struct LogHandler;

impl ChangeHandler for LogHandler {
    fn on_change(&mut self, changes: &ChangeSet) -> Result<bool> {
        for path in changes.sorted_added() {
            info!(path = %path.display(), "added");
        }
        for path in changes.sorted_deleted() {
            info!(path = %path.display(), "deleted");
        }
        for path in changes.sorted_modified() {
            info!(path = %path.display(), "modified");
        }
        Ok(true)
    }
}
