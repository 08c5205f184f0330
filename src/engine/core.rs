// src/engine/core.rs

//! Synchronous core of the watch loop.
//!
//! One call to [`WatchCore::step`] is one RUNNING iteration minus the sleep:
//! diff against the previous snapshot, call the handler if anything changed,
//! then either keep the new snapshot or stop for good.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::errors::{PollwatchError, Result};
use crate::exec::ChangeHandler;
use crate::fs::FileSystem;
use crate::snapshot::{diff, ChangeSet, Snapshot, WatchSpec};

use super::WatchState;

/// Watch loop state: the spec being watched and the last snapshot taken.
///
/// The previous snapshot is owned here and nowhere else; the handler only
/// ever sees the derived [`ChangeSet`].
#[derive(Debug)]
pub struct WatchCore {
    spec: WatchSpec,
    previous: Snapshot,
    state: WatchState,
}

impl WatchCore {
    /// Validate the roots and take the initial snapshot.
    ///
    /// Unlike later scans, any problem here is fatal: a root that is missing,
    /// not a directory, or cannot be listed fails startup.
    pub fn start(fs: &dyn FileSystem, mut spec: WatchSpec) -> Result<Self> {
        if spec.roots.is_empty() {
            return Err(PollwatchError::ConfigError(
                "at least one root to watch is required".to_string(),
            ));
        }

        let mut roots = Vec::with_capacity(spec.roots.len());
        for root in &spec.roots {
            if !fs.exists(root) {
                return Err(PollwatchError::RootNotFound(root.clone()));
            }
            if !fs.is_dir(root) {
                return Err(PollwatchError::RootNotDirectory(root.clone()));
            }
            roots.push(fs.canonicalize(root)?);
        }
        spec.roots = roots;

        let previous = Snapshot::capture(fs, &spec)?;
        info!(
            roots = ?spec.roots,
            pattern = %spec.pattern,
            mode = %spec.mode,
            recursive = spec.recursive,
            entries = previous.len(),
            "initial snapshot taken"
        );

        Ok(Self::from_snapshot(spec, previous))
    }

    /// Seed a core with an already captured snapshot.
    pub fn from_snapshot(spec: WatchSpec, previous: Snapshot) -> Self {
        Self {
            spec,
            previous,
            state: WatchState::Running,
        }
    }

    pub fn spec(&self) -> &WatchSpec {
        &self.spec
    }

    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Rescan the roots and run one step against the result.
    pub fn poll_once(&mut self, fs: &dyn FileSystem, handler: &mut dyn ChangeHandler) -> WatchState {
        if self.state == WatchState::Stopped {
            return WatchState::Stopped;
        }
        let current = Snapshot::rescan(fs, &self.spec);
        self.step(current, handler)
    }

    /// Diff `current` against the previous snapshot and react to it.
    pub fn step(&mut self, current: Snapshot, handler: &mut dyn ChangeHandler) -> WatchState {
        if self.state == WatchState::Stopped {
            return WatchState::Stopped;
        }

        let changes = diff(&self.previous, &current);
        if changes.is_empty() {
            debug!(entries = current.len(), "no changes");
            self.previous = current;
            return WatchState::Running;
        }

        info!(
            added = changes.added.len(),
            deleted = changes.deleted.len(),
            modified = changes.modified.len(),
            "changes detected"
        );

        if invoke_handler(handler, &changes) {
            self.previous = current;
            WatchState::Running
        } else {
            info!("change handler declined to continue; stopping");
            self.state = WatchState::Stopped;
            WatchState::Stopped
        }
    }
}

/// Call the handler and decide whether to keep watching.
///
/// Only an explicit `Ok(true)` or a failure continues. Errors and panics are
/// logged and swallowed (fail-open), so a handler that always fails turns the
/// loop into plain polling.
fn invoke_handler(handler: &mut dyn ChangeHandler, changes: &ChangeSet) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.on_change(changes))) {
        Ok(Ok(keep_watching)) => keep_watching,
        Ok(Err(err)) => {
            warn!(error = %err, "change handler failed; continuing to watch");
            true
        }
        Err(payload) => {
            warn!(
                panic = %panic_message(payload.as_ref()),
                "change handler panicked; continuing to watch"
            );
            true
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
