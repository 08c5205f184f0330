use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use pollwatch::exec::ChangeHandler;
use pollwatch::snapshot::ChangeSet;

/// What a [`RecordingHandler`] does on one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Continue,
    Stop,
    Fail,
    Panic,
}

/// A fake change handler that:
/// - records every change set it was called with
/// - answers from a script, falling back to `Continue` once it runs out.
pub struct RecordingHandler {
    script: VecDeque<Reply>,
    calls: Arc<Mutex<Vec<ChangeSet>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::scripted([])
    }

    pub fn scripted(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: replies.into_iter().collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared view of the recorded calls; stays valid after the handler is moved.
    pub fn calls(&self) -> Arc<Mutex<Vec<ChangeSet>>> {
        Arc::clone(&self.calls)
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeHandler for RecordingHandler {
    fn on_change(&mut self, changes: &ChangeSet) -> Result<bool> {
        self.calls.lock().unwrap().push(changes.clone());

        match self.script.pop_front().unwrap_or(Reply::Continue) {
            Reply::Continue => Ok(true),
            Reply::Stop => Ok(false),
            Reply::Fail => Err(anyhow!("scripted handler failure")),
            Reply::Panic => panic!("scripted handler panic"),
        }
    }
}
