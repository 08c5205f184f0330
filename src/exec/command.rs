// src/exec/command.rs

//! Run a shell command whenever something changes.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::snapshot::ChangeSet;

use super::backend::ChangeHandler;

/// Environment variables carrying the changed paths, one per line.
pub const ENV_ADDED: &str = "POLLWATCH_ADDED";
pub const ENV_DELETED: &str = "POLLWATCH_DELETED";
pub const ENV_MODIFIED: &str = "POLLWATCH_MODIFIED";

/// Runs `cmd` through the platform shell for each change set and waits for it.
///
/// The watch loop is blocked while the command runs; changes made in the
/// meantime are picked up by the next poll.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    cmd: String,
    stop_on_failure: bool,
}

impl CommandHandler {
    pub fn new(cmd: impl Into<String>, stop_on_failure: bool) -> Self {
        Self {
            cmd: cmd.into(),
            stop_on_failure,
        }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    fn shell_command(&self) -> Command {
        // Build a shell command appropriate for the platform.
        if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        }
    }
}

fn join_paths(paths: Vec<PathBuf>) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

impl ChangeHandler for CommandHandler {
    fn on_change(&mut self, changes: &ChangeSet) -> Result<bool> {
        info!(cmd = %self.cmd, changed = changes.count(), "running command");

        let status = self
            .shell_command()
            .env(ENV_ADDED, join_paths(changes.sorted_added()))
            .env(ENV_DELETED, join_paths(changes.sorted_deleted()))
            .env(ENV_MODIFIED, join_paths(changes.sorted_modified()))
            .status()
            .with_context(|| format!("spawning command '{}'", self.cmd))?;

        if status.success() {
            info!(cmd = %self.cmd, "command succeeded");
            return Ok(true);
        }

        warn!(cmd = %self.cmd, code = ?status.code(), "command failed");
        Ok(!self.stop_on_failure)
    }
}
