// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RawConfigFile;
use crate::types::FingerprintMode;

/// Command-line arguments for `pollwatch`.
///
/// Every flag overrides the matching value from the config file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Poll directories for changes and run a command when they happen.",
    long_about = None
)]
pub struct CliArgs {
    /// Directories to watch. Default: `[watch].roots`, or the current directory.
    #[arg(value_name = "ROOT")]
    pub roots: Vec<PathBuf>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Pollwatch.toml` in the current directory, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Glob matched against file names (e.g. "*.py").
    #[arg(long, value_name = "GLOB", conflicts_with = "regex")]
    pub pattern: Option<String>,

    /// Regex matched against file names.
    #[arg(long, value_name = "REGEX")]
    pub regex: Option<String>,

    /// How files are fingerprinted.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<FingerprintMode>,

    /// Polling interval (e.g. "500ms", "2s").
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Also watch files in sub-directories.
    #[arg(long)]
    pub recursive: bool,

    /// Shell command to run whenever something changes.
    #[arg(long, value_name = "CMD")]
    pub cmd: Option<String>,

    /// Stop watching once the command exits non-zero.
    #[arg(long)]
    pub stop_on_failure: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the effective configuration, but don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Layer the CLI flags over a config loaded from disk.
    pub fn apply_to(&self, raw: &mut RawConfigFile) {
        if !self.roots.is_empty() {
            raw.watch.roots = self
                .roots
                .iter()
                .map(|r| r.to_string_lossy().into_owned())
                .collect();
        }
        if let Some(pattern) = &self.pattern {
            raw.watch.pattern = Some(pattern.clone());
            raw.watch.regex = None;
        }
        if let Some(regex) = &self.regex {
            raw.watch.regex = Some(regex.clone());
            raw.watch.pattern = None;
        }
        if let Some(mode) = self.mode {
            raw.watch.fingerprint = mode;
        }
        if let Some(interval) = &self.interval {
            raw.watch.interval = interval.clone();
        }
        if self.recursive {
            raw.watch.recursive = true;
        }
        if let Some(cmd) = &self.cmd {
            raw.on_change.cmd = Some(cmd.clone());
        }
        if self.stop_on_failure {
            raw.on_change.stop_on_failure = true;
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
