// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::snapshot::{NamePattern, WatchSpec};
use crate::types::FingerprintMode;

/// Configuration exactly as read from TOML, before validation.
///
/// ```toml
/// [watch]
/// roots = ["src", "tests"]
/// pattern = "*.rs"
/// fingerprint = "content"
/// interval = "1s"
/// recursive = false
///
/// [on_change]
/// cmd = "cargo test"
/// stop_on_failure = false
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub on_change: OnChangeSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directories to watch. Default: the current directory.
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,

    /// Glob matched against file names, e.g. `"*.py"`.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Regex matched against file names. Mutually exclusive with `pattern`.
    #[serde(default)]
    pub regex: Option<String>,

    /// `"content"` (default) or `"mtime"`.
    #[serde(default)]
    pub fingerprint: FingerprintMode,

    /// Polling interval such as `"500ms"` or `"1s"`.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Walk sub-directories too.
    #[serde(default)]
    pub recursive: bool,
}

fn default_roots() -> Vec<String> {
    vec![".".to_string()]
}

fn default_interval() -> String {
    "1s".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            pattern: None,
            regex: None,
            fingerprint: FingerprintMode::default(),
            interval: default_interval(),
            recursive: false,
        }
    }
}

/// `[on_change]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OnChangeSection {
    /// Shell command to run on every change. Without one, changes are only logged.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Stop watching once the command exits non-zero.
    #[serde(default)]
    pub stop_on_failure: bool,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holding one means the
/// pattern compiled, the interval parsed, and there is at least one root.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub roots: Vec<PathBuf>,
    pub pattern: NamePattern,
    pub mode: FingerprintMode,
    pub interval: Duration,
    pub recursive: bool,
    pub on_change: OnChangeSection,
}

impl ConfigFile {
    /// The scan description handed to the watch engine.
    pub fn watch_spec(&self) -> WatchSpec {
        WatchSpec {
            roots: self.roots.clone(),
            pattern: self.pattern.clone(),
            mode: self.mode,
            recursive: self.recursive,
        }
    }
}
