#![allow(dead_code)]

use std::path::PathBuf;

use pollwatch::config::{ConfigFile, RawConfigFile};
use pollwatch::snapshot::{NamePattern, WatchSpec};
use pollwatch::types::FingerprintMode;

/// Builder for `WatchSpec` to simplify test setup.
pub struct WatchSpecBuilder {
    spec: WatchSpec,
}

impl WatchSpecBuilder {
    pub fn new() -> Self {
        Self {
            spec: WatchSpec::new(Vec::<PathBuf>::new()),
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.spec.roots.push(root.into());
        self
    }

    pub fn glob(mut self, pattern: &str) -> Self {
        self.spec.pattern = NamePattern::glob(pattern).expect("invalid glob in test");
        self
    }

    pub fn regex(mut self, pattern: &str) -> Self {
        self.spec.pattern = NamePattern::regex(pattern).expect("invalid regex in test");
        self
    }

    pub fn mode(mut self, mode: FingerprintMode) -> Self {
        self.spec.mode = mode;
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.spec.recursive = val;
        self
    }

    pub fn build(self) -> WatchSpec {
        self.spec
    }
}

impl Default for WatchSpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ConfigFile` that goes through the same validation as TOML input.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn roots(mut self, roots: &[&str]) -> Self {
        self.config.watch.roots = roots.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.config.watch.pattern = Some(pattern.to_string());
        self
    }

    pub fn regex(mut self, pattern: &str) -> Self {
        self.config.watch.regex = Some(pattern.to_string());
        self
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.config.watch.interval = interval.to_string();
        self
    }

    pub fn mode(mut self, mode: FingerprintMode) -> Self {
        self.config.watch.fingerprint = mode;
        self
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.config.on_change.cmd = Some(cmd.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
