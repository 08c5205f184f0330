// src/snapshot/mod.rs

//! Point-in-time snapshots of watched directories and the diff between them.
//!
//! - [`fingerprint`] reduces one path to a comparable value (or nothing).
//! - [`pattern`] filters listed entries by file name.
//! - [`builder`] lists roots and fingerprints what it finds.
//! - [`diff`] classifies the difference between two snapshots.
//!
//! None of this knows about the polling loop; see [`crate::engine`].

pub mod builder;
pub mod diff;
pub mod fingerprint;
pub mod pattern;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;

pub use builder::{fingerprint_all, list_entries, RootPolicy, WatchSpec};
pub use diff::{diff, ChangeSet};
pub use fingerprint::{compute_file_hash, fingerprint, Fingerprint};
pub use pattern::NamePattern;

/// Immutable mapping from path to fingerprint.
///
/// Built fresh on every scan; there is no way to mutate one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: HashMap<PathBuf, Fingerprint>,
}

impl Snapshot {
    pub fn from_entries(entries: HashMap<PathBuf, Fingerprint>) -> Self {
        Self { entries }
    }

    /// Initial scan: a root that cannot be listed is an error.
    pub fn capture(fs: &dyn FileSystem, spec: &WatchSpec) -> Result<Self> {
        let paths = list_entries(fs, spec, RootPolicy::Strict)?;
        let snapshot = fingerprint_all(fs, paths, spec.mode);
        debug!(entries = snapshot.len(), "captured snapshot");
        Ok(snapshot)
    }

    /// Follow-up scan: per-root listing failures are logged and the root is
    /// treated as empty, so this never fails.
    pub fn rescan(fs: &dyn FileSystem, spec: &WatchSpec) -> Self {
        // Lenient listing has no error path.
        let paths = list_entries(fs, spec, RootPolicy::Lenient).unwrap_or_default();
        let snapshot = fingerprint_all(fs, paths, spec.mode);
        debug!(entries = snapshot.len(), "rescanned snapshot");
        snapshot
    }

    pub fn get(&self, path: &Path) -> Option<&Fingerprint> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Fingerprint)> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }
}
