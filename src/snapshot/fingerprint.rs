// src/snapshot/fingerprint.rs

use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::trace;

use crate::fs::FileSystem;
use crate::types::FingerprintMode;

/// Comparable state of a single file at scan time.
///
/// Two fingerprints are equal only if they are of the same kind and carry the
/// exact same value. There is deliberately no "absent" variant: a path that
/// cannot be fingerprinted is represented by `None` and never reaches a
/// [`Snapshot`](super::Snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fingerprint {
    Content(blake3::Hash),
    Modified(SystemTime),
}

/// Compute the blake3 hash of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<blake3::Hash> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// Fingerprint `path`, or `None` if it is missing, not a regular file,
/// unreadable, or disappears while being read.
///
/// Never fails: every transient problem with a single path collapses to
/// `None`, and the next scan simply looks again.
pub fn fingerprint(fs: &dyn FileSystem, path: &Path, mode: FingerprintMode) -> Option<Fingerprint> {
    if !fs.exists(path) {
        trace!(?path, "skipping: does not exist");
        return None;
    }
    if fs.is_dir(path) {
        trace!(?path, "skipping: directory");
        return None;
    }
    // Opening a FIFO or device node can block.
    if !fs.is_file(path) {
        trace!(?path, "skipping: not a regular file");
        return None;
    }
    if !fs.is_readable(path) {
        trace!(?path, "skipping: not readable");
        return None;
    }

    let result = match mode {
        FingerprintMode::Content => compute_file_hash(fs, path).map(Fingerprint::Content),
        FingerprintMode::Modified => fs.modified(path).map(Fingerprint::Modified),
    };

    match result {
        Ok(fp) => Some(fp),
        Err(err) => {
            // Lost the race between the checks above and the actual read.
            trace!(?path, error = %err, "skipping: vanished while fingerprinting");
            None
        }
    }
}
