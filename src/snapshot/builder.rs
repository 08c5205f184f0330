// src/snapshot/builder.rs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{PollwatchError, Result};
use crate::fs::FileSystem;
use crate::snapshot::fingerprint::fingerprint;
use crate::snapshot::pattern::NamePattern;
use crate::snapshot::Snapshot;
use crate::types::FingerprintMode;

/// What to scan: the roots, the name filter, and how to fingerprint.
#[derive(Debug, Clone)]
pub struct WatchSpec {
    pub roots: Vec<PathBuf>,
    pub pattern: NamePattern,
    pub mode: FingerprintMode,
    /// Walk sub-directories instead of listing only the roots' direct children.
    pub recursive: bool,
}

impl WatchSpec {
    /// Flat, content-hashed, unfiltered scan of `roots`.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            pattern: NamePattern::Any,
            mode: FingerprintMode::default(),
            recursive: false,
        }
    }
}

/// How a root that cannot be listed is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootPolicy {
    /// Fail the scan. Used for the initial snapshot.
    Strict,
    /// Warn and treat the root as empty. Used for every later scan.
    Lenient,
}

/// List every entry under the spec's roots whose file name matches the pattern.
///
/// Returned paths are the full paths produced by joining the root with the
/// entry name. Directories are never returned in recursive mode; in flat mode
/// they may be, and are dropped later when fingerprinting.
pub fn list_entries(
    fs: &dyn FileSystem,
    spec: &WatchSpec,
    policy: RootPolicy,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for root in &spec.roots {
        let children = match fs.read_dir(root) {
            Ok(children) => children,
            Err(err) => match policy {
                RootPolicy::Strict => {
                    return Err(PollwatchError::RootUnreadable {
                        root: root.clone(),
                        reason: format!("{err:#}"),
                    });
                }
                RootPolicy::Lenient => {
                    warn!(?root, error = %err, "watched root could not be listed; treating as empty");
                    continue;
                }
            },
        };

        if spec.recursive {
            walk(fs, root, children, &spec.pattern, &mut paths);
        } else {
            paths.extend(children.into_iter().filter(|p| spec.pattern.matches(p)));
        }
    }

    Ok(paths)
}

/// Depth-first walk below one root, starting from its already-listed children.
///
/// Each directory is entered at most once, keyed by its canonical path, so
/// symlinks pointing back up the tree cannot loop.
fn walk(
    fs: &dyn FileSystem,
    root: &Path,
    children: Vec<PathBuf>,
    pattern: &NamePattern,
    out: &mut Vec<PathBuf>,
) {
    let mut visited = HashSet::new();
    visited.insert(fs.canonicalize(root).unwrap_or_else(|_| root.to_path_buf()));
    let mut stack = vec![children];

    while let Some(entries) = stack.pop() {
        for path in entries {
            if fs.is_dir(&path) {
                let canonical = match fs.canonicalize(&path) {
                    Ok(canonical) => canonical,
                    Err(err) => {
                        debug!(?path, error = %err, "skipping unresolvable sub-directory");
                        continue;
                    }
                };
                if !visited.insert(canonical) {
                    debug!(?path, "skipping already visited directory");
                    continue;
                }
                match fs.read_dir(&path) {
                    Ok(nested) => stack.push(nested),
                    Err(err) => debug!(?path, error = %err, "skipping unlistable sub-directory"),
                }
            } else if pattern.matches(&path) {
                out.push(path);
            }
        }
    }
}

/// Fingerprint every path and keep only those that produced a value.
pub fn fingerprint_all<I, P>(fs: &dyn FileSystem, paths: I, mode: FingerprintMode) -> Snapshot
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let entries: HashMap<PathBuf, _> = paths
        .into_iter()
        .filter_map(|p| {
            let p = p.as_ref();
            fingerprint(fs, p, mode).map(|fp| (p.to_path_buf(), fp))
        })
        .collect();

    Snapshot::from_entries(entries)
}
