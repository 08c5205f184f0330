// src/snapshot/diff.rs

use std::collections::HashSet;
use std::path::PathBuf;

use super::Snapshot;

/// Classified difference between two snapshots.
///
/// Each path lands in at most one of the three sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: HashSet<PathBuf>,
    pub deleted: HashSet<PathBuf>,
    pub modified: HashSet<PathBuf>,
}

impl ChangeSet {
    /// Total number of changed paths across all categories.
    pub fn count(&self) -> usize {
        self.added.len() + self.deleted.len() + self.modified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn sorted_added(&self) -> Vec<PathBuf> {
        sorted(&self.added)
    }

    pub fn sorted_deleted(&self) -> Vec<PathBuf> {
        sorted(&self.deleted)
    }

    pub fn sorted_modified(&self) -> Vec<PathBuf> {
        sorted(&self.modified)
    }
}

fn sorted(set: &HashSet<PathBuf>) -> Vec<PathBuf> {
    let mut v: Vec<PathBuf> = set.iter().cloned().collect();
    v.sort();
    v
}

/// Compare `old` against `new`.
///
/// Linear in the combined size of both snapshots: one pass over `new` finds
/// additions and modifications, one pass over `old` finds deletions.
pub fn diff(old: &Snapshot, new: &Snapshot) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (path, fp) in new.iter() {
        match old.get(path) {
            None => {
                changes.added.insert(path.clone());
            }
            Some(prev) if prev != fp => {
                changes.modified.insert(path.clone());
            }
            Some(_) => {}
        }
    }

    changes.deleted = old
        .paths()
        .filter(|path| !new.contains(path))
        .cloned()
        .collect();

    changes
}
