use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use pollwatch::snapshot::{diff, Fingerprint, Snapshot};
use proptest::prelude::*;

// Snapshots over a small path universe so that overlaps between the two
// sides are common. Fingerprint values are drawn from a tiny range for the
// same reason.
fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    proptest::collection::hash_map(0u8..20, 0u64..3, 0..12).prop_map(|raw| {
        let entries: HashMap<PathBuf, Fingerprint> = raw
            .into_iter()
            .map(|(name, stamp)| {
                (
                    PathBuf::from(format!("/w/file_{name}.txt")),
                    Fingerprint::Modified(SystemTime::UNIX_EPOCH + Duration::from_secs(stamp)),
                )
            })
            .collect();
        Snapshot::from_entries(entries)
    })
}

proptest! {
    #[test]
    fn diff_against_self_is_empty(a in snapshot_strategy()) {
        let changes = diff(&a, &a);
        prop_assert_eq!(changes.count(), 0);
    }

    #[test]
    fn swapping_arguments_swaps_added_and_deleted(
        a in snapshot_strategy(),
        b in snapshot_strategy(),
    ) {
        let forward = diff(&a, &b);
        let backward = diff(&b, &a);

        prop_assert_eq!(&forward.added, &backward.deleted);
        prop_assert_eq!(&forward.deleted, &backward.added);
        prop_assert_eq!(&forward.modified, &backward.modified);
    }

    #[test]
    fn categories_are_disjoint_and_count_adds_up(
        a in snapshot_strategy(),
        b in snapshot_strategy(),
    ) {
        let changes = diff(&a, &b);

        prop_assert!(changes.added.is_disjoint(&changes.deleted));
        prop_assert!(changes.added.is_disjoint(&changes.modified));
        prop_assert!(changes.deleted.is_disjoint(&changes.modified));
        prop_assert_eq!(
            changes.count(),
            changes.added.len() + changes.deleted.len() + changes.modified.len()
        );
        prop_assert_eq!(changes.count() == 0, a == b);
    }

    #[test]
    fn only_paths_from_either_side_are_reported(
        a in snapshot_strategy(),
        b in snapshot_strategy(),
    ) {
        let changes = diff(&a, &b);

        for path in changes.added.iter() {
            prop_assert!(b.contains(path) && !a.contains(path));
        }
        for path in changes.deleted.iter() {
            prop_assert!(a.contains(path) && !b.contains(path));
        }
        for path in changes.modified.iter() {
            prop_assert!(a.contains(path) && b.contains(path));
            prop_assert_ne!(a.get(path), b.get(path));
        }
    }
}
