use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tempfile::tempdir;

use pollwatch::engine::{WatchCore, WatchState};
use pollwatch::errors::PollwatchError;
use pollwatch::fs::RealFileSystem;
use pollwatch::snapshot::{diff, Snapshot};
use pollwatch::types::FingerprintMode;
use pollwatch_test_utils::builders::WatchSpecBuilder;
use pollwatch_test_utils::init_tracing;
use pollwatch_test_utils::recording_handler::RecordingHandler;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn detects_modification_on_disk() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    fs::write(root.join("a.txt"), "alpha")?;
    fs::write(root.join("b.txt"), "beta")?;

    let fs_impl = RealFileSystem;
    let mut core = WatchCore::start(&fs_impl, WatchSpecBuilder::new().root(&root).build())?;
    let mut handler = RecordingHandler::new();
    let calls = handler.calls();

    fs::write(root.join("b.txt"), "beta, but different")?;
    assert_eq!(core.poll_once(&fs_impl, &mut handler), WatchState::Running);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].modified, HashSet::from([root.join("b.txt")]));
    assert_eq!(calls[0].count(), 1);
    Ok(())
}

#[test]
fn detects_add_and_delete_on_disk() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    fs::write(root.join("a.txt"), "alpha")?;

    let spec = WatchSpecBuilder::new().root(&root).glob("*.txt").build();
    let before = Snapshot::capture(&RealFileSystem, &spec)?;

    fs::remove_file(root.join("a.txt"))?;
    fs::write(root.join("c.txt"), "gamma")?;
    fs::write(root.join("ignored.log"), "noise")?;
    let after = Snapshot::capture(&RealFileSystem, &spec)?;

    let changes = diff(&before, &after);
    assert_eq!(changes.added, HashSet::from([root.join("c.txt")]));
    assert_eq!(changes.deleted, HashSet::from([root.join("a.txt")]));
    assert!(changes.modified.is_empty());
    Ok(())
}

#[test]
fn mtime_mode_sees_timestamp_only_changes() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    let file = root.join("a.txt");
    fs::write(&file, "alpha")?;

    let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
    fs::File::options().write(true).open(&file)?.set_modified(old)?;

    let spec = WatchSpecBuilder::new()
        .root(&root)
        .mode(FingerprintMode::Modified)
        .build();
    let before = Snapshot::capture(&RealFileSystem, &spec)?;

    let newer = old + Duration::from_secs(60);
    fs::File::options().write(true).open(&file)?.set_modified(newer)?;
    let after = Snapshot::capture(&RealFileSystem, &spec)?;

    assert_eq!(diff(&before, &after).modified, HashSet::from([file]));
    Ok(())
}

#[test]
fn sub_directories_are_not_entries_in_flat_mode() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    fs::create_dir(root.join("nested"))?;
    fs::write(root.join("nested").join("inner.txt"), "x")?;
    fs::write(root.join("top.txt"), "y")?;

    let flat = Snapshot::capture(&RealFileSystem, &WatchSpecBuilder::new().root(&root).build())?;
    let paths: Vec<&PathBuf> = flat.paths().collect();
    assert_eq!(paths, vec![&root.join("top.txt")]);

    let deep = Snapshot::capture(
        &RealFileSystem,
        &WatchSpecBuilder::new().root(&root).recursive(true).build(),
    )?;
    assert_eq!(deep.len(), 2);
    Ok(())
}

#[test]
fn missing_root_is_fatal_at_startup() -> TestResult {
    let dir = tempdir()?;
    let missing = dir.path().join("does-not-exist");

    let result = WatchCore::start(&RealFileSystem, WatchSpecBuilder::new().root(&missing).build());
    assert!(matches!(result, Err(PollwatchError::RootNotFound(_))));
    Ok(())
}

#[cfg(unix)]
mod special_entries {
    use super::*;

    use std::os::unix::fs::symlink;
    use std::process::Command;
    use std::sync::mpsc;
    use std::thread;

    use pollwatch::snapshot::WatchSpec;

    /// Capture on a helper thread so a scan that blocks fails the test
    /// instead of hanging it.
    fn capture_within(spec: WatchSpec) -> Result<Snapshot, Box<dyn Error>> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(Snapshot::capture(&RealFileSystem, &spec));
        });
        Ok(rx.recv_timeout(Duration::from_secs(5))??)
    }

    #[test]
    fn symlink_cycles_are_walked_once() -> TestResult {
        init_tracing();

        let dir = tempdir()?;
        let root = dir.path().canonicalize()?;
        fs::write(root.join("a.txt"), "alpha")?;
        fs::create_dir(root.join("sub"))?;
        fs::write(root.join("sub").join("b.txt"), "beta")?;
        symlink(&root, root.join("l1"))?;
        symlink(&root, root.join("l2"))?;
        symlink(&root, root.join("sub").join("up"))?;

        let spec = WatchSpecBuilder::new().root(&root).recursive(true).build();
        let snapshot = capture_within(spec)?;

        let mut paths: Vec<PathBuf> = snapshot.paths().cloned().collect();
        paths.sort();
        assert_eq!(paths, vec![root.join("a.txt"), root.join("sub").join("b.txt")]);
        Ok(())
    }

    #[test]
    fn named_pipe_does_not_block_the_scan() -> TestResult {
        init_tracing();

        let dir = tempdir()?;
        let root = dir.path().canonicalize()?;
        fs::write(root.join("a.txt"), "alpha")?;
        let status = Command::new("mkfifo").arg(root.join("pipe")).status()?;
        assert!(status.success(), "mkfifo failed");

        for mode in [FingerprintMode::Content, FingerprintMode::Modified] {
            let spec = WatchSpecBuilder::new().root(&root).mode(mode).build();
            let snapshot = capture_within(spec)?;

            let paths: Vec<&PathBuf> = snapshot.paths().collect();
            assert_eq!(paths, vec![&root.join("a.txt")]);
        }
        Ok(())
    }
}

#[cfg(unix)]
mod command_handler {
    use super::*;

    use pollwatch::exec::{ChangeHandler, CommandHandler};
    use pollwatch::snapshot::ChangeSet;

    fn modified(paths: &[&str]) -> ChangeSet {
        ChangeSet {
            modified: paths.iter().map(PathBuf::from).collect(),
            ..ChangeSet::default()
        }
    }

    #[test]
    fn exports_changed_paths_to_the_command() -> TestResult {
        let dir = tempdir()?;
        let out = dir.path().join("out.txt");
        let cmd = format!("printf '%s' \"$POLLWATCH_MODIFIED\" > '{}'", out.display());

        let mut handler = CommandHandler::new(cmd, false);
        let keep = handler.on_change(&modified(&["/x/b.txt", "/x/a.txt"]))?;

        assert!(keep);
        assert_eq!(fs::read_to_string(&out)?, "/x/a.txt\n/x/b.txt");
        Ok(())
    }

    #[test]
    fn failing_command_stops_only_when_asked_to() -> TestResult {
        let changes = modified(&["/x/a.txt"]);

        assert!(CommandHandler::new("exit 3", false).on_change(&changes)?);
        assert!(!CommandHandler::new("exit 3", true).on_change(&changes)?);
        Ok(())
    }
}
