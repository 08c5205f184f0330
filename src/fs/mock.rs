// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
    readable: bool,
    /// Listed and passes the existence/readability checks, but every read
    /// fails as if it was removed right after being checked.
    vanishing: bool,
}

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(MockFile),
    Dir(Vec<String>), // List of child names
    /// Symbolic link to an absolute target path.
    Link(PathBuf),
    /// FIFO, socket or device: exists, but is neither a file nor a directory.
    Special,
}

/// Same limit Linux applies before failing with `ELOOP`.
const MAX_LINK_HOPS: usize = 40;

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Logical clock used for modification times; bumped on every write.
    clock: u64,
}

impl MockState {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.clock)
    }

    /// Follow links in every component of `path`.
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        let mut resolved = PathBuf::new();
        let mut hops = 0;
        for component in path.components() {
            resolved.push(component);
            while let Some(MockEntry::Link(target)) = self.entries.get(&resolved) {
                hops += 1;
                if hops > MAX_LINK_HOPS {
                    return None;
                }
                resolved = target.clone();
            }
        }
        Some(resolved)
    }

    fn lookup(&self, path: &Path) -> Option<&MockEntry> {
        self.resolve(path).and_then(|resolved| self.entries.get(&resolved))
    }
}

/// In-memory filesystem shared between clones.
///
/// Handing a clone to a running watcher and mutating the original is how tests
/// simulate changes between polls.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

fn parent_or_dot(path: &Path) -> Option<&Path> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        }
    })
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock filesystem lock poisoned")
    }

    /// Create or overwrite a file, bumping its modification time.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.lock();
        let modified = state.tick();
        let file = MockFile {
            content: content.into(),
            modified,
            readable: true,
            vanishing: false,
        };
        Self::insert(&mut state, path.as_ref(), MockEntry::File(file));
    }

    /// Add a file that shows up in listings but disappears as soon as it is read.
    pub fn add_vanishing_file(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        let modified = state.tick();
        let file = MockFile {
            content: Vec::new(),
            modified,
            readable: true,
            vanishing: true,
        };
        Self::insert(&mut state, path.as_ref(), MockEntry::File(file));
    }

    /// Create an (empty) directory and any missing parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        Self::ensure_dir_entry(&mut state.entries, path.as_ref());
    }

    /// Create a symlink at `path` pointing to `target`.
    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl Into<PathBuf>) {
        let mut state = self.lock();
        Self::insert(&mut state, path.as_ref(), MockEntry::Link(target.into()));
    }

    /// Create a named pipe or similar special entry.
    pub fn add_special(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        Self::insert(&mut state, path.as_ref(), MockEntry::Special);
    }

    /// Bump the modification time without touching content.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        let modified = state.tick();
        if let Some(MockEntry::File(file)) = state.entries.get_mut(path.as_ref()) {
            file.modified = modified;
        }
    }

    /// Set the modification time explicitly.
    pub fn set_modified(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let mut state = self.lock();
        if let Some(MockEntry::File(file)) = state.entries.get_mut(path.as_ref()) {
            file.modified = modified;
        }
    }

    pub fn set_readable(&self, path: impl AsRef<Path>, readable: bool) {
        let mut state = self.lock();
        if let Some(MockEntry::File(file)) = state.entries.get_mut(path.as_ref()) {
            file.readable = readable;
        }
    }

    /// Remove a file or directory (with everything below it).
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        state.entries.retain(|key, _| !key.starts_with(path));

        if let Some(parent) = parent_or_dot(path) {
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    children.retain(|child| child != name);
                }
            }
        }
    }

    fn insert(state: &mut MockState, path: &Path, entry: MockEntry) {
        let path = path.to_path_buf();
        state.entries.insert(path.clone(), entry);

        // Ensure parent directories exist implicitly for simplicity in this mock
        if let Some(parent) = parent_or_dot(&path) {
            Self::ensure_dir_entry(&mut state.entries, parent);
            Self::link_child(&mut state.entries, parent, &path);
        }
    }

    fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, path: &Path) {
        if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|child| child == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = parent_or_dot(path) {
            if parent != path {
                // Avoid infinite loop at root
                Self::ensure_dir_entry(entries, parent);
                Self::link_child(entries, parent, path);
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let state = self.lock();
        match state.lookup(path) {
            Some(MockEntry::File(file)) if file.vanishing => {
                Err(anyhow!("File not found: {:?}", path))
            }
            Some(MockEntry::File(file)) if !file.readable => {
                Err(anyhow!("Permission denied: {:?}", path))
            }
            Some(MockEntry::File(file)) => Ok(Box::new(Cursor::new(file.content.clone()))),
            // A real FIFO would block here until a writer shows up.
            Some(MockEntry::Special) => Ok(Box::new(Cursor::new(Vec::new()))),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            Some(MockEntry::Link(_)) | None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().lookup(path).is_some()
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().lookup(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().lookup(path), Some(MockEntry::Dir(_)))
    }

    fn is_readable(&self, path: &Path) -> bool {
        match self.lock().lookup(path) {
            Some(MockEntry::File(file)) => file.readable,
            Some(MockEntry::Dir(_)) | Some(MockEntry::Special) => true,
            Some(MockEntry::Link(_)) | None => false,
        }
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.lock().lookup(path) {
            Some(MockEntry::File(file)) if file.vanishing => {
                Err(anyhow!("File not found: {:?}", path))
            }
            Some(MockEntry::File(file)) => Ok(file.modified),
            Some(MockEntry::Dir(_)) | Some(MockEntry::Special) => Ok(SystemTime::UNIX_EPOCH),
            Some(MockEntry::Link(_)) | None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // Paths are taken as given apart from link resolution; tests use absolute paths.
        let state = self.lock();
        match state.resolve(path) {
            Some(resolved) if state.entries.contains_key(&resolved) => Ok(resolved),
            _ => Err(anyhow!("No such file or directory: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lock().lookup(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
