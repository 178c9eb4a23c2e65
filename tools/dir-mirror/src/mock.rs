use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use crate::filesystem::{DirEntry, EntryKind, EntryMetadata, FileSystem, FileSystemError, Result};

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, MockFile>,
    directories: Vec<PathBuf>,
    special: HashSet<PathBuf>,
    deny_read: HashSet<PathBuf>,
    deny_write: HashSet<PathBuf>,
}

impl MockState {
    fn is_directory(&self, path: &Path) -> bool {
        self.directories.iter().any(|d| d == path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_directory(path) || self.special.contains(path)
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if parent != Path::new("") => self.is_directory(parent),
            _ => true,
        }
    }

    fn write_denied(&self, path: &Path) -> bool {
        path.parent().is_some_and(|parent| self.deny_write.contains(parent))
    }
}

/// In-memory [`FileSystem`] used by tests.
///
/// Directories keep their insertion order when listed. Read and write
/// permission failures can be injected per path.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, content: Vec<u8>, modified: SystemTime) {
        let path = path.into();
        self.lock().files.insert(path, MockFile { content, modified });
    }

    pub fn add_directory(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.lock();
        if !state.is_directory(&path) {
            state.directories.push(path);
        }
    }

    /// Adds an entry that is neither a file nor a directory, like a symlink.
    pub fn add_special(&self, path: impl Into<PathBuf>) {
        self.lock().special.insert(path.into());
    }

    /// Reading `path` (listing a directory or copying a file) fails with
    /// `PermissionDenied`.
    pub fn deny_read(&self, path: impl Into<PathBuf>) {
        self.lock().deny_read.insert(path.into());
    }

    /// Creating anything directly inside `path` fails with `PermissionDenied`.
    pub fn deny_write(&self, path: impl Into<PathBuf>) {
        self.lock().deny_write.insert(path.into());
    }

    pub fn get_file_content(&self, path: &Path) -> Option<Vec<u8>> {
        self.lock().files.get(path).map(|f| f.content.clone())
    }

    pub fn get_modified_time(&self, path: &Path) -> Option<SystemTime> {
        self.lock().files.get(path).map(|f| f.modified)
    }

    pub fn list_all_files(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    pub fn list_all_directories(&self) -> Vec<PathBuf> {
        self.lock().directories.clone()
    }
}

impl FileSystem for MockFileSystem {
    fn list_directory(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let state = self.lock();

        if !state.is_directory(path) {
            return Err(FileSystemError::NotFound(path.to_path_buf()));
        }
        if state.deny_read.contains(path) {
            return Err(FileSystemError::PermissionDenied(path.to_path_buf()));
        }

        let is_child = |candidate: &Path| candidate.parent() == Some(path) && candidate != path;
        let mut results = Vec::new();

        for dir_path in state.directories.iter().filter(|d| is_child(d.as_path())) {
            results.push(DirEntry {
                path: dir_path.clone(),
                kind: EntryKind::Directory,
            });
        }

        let mut files: Vec<&PathBuf> =
            state.files.keys().filter(|f| is_child(f.as_path())).collect();
        files.sort();
        for file_path in files {
            results.push(DirEntry {
                path: file_path.clone(),
                kind: EntryKind::File,
            });
        }

        for special_path in state.special.iter().filter(|s| is_child(s.as_path())) {
            results.push(DirEntry {
                path: special_path.clone(),
                kind: EntryKind::Other,
            });
        }

        Ok(results)
    }

    fn get_metadata(&self, path: &Path) -> Result<EntryMetadata> {
        let state = self.lock();

        if let Some(file) = state.files.get(path) {
            Ok(EntryMetadata {
                kind: EntryKind::File,
                modified: file.modified,
            })
        } else if state.is_directory(path) {
            Ok(EntryMetadata {
                kind: EntryKind::Directory,
                modified: SystemTime::now(),
            })
        } else if state.special.contains(path) {
            Ok(EntryMetadata {
                kind: EntryKind::Other,
                modified: SystemTime::now(),
            })
        } else {
            Err(FileSystemError::NotFound(path.to_path_buf()))
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let mut state = self.lock();

        if state.deny_read.contains(from) {
            return Err(FileSystemError::PermissionDenied(from.to_path_buf()));
        }
        let source_file = state
            .files
            .get(from)
            .ok_or_else(|| FileSystemError::NotFound(from.to_path_buf()))?
            .clone();

        if !state.parent_exists(to) {
            return Err(FileSystemError::NotFound(to.to_path_buf()));
        }
        if state.write_denied(to) {
            return Err(FileSystemError::PermissionDenied(to.to_path_buf()));
        }
        if state.is_directory(to) || state.special.contains(to) {
            return Err(FileSystemError::AlreadyExists(to.to_path_buf()));
        }

        state.files.insert(
            to.to_path_buf(),
            MockFile {
                content: source_file.content,
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();

        if state.exists(path) {
            return Err(FileSystemError::AlreadyExists(path.to_path_buf()));
        }
        if !state.parent_exists(path) {
            return Err(FileSystemError::NotFound(path.to_path_buf()));
        }
        if state.write_denied(path) {
            return Err(FileSystemError::PermissionDenied(path.to_path_buf()));
        }

        state.directories.push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.lock().exists(path))
    }

    fn set_modified_time(&self, path: &Path, time: SystemTime) -> Result<()> {
        let mut state = self.lock();

        if let Some(file) = state.files.get_mut(path) {
            file.modified = time;
            Ok(())
        } else {
            Err(FileSystemError::NotFound(path.to_path_buf()))
        }
    }
}
