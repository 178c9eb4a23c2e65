mod real;

pub use real::RealFileSystem;

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

use crate::relative_path::normalize;

#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Not found: {0}")]
    NotFound(PathBuf),

    #[error("Already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

/// What a directory entry is, as seen without following symbolic links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symbolic links, devices, sockets, fifos.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

#[derive(Debug, Clone)]
pub struct EntryMetadata {
    pub kind: EntryKind,
    pub modified: SystemTime,
}

pub trait FileSystem: Send + Sync {
    /// Lists the direct children of `path`. Order is whatever the backend
    /// enumerates; callers must not rely on it.
    fn list_directory(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Metadata for `path`, following symbolic links.
    fn get_metadata(&self, path: &Path) -> Result<EntryMetadata>;

    /// Copies file contents, replacing `to` if it already exists.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Creates a single directory level. The parent must already exist.
    fn create_directory(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> Result<bool>;

    fn set_modified_time(&self, path: &Path, time: SystemTime) -> Result<()>;

    /// Form of `path` that can be compared with other resolved paths even
    /// when they were given relative to different bases. `path` need not
    /// exist. The default only folds `.` and `..`.
    fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        Ok(normalize(path))
    }

    fn is_directory(&self, path: &Path) -> Result<bool> {
        self.kind_of(path).map(|kind| kind == Some(EntryKind::Directory))
    }

    fn is_regular_file(&self, path: &Path) -> Result<bool> {
        self.kind_of(path).map(|kind| kind == Some(EntryKind::File))
    }

    /// `None` when nothing exists at `path`.
    fn kind_of(&self, path: &Path) -> Result<Option<EntryKind>> {
        match self.get_metadata(path) {
            Ok(metadata) => Ok(Some(metadata.kind)),
            Err(FileSystemError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
