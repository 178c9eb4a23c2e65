use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use filetime::{set_file_mtime, FileTime};

use super::{DirEntry, EntryKind, EntryMetadata, FileSystem, FileSystemError, Result};
use crate::relative_path::normalize;

#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn map_io_error(error: std::io::Error, path: &Path) -> FileSystemError {
    match error.kind() {
        ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
        ErrorKind::AlreadyExists => FileSystemError::AlreadyExists(path.to_path_buf()),
        ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(path.to_path_buf()),
        _ => FileSystemError::Io(error),
    }
}

fn kind_from(file_type: fs::FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

impl FileSystem for RealFileSystem {
    fn list_directory(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).map_err(|e| map_io_error(e, path))?;

        let mut results = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(e, path))?;
            let entry_path = entry.path();
            // DirEntry::file_type does not traverse symlinks
            let file_type = entry
                .file_type()
                .map_err(|e| map_io_error(e, &entry_path))?;

            results.push(DirEntry {
                path: entry_path,
                kind: kind_from(file_type),
            });
        }

        Ok(results)
    }

    fn get_metadata(&self, path: &Path) -> Result<EntryMetadata> {
        let metadata = fs::metadata(path).map_err(|e| map_io_error(e, path))?;

        Ok(EntryMetadata {
            kind: kind_from(metadata.file_type()),
            modified: metadata.modified()?,
        })
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        // Opened up front so read-side failures name the source
        fs::File::open(from).map_err(|e| map_io_error(e, from))?;

        fs::copy(from, to).map_err(|e| map_io_error(e, to))?;
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir(path).map_err(|e| map_io_error(e, path))
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(path.symlink_metadata().is_ok())
    }

    fn set_modified_time(&self, path: &Path, time: SystemTime) -> Result<()> {
        let file_time = FileTime::from(time);
        set_file_mtime(path, file_time).map_err(|e| map_io_error(e, path))
    }

    /// Canonicalizes the deepest existing ancestor of `path` and re-appends
    /// the components that do not exist yet.
    fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        let absolute = std::path::absolute(path).map_err(|e| map_io_error(e, path))?;
        let absolute = normalize(&absolute);

        let mut missing = Vec::new();
        let mut existing = absolute.as_path();
        loop {
            match fs::canonicalize(existing) {
                Ok(resolved) => {
                    return Ok(missing.iter().rev().fold(resolved, |acc, name| acc.join(name)));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    match (existing.parent(), existing.file_name()) {
                        (Some(parent), Some(name)) => {
                            missing.push(name);
                            existing = parent;
                        }
                        _ => return Ok(absolute.clone()),
                    }
                }
                Err(e) => return Err(map_io_error(e, existing)),
            }
        }
    }
}
