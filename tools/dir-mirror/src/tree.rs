use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::filesystem::{EntryKind, FileSystem, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: PathBuf,
    pub name: String,
    pub depth: usize,
    pub kind: EntryKind,
}

/// Walks `root` on the local filesystem, yielding each directory before
/// its contents. Symbolic links are reported, not followed.
pub fn walk_tree(root: &Path) -> std::result::Result<Vec<TreeEntry>, walkdir::Error> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        entries.push(TreeEntry {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            depth: entry.depth(),
            kind,
        });
    }

    Ok(entries)
}

/// Regular files directly inside `dir`.
pub fn list_files<FS: FileSystem>(filesystem: &FS, dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = filesystem.list_directory(dir)?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .map(|entry| entry.path)
        .collect())
}
