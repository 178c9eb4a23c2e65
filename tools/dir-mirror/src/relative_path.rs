use std::path::{Component, Path, PathBuf};

use crate::filesystem::{FileSystemError, Result};

/// Path of `path` relative to `root`.
pub fn relative_offset<'a>(root: &Path, path: &'a Path) -> Result<&'a Path> {
    path.strip_prefix(root)
        .map_err(|e| FileSystemError::PathError(format!("{}: {}", path.display(), e)))
}

/// Maps `path` under `source_root` to the same offset under `destination_root`.
pub fn mirror_path(source_root: &Path, destination_root: &Path, path: &Path) -> Result<PathBuf> {
    let offset = relative_offset(source_root, path)?;

    // An offset must never climb out of the destination root
    if offset
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(FileSystemError::PathError(format!(
            "Unexpected path component in {}",
            offset.display()
        )));
    }

    Ok(destination_root.join(offset))
}

/// Removes `.` components and folds `..` into the preceding component
/// without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let ends_in_normal =
                    matches!(normalized.components().next_back(), Some(Component::Normal(_)));
                if ends_in_normal {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// True when `candidate` is `root` or lies lexically below it. Callers
/// resolve both paths first when they may mix relative and absolute forms.
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    let root: PathBuf = root.components().filter(|c| *c != Component::CurDir).collect();
    let candidate: PathBuf = candidate
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    candidate.starts_with(&root)
}
