use std::path::PathBuf;
use thiserror::Error;

use crate::filesystem::FileSystemError;

/// Failures that stop a copy before any entry is processed.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("Source directory does not exist: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source path is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    #[error("Failed to read source directory {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: FileSystemError,
    },

    #[error("Destination {destination} lies inside source {source_root}")]
    DestinationInsideSource {
        source_root: PathBuf,
        destination: PathBuf,
    },

    #[error("Failed to create destination directory {path}: {source}")]
    DestinationUncreatable {
        path: PathBuf,
        #[source]
        source: FileSystemError,
    },
}
