pub mod copy;
pub mod error;
pub mod filesystem;
pub mod relative_path;
pub mod tree;

pub mod mock;

pub use copy::{
    CancelFlag, CopyOptions, CopyOutcome, CopyReport, DirectoryCopier, EntryFailure, FailureKind,
};
pub use error::CopyError;
pub use filesystem::{
    DirEntry, EntryKind, EntryMetadata, FileSystem, FileSystemError, RealFileSystem,
};
