mod report;

pub use report::{CopyOutcome, CopyReport, EntryFailure, FailureKind};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use log::{debug, info, warn};

use crate::error::CopyError;
use crate::filesystem::{DirEntry, EntryKind, FileSystem, FileSystemError};
use crate::relative_path::{is_within, mirror_path};

/// Shared flag that asks a running copy to stop before its next entry.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    pub dry_run: bool,
    pub verbose: bool,
    pub preserve_times: bool,
    pub cancel: Option<CancelFlag>,
}

impl CopyOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

/// Mirrors a source directory tree into a destination directory.
///
/// Directories are created before any of their children are visited, and
/// children are visited in the order the filesystem lists them. A failure on
/// one entry is recorded in the [`CopyReport`] and never stops its siblings.
pub struct DirectoryCopier<FS: FileSystem> {
    filesystem: FS,
}

impl<FS: FileSystem> DirectoryCopier<FS> {
    pub fn new(filesystem: FS) -> Self {
        Self { filesystem }
    }

    pub fn copy(
        &self,
        source_root: &Path,
        destination_root: &Path,
        options: &CopyOptions,
    ) -> Result<CopyReport, CopyError> {
        match self.filesystem.kind_of(source_root) {
            Ok(Some(EntryKind::Directory)) => {}
            Ok(Some(_)) => {
                return Err(CopyError::SourceNotDirectory(source_root.to_path_buf()))
            }
            Ok(None) => return Err(CopyError::SourceNotFound(source_root.to_path_buf())),
            Err(e) => {
                return Err(CopyError::SourceUnreadable {
                    path: source_root.to_path_buf(),
                    source: e,
                })
            }
        }

        self.check_destination_outside_source(source_root, destination_root)?;

        let entries = self
            .filesystem
            .list_directory(source_root)
            .map_err(|e| CopyError::SourceUnreadable {
                path: source_root.to_path_buf(),
                source: e,
            })?;

        let mut report = CopyReport::new();
        self.ensure_destination_root(destination_root, options, &mut report)?;

        // Reversed so that popping yields the listing order
        let mut pending: Vec<DirEntry> = entries.into_iter().rev().collect();

        while let Some(entry) = pending.pop() {
            if options.is_cancelled() {
                warn!("Copy cancelled with {} entries pending", pending.len() + 1);
                report.cancelled = true;
                break;
            }

            debug!("Processing entry: {}", entry.path.display());

            match entry.kind {
                EntryKind::Directory => {
                    if let Some(children) = self.visit_directory(
                        &entry.path,
                        source_root,
                        destination_root,
                        options,
                        &mut report,
                    ) {
                        pending.extend(children.into_iter().rev());
                    }
                }
                EntryKind::File => {
                    self.visit_file(
                        &entry.path,
                        source_root,
                        destination_root,
                        options,
                        &mut report,
                    );
                }
                EntryKind::Other => {
                    warn!("Skipping non-regular entry: {}", entry.path.display());
                    report.skipped.push(entry.path);
                }
            }
        }

        report.finish();
        Ok(report)
    }

    /// Rejects a destination that is the source or lies below it, comparing
    /// resolved paths so relative, `..` and symlinked forms cannot slip past.
    fn check_destination_outside_source(
        &self,
        source_root: &Path,
        destination_root: &Path,
    ) -> Result<(), CopyError> {
        let resolved_source = self.filesystem.resolve_path(source_root).map_err(|e| {
            CopyError::SourceUnreadable {
                path: source_root.to_path_buf(),
                source: e,
            }
        })?;
        let resolved_destination =
            self.filesystem
                .resolve_path(destination_root)
                .map_err(|e| CopyError::DestinationUncreatable {
                    path: destination_root.to_path_buf(),
                    source: e,
                })?;

        debug!(
            "Resolved {} -> {}",
            resolved_source.display(),
            resolved_destination.display()
        );

        if is_within(&resolved_source, &resolved_destination) {
            return Err(CopyError::DestinationInsideSource {
                source_root: source_root.to_path_buf(),
                destination: destination_root.to_path_buf(),
            });
        }

        Ok(())
    }

    /// Creates `destination_root` and any missing ancestors.
    fn ensure_destination_root(
        &self,
        destination_root: &Path,
        options: &CopyOptions,
        report: &mut CopyReport,
    ) -> Result<(), CopyError> {
        let uncreatable = |path: &Path, source: FileSystemError| {
            CopyError::DestinationUncreatable {
                path: path.to_path_buf(),
                source,
            }
        };

        let mut missing = Vec::new();
        for ancestor in destination_root.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            match self.filesystem.kind_of(ancestor) {
                Ok(None) => missing.push(ancestor),
                Ok(Some(EntryKind::Directory)) => break,
                Ok(Some(_)) => {
                    return Err(uncreatable(
                        ancestor,
                        FileSystemError::AlreadyExists(ancestor.to_path_buf()),
                    ))
                }
                Err(e) => return Err(uncreatable(ancestor, e)),
            }
        }

        if missing.is_empty() {
            report.directories_reused += 1;
            return Ok(());
        }

        for directory in missing.into_iter().rev() {
            if !options.dry_run {
                match self.filesystem.create_directory(directory) {
                    Ok(()) => {}
                    Err(FileSystemError::AlreadyExists(_))
                        if self.filesystem.is_directory(directory).unwrap_or(false) => {}
                    Err(e) => return Err(uncreatable(directory, e)),
                }
            }
            report.directories_created += 1;
            if options.verbose {
                info!("Created directory: {}", directory.display());
            }
        }

        Ok(())
    }

    /// Mirrors one source directory and returns its children, or `None` when
    /// its subtree must be skipped.
    fn visit_directory(
        &self,
        source_dir: &Path,
        source_root: &Path,
        destination_root: &Path,
        options: &CopyOptions,
        report: &mut CopyReport,
    ) -> Option<Vec<DirEntry>> {
        let target_dir = match mirror_path(source_root, destination_root, source_dir) {
            Ok(path) => path,
            Err(e) => {
                report.add_failure(
                    source_dir.to_path_buf(),
                    FailureKind::EntryCreateFailed,
                    e.to_string(),
                );
                return None;
            }
        };

        if let Err(message) = self.ensure_directory(&target_dir, options, report) {
            warn!("Failed to create directory {}: {}", target_dir.display(), message);
            report.add_failure(source_dir.to_path_buf(), FailureKind::EntryCreateFailed, message);
            return None;
        }

        match self.filesystem.list_directory(source_dir) {
            Ok(children) => Some(children),
            Err(e) => {
                warn!("Failed to list directory {}: {}", source_dir.display(), e);
                report.add_failure(
                    source_dir.to_path_buf(),
                    FailureKind::EntryListFailed,
                    e.to_string(),
                );
                None
            }
        }
    }

    /// Creates `target_dir`, reusing it if it is already a directory.
    fn ensure_directory(
        &self,
        target_dir: &Path,
        options: &CopyOptions,
        report: &mut CopyReport,
    ) -> Result<(), String> {
        if options.dry_run {
            return match self.filesystem.kind_of(target_dir) {
                Ok(None) => {
                    report.directories_created += 1;
                    Ok(())
                }
                Ok(Some(EntryKind::Directory)) => {
                    report.directories_reused += 1;
                    Ok(())
                }
                Ok(Some(_)) => {
                    Err(FileSystemError::AlreadyExists(target_dir.to_path_buf()).to_string())
                }
                Err(e) => Err(e.to_string()),
            };
        }

        match self.filesystem.create_directory(target_dir) {
            Ok(()) => {
                report.directories_created += 1;
                if options.verbose {
                    info!("Created directory: {}", target_dir.display());
                }
                Ok(())
            }
            Err(FileSystemError::AlreadyExists(path)) => {
                match self.filesystem.is_directory(target_dir) {
                    Ok(true) => {
                        report.directories_reused += 1;
                        debug!("Reusing existing directory: {}", target_dir.display());
                        Ok(())
                    }
                    Ok(false) => Err(format!(
                        "{} (not a directory)",
                        FileSystemError::AlreadyExists(path)
                    )),
                    Err(e) => Err(e.to_string()),
                }
            }
            Err(e) => Err(e.to_string()),
        }
    }

    fn visit_file(
        &self,
        source_file: &Path,
        source_root: &Path,
        destination_root: &Path,
        options: &CopyOptions,
        report: &mut CopyReport,
    ) {
        let target_file = match mirror_path(source_root, destination_root, source_file) {
            Ok(path) => path,
            Err(e) => {
                report.add_failure(
                    source_file.to_path_buf(),
                    FailureKind::EntryCopyFailed,
                    e.to_string(),
                );
                return;
            }
        };

        if !options.dry_run {
            if let Err(e) = self.filesystem.copy_file(source_file, &target_file) {
                warn!("Failed to copy {}: {}", source_file.display(), e);
                report.add_failure(
                    source_file.to_path_buf(),
                    FailureKind::EntryCopyFailed,
                    e.to_string(),
                );
                return;
            }

            if options.preserve_times {
                self.preserve_modified_time(source_file, &target_file);
            }
        }

        report.files_copied += 1;
        if options.verbose {
            info!("Copied: {} -> {}", source_file.display(), target_file.display());
        }
    }

    fn preserve_modified_time(&self, source_file: &Path, target_file: &Path) {
        let result = self
            .filesystem
            .get_metadata(source_file)
            .and_then(|metadata| self.filesystem.set_modified_time(target_file, metadata.modified));

        if let Err(e) = result {
            warn!("Failed to preserve timestamp for {}: {}", target_file.display(), e);
        }
    }
}
