use std::fmt;
use std::path::PathBuf;
use chrono::{DateTime, Local};

/// Why a single entry could not be mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Destination directory could not be created; its subtree was skipped.
    EntryCreateFailed,
    /// File contents could not be copied.
    EntryCopyFailed,
    /// Source directory could not be listed; its subtree was skipped.
    EntryListFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::EntryCreateFailed => "create failed",
            FailureKind::EntryCopyFailed => "copy failed",
            FailureKind::EntryListFailed => "list failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Complete,
    CompletedWithErrors,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct CopyReport {
    pub files_copied: usize,
    pub directories_created: usize,
    pub directories_reused: usize,
    /// Entries that are neither files nor directories.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<EntryFailure>,
    pub cancelled: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
}

impl CopyReport {
    pub fn new() -> Self {
        Self {
            files_copied: 0,
            directories_created: 0,
            directories_reused: 0,
            skipped: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
            started_at: Local::now(),
            finished_at: None,
        }
    }

    pub(crate) fn add_failure(&mut self, path: PathBuf, kind: FailureKind, message: String) {
        self.failures.push(EntryFailure { path, kind, message });
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    pub fn outcome(&self) -> CopyOutcome {
        if self.cancelled {
            CopyOutcome::Cancelled
        } else if !self.failures.is_empty() {
            CopyOutcome::CompletedWithErrors
        } else {
            CopyOutcome::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome() == CopyOutcome::Complete
    }

    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let status = match self.outcome() {
            CopyOutcome::Complete => "Copy completed",
            CopyOutcome::CompletedWithErrors => "Copy completed with errors",
            CopyOutcome::Cancelled => "Copy cancelled",
        };
        lines.push(format!("{}:", status));
        lines.push(format!("  Files copied: {}", self.files_copied));
        lines.push(format!("  Directories created: {}", self.directories_created));
        lines.push(format!("  Directories reused: {}", self.directories_reused));
        lines.push(format!("  Entries skipped: {}", self.skipped.len()));

        if let Some(finished_at) = self.finished_at {
            let elapsed = finished_at.signed_duration_since(self.started_at);
            lines.push(format!(
                "  Started: {} ({} ms)",
                self.started_at.format("%Y-%m-%d %H:%M:%S"),
                elapsed.num_milliseconds()
            ));
        }

        if !self.skipped.is_empty() {
            lines.push(String::new());
            lines.push("Skipped entries:".to_string());
            for path in &self.skipped {
                lines.push(format!("  - {}", path.display()));
            }
        }

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Failed entries:".to_string());
            for failure in &self.failures {
                lines.push(format!(
                    "  - [{}] {}: {}",
                    failure.kind,
                    failure.path.display(),
                    failure.message
                ));
            }
        }

        lines.join("\n")
    }
}

impl Default for CopyReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
