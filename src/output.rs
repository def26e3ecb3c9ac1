//! Result types returned by a batch conversion.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one version file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// A new preview was written.
    Converted {
        width: u32,
        height: u32,
        resized: bool,
    },
    /// The preview was already up to date.
    Skipped,
    /// Dry run: the preview is stale and would be written.
    WouldConvert,
    /// Conversion failed; the preview was left untouched.
    Failed { error: FileError },
}

/// Per-file outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub page: u32,
    pub version: u32,
    pub source: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Aggregate counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Version files found by the scan.
    pub discovered: usize,
    pub converted: usize,
    /// Up to date, not reconverted.
    pub skipped: usize,
    pub failed: usize,
    /// Dry run only: stale previews that a real run would write.
    pub pending: usize,
    /// Folders and files ignored because of their names.
    pub ignored_entries: usize,
    pub total_duration_ms: u64,
}

/// Full report of a batch conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub files: Vec<FileResult>,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Results for files that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed { .. }))
    }
}
