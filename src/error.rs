//! Error types for the page-previews library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PreviewError`] — **Fatal**: the batch cannot start at all (source
//!   directory missing, output directory not creatable, bad configuration).
//!   Returned as `Err(PreviewError)` from [`crate::convert::convert`].
//!
//! * [`FileError`] — **Non-fatal**: a single version file failed to decode,
//!   encode or write. Stored inside [`crate::output::FileResult`] so the rest
//!   of the batch still runs and the failed file is retried on the next run.
//!
//! Names that do not follow the `NNN-name/page_*_vN.png` convention are not
//! errors at all; see [`crate::pipeline::naming::NameParse`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the page-previews library.
#[derive(Debug, Error)]
pub enum PreviewError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The source pages directory does not exist.
    #[error("Source directory not found: '{path}'")]
    SourceNotFound { path: PathBuf },

    /// The source path exists but is a file, not a directory.
    #[error("Source path is not a directory: '{path}'")]
    SourceNotADirectory { path: PathBuf },

    /// Process does not have read permission on the source directory.
    #[error("Permission denied reading '{path}'\nTry: chmod +rx {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Listing a directory failed part-way through the scan.
    #[error("Failed to read directory '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single version file.
///
/// The batch continues; the output is left absent (or stale) so the next run
/// sees the source as newer and tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// Source file metadata (mtime) could not be read.
    #[error("{file}: cannot stat source: {detail}")]
    SourceMetadata { file: String, detail: String },

    /// The PNG could not be opened or decoded.
    #[error("{file}: decode failed: {detail}")]
    DecodeFailed { file: String, detail: String },

    /// The JPEG encoder rejected the image.
    #[error("{file}: JPEG encode failed: {detail}")]
    EncodeFailed { file: String, detail: String },

    /// Writing or renaming the output file failed.
    #[error("{file}: write failed: {detail}")]
    WriteFailed { file: String, detail: String },
}

impl FileError {
    /// Name of the source file this error belongs to.
    pub fn file(&self) -> &str {
        match self {
            FileError::SourceMetadata { file, .. }
            | FileError::DecodeFailed { file, .. }
            | FileError::EncodeFailed { file, .. }
            | FileError::WriteFailed { file, .. } => file,
        }
    }
}
