//! Input resolution: validate the source root and prepare the output root.
//!
//! Both checks run before the scan so a missing source tree is reported as a
//! single configuration error instead of an empty, "successful" batch.

use crate::error::PreviewError;
use std::path::Path;
use tracing::debug;

/// Validate that `path` is an existing, listable directory.
pub fn resolve_source(path: &Path) -> Result<(), PreviewError> {
    let meta = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PreviewError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(PreviewError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    if !meta.is_dir() {
        return Err(PreviewError::SourceNotADirectory {
            path: path.to_path_buf(),
        });
    }

    // Check list permission by attempting to open
    match std::fs::read_dir(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PreviewError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(PreviewError::ReadDirFailed {
                path: path.to_path_buf(),
                source: e,
            });
        }
    }

    debug!("Resolved source directory: {}", path.display());
    Ok(())
}

/// Create the output directory (and parents) if it does not exist yet.
pub fn ensure_output_dir(path: &Path) -> Result<(), PreviewError> {
    std::fs::create_dir_all(path).map_err(|e| PreviewError::OutputDirFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
