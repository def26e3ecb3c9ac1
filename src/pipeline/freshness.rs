//! Freshness check: is the preview at least as new as its source?
//!
//! The output directory doubles as the cache index. A preview whose mtime is
//! greater than or equal to its source's mtime is considered up to date, so a
//! second run over untouched sources converts nothing.

use std::path::Path;
use std::time::SystemTime;

/// `true` when `output` exists and was modified at or after `source_modified`.
///
/// A missing output, or one whose metadata cannot be read, is stale.
pub fn is_up_to_date(output: &Path, source_modified: SystemTime) -> bool {
    std::fs::metadata(output)
        .and_then(|m| m.modified())
        .map(|out_modified| out_modified >= source_modified)
        .unwrap_or(false)
}
