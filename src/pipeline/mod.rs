//! Pipeline stages for page-preview conversion.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own without a full source tree on disk.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ scan ──▶ freshness ──▶ transform ──▶ encode
//! (root)  (naming)   (mtime)      (flatten,     (JPEG,
//!                                  resize)       atomic write)
//! ```
//!
//! 1. [`input`]     — validate the source root before any work starts
//! 2. [`naming`]    — pure name parsing: folder prefix, version segment,
//!    output file name
//! 3. [`scan`]      — walk page folders and collect [`scan::VersionFile`]s
//! 4. [`freshness`] — skip files whose preview is already up to date
//! 5. [`transform`] — flatten transparency onto white and cap the width
//! 6. [`encode`]    — JPEG-encode and atomically replace the preview

pub mod encode;
pub mod freshness;
pub mod input;
pub mod naming;
pub mod scan;
pub mod transform;
