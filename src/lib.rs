//! # page-previews
//!
//! Convert versioned page artwork (PNG) into web-optimised JPEG previews.
//!
//! ## Layout
//!
//! ```text
//! <source>/001-intro/page_001_v1.png   ──▶  <output>/page-01-v1.jpg
//! <source>/001-intro/page_001_v2.png   ──▶  <output>/page-01-v2.jpg
//! <source>/002-body/page_002_v3.png    ──▶  <output>/page-02-v3.jpg
//! ```
//!
//! The page number comes from the folder prefix, the version from the
//! `_v<N>` segment of the file name. Anything that does not follow the
//! convention is ignored.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source dir
//!  │
//!  ├─ 1. Input      check the source root, create the output root
//!  ├─ 2. Scan       NNN-name folders → page_*_vN.png files
//!  ├─ 3. Freshness  skip previews at least as new as their source
//!  ├─ 4. Transform  flatten alpha onto white, cap width (Lanczos3)
//!  └─ 5. Encode     JPEG at the configured quality, atomic replace
//! ```
//!
//! Files are processed one at a time. A file that fails to convert is logged
//! and counted; the rest of the batch still runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use page_previews::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .source_dir("../pages")
//!         .output_dir("images/pages")
//!         .build()?;
//!     let output = convert(&config)?;
//!     eprintln!("converted {} / skipped {}",
//!         output.stats.converted,
//!         output.stats.skipped);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `page-previews` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_file, ConvertedImage};
pub use error::{FileError, PreviewError};
pub use output::{ConversionOutput, ConversionStats, FileResult, FileStatus};
pub use pipeline::naming::{output_file_name, NameParse, SkipReason};
pub use pipeline::scan::{scan, ScanReport, VersionFile};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
