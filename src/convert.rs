//! Batch conversion entry points.
//!
//! [`convert`] runs the whole pipeline over a source tree, one file at a time.
//! [`convert_file`] is the per-file decode → flatten → resize → encode step it
//! uses, exposed for callers that want to convert a single PNG.

use crate::config::ConversionConfig;
use crate::error::{FileError, PreviewError};
use crate::output::{ConversionOutput, ConversionStats, FileResult, FileStatus};
use crate::pipeline::scan::{self, VersionFile};
use crate::pipeline::{encode, freshness, input, transform};
use image::ImageReader;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Dimensions of a freshly written preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedImage {
    pub width: u32,
    pub height: u32,
    pub resized: bool,
}

/// Convert every version file under `config.source_dir`.
///
/// # Returns
/// `Ok(ConversionOutput)` once every discovered file has been attempted,
/// even if some of them failed (check `output.stats.failed`).
///
/// # Errors
/// Returns `Err(PreviewError)` only when the batch cannot run:
/// - source directory missing, not a directory, or unreadable
/// - output directory cannot be created
pub fn convert(config: &ConversionConfig) -> Result<ConversionOutput, PreviewError> {
    let total_start = Instant::now();

    // ── Step 1: Validate source, prepare output ──────────────────────────
    input::resolve_source(&config.source_dir)?;
    if !config.dry_run {
        input::ensure_output_dir(&config.output_dir)?;
    }

    // ── Step 2: Discover version files ───────────────────────────────────
    info!("Scanning {} for page versions", config.source_dir.display());
    let report = scan::scan(&config.source_dir)?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(
            &config.source_dir.display().to_string(),
            report.files.len(),
        );
    }

    // ── Step 3: Convert sequentially ─────────────────────────────────────
    // A name seen earlier in this run bypasses the freshness check, so the
    // later of two colliding sources overwrites the earlier one.
    let mut seen: HashSet<&str> = HashSet::new();
    let files: Vec<FileResult> = report
        .files
        .iter()
        .map(|file| {
            let repeated = !seen.insert(file.output_name.as_str());
            process_file(file, config, repeated)
        })
        .collect();

    // ── Step 4: Compute stats ────────────────────────────────────────────
    let count = |pred: fn(&FileStatus) -> bool| files.iter().filter(|f| pred(&f.status)).count();
    let stats = ConversionStats {
        discovered: report.files.len(),
        converted: count(|s| matches!(s, FileStatus::Converted { .. })),
        skipped: count(|s| matches!(s, FileStatus::Skipped)),
        failed: count(|s| matches!(s, FileStatus::Failed { .. })),
        pending: count(|s| matches!(s, FileStatus::WouldConvert)),
        ignored_entries: report.ignored.len(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} converted, {} skipped, {} failed in {}ms",
        stats.converted, stats.skipped, stats.failed, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(stats.converted, stats.skipped, stats.failed);
    }

    Ok(ConversionOutput { files, stats })
}

/// Freshness check plus conversion for one discovered file.
///
/// `repeated` marks an output name already produced earlier in this run.
fn process_file(file: &VersionFile, config: &ConversionConfig, repeated: bool) -> FileResult {
    let output = config.output_dir.join(&file.output_name);
    let source_name = file.source_name();

    let status = match file.source_modified() {
        Err(e) => fail(
            config,
            FileError::SourceMetadata {
                file: source_name,
                detail: e.to_string(),
            },
        ),
        Ok(modified)
            if !config.force && !repeated && freshness::is_up_to_date(&output, modified) =>
        {
            info!("Skip {} (already exists)", file.output_name);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_skipped(&file.output_name);
            }
            FileStatus::Skipped
        }
        Ok(_) if config.dry_run => {
            info!("Would convert {} -> {}", source_name, file.output_name);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_pending(&source_name, &file.output_name);
            }
            FileStatus::WouldConvert
        }
        Ok(_) => {
            info!("Converting {} -> {}", source_name, file.output_name);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_start(&source_name, &file.output_name);
            }
            match convert_file(&file.source_path, &output, config) {
                Ok(img) => {
                    info!("Saved {}", file.output_name);
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_file_complete(&file.output_name, img.width, img.height);
                    }
                    FileStatus::Converted {
                        width: img.width,
                        height: img.height,
                        resized: img.resized,
                    }
                }
                Err(error) => fail(config, error),
            }
        }
    };

    FileResult {
        page: file.page,
        version: file.version,
        source: file.source_path.clone(),
        output,
        status,
    }
}

fn fail(config: &ConversionConfig, error: FileError) -> FileStatus {
    warn!("Error converting {}", error);
    if let Some(ref cb) = config.progress_callback {
        cb.on_file_error(error.file(), &error.to_string());
    }
    FileStatus::Failed { error }
}

/// Convert one PNG at `source` into a JPEG preview at `output`.
///
/// Uses `config.max_width` and `config.quality`; the directory and
/// freshness settings are ignored. The parent of `output` must exist.
pub fn convert_file(
    source: &Path,
    output: &Path,
    config: &ConversionConfig,
) -> Result<ConvertedImage, FileError> {
    let file = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    let decoded = ImageReader::open(source)
        .map_err(|e| FileError::DecodeFailed {
            file: file.clone(),
            detail: e.to_string(),
        })?
        .with_guessed_format()
        .map_err(|e| FileError::DecodeFailed {
            file: file.clone(),
            detail: e.to_string(),
        })?
        .decode()
        .map_err(|e| FileError::DecodeFailed {
            file: file.clone(),
            detail: e.to_string(),
        })?;
    debug!(
        "Decoded {} → {}x{} {:?}",
        file,
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    let rgb = transform::flatten_onto_white(decoded);
    let (rgb, resized) = transform::fit_width(rgb, config.max_width);
    let (width, height) = rgb.dimensions();
    if resized {
        info!("Resized to {}x{}", width, height);
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_resized(width, height);
        }
    }

    let bytes = encode::encode_jpeg(&rgb, config.quality).map_err(|e| FileError::EncodeFailed {
        file: file.clone(),
        detail: e.to_string(),
    })?;
    drop(rgb);

    encode::write_atomic(output, &bytes).map_err(|e| FileError::WriteFailed {
        file,
        detail: e.to_string(),
    })?;

    Ok(ConvertedImage {
        width,
        height,
        resized,
    })
}
