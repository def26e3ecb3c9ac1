//! JPEG encoding and atomic output replacement.
//!
//! The preview is encoded fully in memory, written next to its final path as
//! `<name>.jpg.tmp`, then renamed over the old preview. An interrupted run
//! therefore never leaves a truncated JPEG whose fresh mtime would make the
//! next run skip it.

use image::RgbImage;
use jpeg_encoder::{ColorType, Encoder, EncodingError};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// JPEG stores each dimension in 16 bits.
const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Why an in-memory JPEG encode failed.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{width}x{height} exceeds the JPEG limit of {MAX_JPEG_DIMENSION} pixels per side")]
    TooLarge { width: u32, height: u32 },

    #[error(transparent)]
    Jpeg(#[from] EncodingError),
}

/// Encode an RGB image as JPEG at `quality` (1–100) with optimised Huffman tables.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    encode_with(img, quality, true)
}

fn encode_with(img: &RgbImage, quality: u8, optimize: bool) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = img.dimensions();
    let too_large = || EncodeError::TooLarge { width, height };
    let w = u16::try_from(width).map_err(|_| too_large())?;
    let h = u16::try_from(height).map_err(|_| too_large())?;

    let mut buf = Vec::new();
    let mut encoder = Encoder::new(&mut buf, quality);
    encoder.set_optimized_huffman_tables(optimize);
    encoder.encode(img.as_raw(), w, h, ColorType::Rgb)?;
    debug!(
        "Encoded {}x{} JPEG at quality {} (optimized: {}) → {} bytes",
        width,
        height,
        quality,
        optimize,
        buf.len()
    );
    Ok(buf)
}

/// Write `bytes` to `path` via a sibling temp file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("jpg.tmp");
    if let Err(e) = std::fs::write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }
    std::fs::rename(&tmp_path, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp_path);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    fn encode_small_image() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 0, 0]));
        let bytes = encode_jpeg(&img, 85).expect("encode should succeed");
        // SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).expect("valid JPEG");
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn lower_quality_is_smaller() {
        let img = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]));
        let high = encode_jpeg(&img, 95).unwrap();
        let low = encode_jpeg(&img, 20).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn optimized_tables_are_no_larger_than_baseline() {
        let img = RgbImage::from_fn(96, 64, |x, y| {
            Rgb([(x * 2) as u8, (y * 3) as u8, ((x + y) % 256) as u8])
        });
        let baseline = encode_with(&img, 85, false).unwrap();
        let optimized = encode_jpeg(&img, 85).unwrap();
        assert!(
            optimized.len() <= baseline.len(),
            "optimized {} > baseline {}",
            optimized.len(),
            baseline.len()
        );
        image::load_from_memory(&optimized).expect("optimized output decodes");
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let img = RgbImage::new(MAX_JPEG_DIMENSION + 1, 1);
        let err = encode_jpeg(&img, 85).unwrap_err();
        assert!(matches!(err, EncodeError::TooLarge { width: 65536, height: 1 }));
    }

    #[test]
    fn write_atomic_replaces_and_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("page-01-v1.jpg");
        std::fs::write(&out, b"old").unwrap();

        write_atomic(&out, b"new").unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"new");
        assert!(!tmp.path().join("page-01-v1.jpg.tmp").exists());
    }

    #[test]
    fn write_atomic_into_missing_dir_fails_cleanly() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("missing").join("page-01-v1.jpg");
        assert!(write_atomic(&out, b"x").is_err());
    }
}
