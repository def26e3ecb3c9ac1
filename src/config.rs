//! Configuration types for page-preview conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The two directories plus the encoding
//! knobs live in one struct so the CLI, tests and library callers all go
//! through the same validation.

use crate::error::PreviewError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default source directory, relative to the docs directory the tool runs in.
pub const DEFAULT_SOURCE_DIR: &str = "../pages";

/// Default flat output directory for the JPEG previews.
pub const DEFAULT_OUTPUT_DIR: &str = "images/pages";

/// Default maximum preview width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 1200;

/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 85;

/// Configuration for a batch conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use page_previews::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .source_dir("../pages")
///     .output_dir("images/pages")
///     .max_width(1600)
///     .quality(90)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_width, 1600);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Root directory holding one `NNN-name` folder per page. Default: `../pages`.
    pub source_dir: PathBuf,

    /// Flat directory receiving `page-NN-vN.jpg` files. Default: `images/pages`.
    pub output_dir: PathBuf,

    /// Images wider than this are scaled down proportionally. Default: 1200.
    ///
    /// Narrower images keep their original resolution; previews are never
    /// upscaled.
    pub max_width: u32,

    /// JPEG quality, 1–100. Default: 85.
    pub quality: u8,

    /// Reconvert every file even when its preview is up to date. Default: false.
    pub force: bool,

    /// Scan and evaluate freshness only; write nothing. Default: false.
    pub dry_run: bool,

    /// Optional per-file progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
            force: false,
            dry_run: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("source_dir", &self.source_dir)
            .field("output_dir", &self.output_dir)
            .field("max_width", &self.max_width)
            .field("quality", &self.quality)
            .field("force", &self.force)
            .field("dry_run", &self.dry_run)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn source_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.source_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn max_width(mut self, px: u32) -> Self {
        self.config.max_width = px.max(1);
        self
    }

    pub fn quality(mut self, q: u8) -> Self {
        self.config.quality = q.clamp(1, 100);
        self
    }

    pub fn force(mut self, v: bool) -> Self {
        self.config.force = v;
        self
    }

    pub fn dry_run(mut self, v: bool) -> Self {
        self.config.dry_run = v;
        self
    }

    /// Attach a progress observer, see [`crate::progress`].
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, PreviewError> {
        let c = &self.config;
        if c.max_width == 0 {
            return Err(PreviewError::InvalidConfig(
                "max width must be ≥ 1".into(),
            ));
        }
        if c.quality == 0 || c.quality > 100 {
            return Err(PreviewError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.quality
            )));
        }
        if c.source_dir.as_os_str().is_empty() || c.output_dir.as_os_str().is_empty() {
            return Err(PreviewError::InvalidConfig(
                "source and output directories must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_web_preview_layout() {
        let c = ConversionConfig::default();
        assert_eq!(c.source_dir, PathBuf::from("../pages"));
        assert_eq!(c.output_dir, PathBuf::from("images/pages"));
        assert_eq!(c.max_width, 1200);
        assert_eq!(c.quality, 85);
        assert!(!c.force);
        assert!(!c.dry_run);
    }

    #[test]
    fn builder_clamps_out_of_range_values() {
        let c = ConversionConfig::builder()
            .quality(0)
            .max_width(0)
            .build()
            .expect("clamped values are valid");
        assert_eq!(c.quality, 1);
        assert_eq!(c.max_width, 1);

        let c = ConversionConfig::builder().quality(250).build().unwrap();
        assert_eq!(c.quality, 100);
    }

    #[test]
    fn build_rejects_empty_directories() {
        let err = ConversionConfig::builder()
            .output_dir("")
            .build()
            .unwrap_err();
        assert!(matches!(err, PreviewError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_callback() {
        use crate::progress::NoopProgressCallback;
        use std::sync::Arc;

        let c = ConversionConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let s = format!("{c:?}");
        assert!(s.contains("<dyn ConversionProgressCallback>"));
    }
}
