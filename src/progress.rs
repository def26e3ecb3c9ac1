//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the batch walks the page folders. The library itself only logs
//! through `tracing`; anything user-facing (progress bars, console lines)
//! hangs off this trait.
//!
//! # Example
//!
//! ```rust
//! use page_previews::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     saved: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, output_name: &str, _width: u32, _height: u32) {
//!         self.saved.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("saved {output_name}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { saved: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the converter as it processes each version file.
///
/// The batch is sequential, so events arrive in order: `on_file_start`, then
/// optionally `on_file_resized`, then exactly one of `on_file_complete` or
/// `on_file_error`. Up-to-date files only produce `on_file_skipped`; in a dry
/// run, files that would be converted only produce `on_file_pending`.
/// All methods have default no-op implementations.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the scan, before any file is converted.
    ///
    /// # Arguments
    /// * `source_dir`  — the scanned source root, for display
    /// * `total_files` — number of version files discovered
    fn on_conversion_start(&self, source_dir: &str, total_files: usize) {
        let _ = (source_dir, total_files);
    }

    /// Called just before a source file is decoded.
    fn on_file_start(&self, source_name: &str, output_name: &str) {
        let _ = (source_name, output_name);
    }

    /// Called when the image was wider than `max_width` and got scaled down.
    fn on_file_resized(&self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called after the JPEG has been written.
    fn on_file_complete(&self, output_name: &str, width: u32, height: u32) {
        let _ = (output_name, width, height);
    }

    /// Dry run only: called for a file that a real run would convert.
    fn on_file_pending(&self, source_name: &str, output_name: &str) {
        let _ = (source_name, output_name);
    }

    /// Called when the preview is already at least as new as its source.
    fn on_file_skipped(&self, output_name: &str) {
        let _ = output_name;
    }

    /// Called when a file fails; the batch carries on with the next file.
    fn on_file_error(&self, source_name: &str, error: &str) {
        let _ = (source_name, error);
    }

    /// Called once after all files have been attempted.
    fn on_conversion_complete(&self, converted: usize, skipped: usize, failed: usize) {
        let _ = (converted, skipped, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        skips: AtomicUsize,
        pending: AtomicUsize,
        errors: AtomicUsize,
        resized: Mutex<Vec<(u32, u32)>>,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_file_start(&self, _source_name: &str, _output_name: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_resized(&self, width: u32, height: u32) {
            self.resized.lock().unwrap().push((width, height));
        }

        fn on_file_complete(&self, _output_name: &str, _width: u32, _height: u32) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_skipped(&self, _output_name: &str) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_pending(&self, _source_name: &str, _output_name: &str) {
            self.pending.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_error(&self, _source_name: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start("../pages", 3);
        cb.on_file_start("page_001_v1.png", "page-01-v1.jpg");
        cb.on_file_resized(1200, 800);
        cb.on_file_complete("page-01-v1.jpg", 1200, 800);
        cb.on_file_skipped("page-01-v2.jpg");
        cb.on_file_pending("page_003_v1.png", "page-03-v1.jpg");
        cb.on_file_error("page_002_v1.png", "decode failed");
        cb.on_conversion_complete(1, 1, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_file_start("page_001_v1.png", "page-01-v1.jpg");
        tracker.on_file_resized(1200, 800);
        tracker.on_file_complete("page-01-v1.jpg", 1200, 800);
        tracker.on_file_skipped("page-01-v2.jpg");
        tracker.on_file_start("page_002_v1.png", "page-02-v1.jpg");
        tracker.on_file_error("page_002_v1.png", "truncated");
        tracker.on_file_pending("page_003_v1.png", "page-03-v1.jpg");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.pending.load(Ordering::SeqCst), 1);
        assert_eq!(*tracker.resized.lock().unwrap(), vec![(1200, 800)]);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_conversion_start("pages", 10);
        cb.on_file_skipped("page-01-v1.jpg");
    }
}
