//! CLI binary for page-previews.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use page_previews::pipeline::input;
use page_previews::{
    convert, ConversionConfig, ConversionOutput, ConversionProgressCallback, ProgressCallback,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

/// Every human-readable line goes to stderr; colour only when it is a terminal.
static STDERR_IS_TTY: Lazy<bool> = Lazy::new(|| io::stderr().is_terminal());

fn paint(code: &str, s: &str) -> String {
    if *STDERR_IS_TTY {
        format!("\x1b[{code}m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}
fn green(s: &str) -> String {
    paint("32", s)
}
fn red(s: &str) -> String {
    paint("31", s)
}
fn dim(s: &str) -> String {
    paint("2", s)
}
fn bold(s: &str) -> String {
    paint("1", s)
}
fn cyan(s: &str) -> String {
    paint("36", s)
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar anchored at the bottom of the terminal
/// plus one log line per file event printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Wall-clock start of the file currently being converted.
    started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// Spinner-only until `on_conversion_start` reports the file count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("page folders…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }

    fn elapsed(&self) -> String {
        let secs = self
            .started
            .lock()
            .map(|mut s| s.take())
            .ok()
            .flatten()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        dim(&format!("{secs:.1}s"))
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, source_dir: &str, total_files: usize) {
        self.activate_bar(total_files);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Scanned {source_dir}: {total_files} page versions found"
            ))
        ));
    }

    fn on_file_start(&self, source_name: &str, output_name: &str) {
        if let Ok(mut s) = self.started.lock() {
            *s = Some(Instant::now());
        }
        self.bar.set_message(output_name.to_string());
        self.bar
            .println(format!("  Converting {source_name} -> {output_name}"));
    }

    fn on_file_resized(&self, width: u32, height: u32) {
        self.bar
            .println(dim(&format!("    Resized to {width}x{height}")));
    }

    fn on_file_complete(&self, output_name: &str, _width: u32, _height: u32) {
        self.bar.println(format!(
            "    {} Saved {output_name}  {}",
            green("✓"),
            self.elapsed()
        ));
        self.bar.inc(1);
    }

    fn on_file_pending(&self, source_name: &str, output_name: &str) {
        self.bar
            .println(format!("  Would convert {source_name} -> {output_name}"));
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, output_name: &str) {
        self.bar
            .println(dim(&format!("  Skip {output_name} (already exists)")));
        self.bar.inc(1);
    }

    fn on_file_error(&self, source_name: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 100 {
            format!("{}\u{2026}", error.chars().take(99).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "    {} Error converting {source_name}: {}  {}",
            red("✗"),
            red(&msg),
            self.elapsed()
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, _converted: usize, _skipped: usize, _failed: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert ../pages into images/pages (run from the docs directory)
  page-previews

  # Explicit directories
  page-previews ~/book/pages site/images/pages

  # Smaller, lighter previews
  page-previews --max-width 800 --quality 70

  # Rebuild everything, ignoring timestamps
  page-previews --force

  # Show what would be converted
  page-previews --dry-run

INPUT LAYOUT:
  <source>/<NNN-name>/page_<NNN>_v<N>.png   e.g. 001-cover/page_001_v3.png

OUTPUT LAYOUT:
  <output>/page-<NN>-v<N>.jpg                e.g. page-01-v3.jpg

  Folders without a numeric prefix and files whose version is not a number
  are ignored. A preview is only rebuilt when its source PNG is newer.
"#;

const NEXT_STEP_HINT: &str = "Now run: python generate_version_metadata.py\n  \
This will update version-metadata.js with the new versions";

/// Convert versioned page PNGs into web-optimised JPEG previews.
#[derive(Parser, Debug)]
#[command(
    name = "page-previews",
    version,
    about = "Convert versioned page PNGs into web-optimised JPEG previews",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source pages directory containing NNN-name folders.
    #[arg(default_value = page_previews::config::DEFAULT_SOURCE_DIR)]
    source: PathBuf,

    /// Flat output directory for the JPEG previews.
    #[arg(default_value = page_previews::config::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Maximum preview width in pixels; wider images are scaled down.
    #[arg(long, env = "PAGE_PREVIEWS_MAX_WIDTH", default_value_t = page_previews::config::DEFAULT_MAX_WIDTH,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_width: u32,

    /// JPEG quality (1–100).
    #[arg(long, env = "PAGE_PREVIEWS_QUALITY", default_value_t = page_previews::config::DEFAULT_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Reconvert every file, even when its preview is up to date.
    #[arg(long, env = "PAGE_PREVIEWS_FORCE")]
    force: bool,

    /// Report what would be converted without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Output the structured report (ConversionOutput) as JSON on stdout.
    #[arg(long, env = "PAGE_PREVIEWS_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PAGE_PREVIEWS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAGE_PREVIEWS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAGE_PREVIEWS_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar prints every per-file line itself, so library INFO
    // logs are only shown when the bar is off. A piped stderr gets no bar.
    let show_progress = !cli.quiet
        && !cli.no_progress
        && !cli.json
        && !cli.verbose
        && *STDERR_IS_TTY;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_ansi(*STDERR_IS_TTY)
        .init();

    // ── Precondition: source must exist ──────────────────────────────────
    input::resolve_source(&cli.source)
        .with_context(|| format!("Cannot convert pages from {}", cli.source.display()))?;

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert(&config).context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&output, cli.dry_run);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .source_dir(&cli.source)
        .output_dir(&cli.output)
        .max_width(cli.max_width)
        .quality(cli.quality)
        .force(cli.force)
        .dry_run(cli.dry_run);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(output: &ConversionOutput, dry_run: bool) {
    let stats = &output.stats;
    eprintln!();
    eprintln!("{}", bold("=== Conversion Complete ==="));
    eprintln!("Converted: {} files", stats.converted);
    eprintln!("Skipped: {} files (already up to date)", stats.skipped);
    if stats.failed > 0 {
        eprintln!("{}", red(&format!("Failed: {} files", stats.failed)));
        for f in output.failures() {
            eprintln!("  {} {}", red("✗"), f.source.display());
        }
    }
    if dry_run {
        eprintln!("Pending: {} files (would convert)", stats.pending);
    }
    eprintln!("{}", dim(&format!("{}ms total", stats.total_duration_ms)));

    if stats.converted > 0 {
        eprintln!();
        eprintln!("{} {}", green("✓"), NEXT_STEP_HINT);
    }
}
