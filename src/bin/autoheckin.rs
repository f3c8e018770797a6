//! CLI binary for autoheckin.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, prints one status line per texture, and exits with the
//! number of textures that failed to convert.

use anyhow::{Context, Result};
use autoheckin::{
    convert, CompressQuality, ConversionConfig, ConversionProgressCallback, JobError,
    ProgressCallback, Stage, ToolPaths,
};
use clap::builder::FalseyValueParser;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

fn paint(enabled: bool, colour: fn(&str) -> String, s: &str) -> String {
    if enabled {
        colour(s)
    } else {
        s.to_string()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints the per-texture status lines and, on a terminal, a spinner naming
/// the stage that is currently running.
struct CliReporter {
    spinner: Option<ProgressBar>,
    /// Status lines on stdout (off for `--json` / `--quiet`).
    status_lines: bool,
    colour_out: bool,
    colour_err: bool,
}

impl CliReporter {
    fn new(cli: &Cli) -> Arc<Self> {
        let spinner = (!cli.no_progress && !cli.quiet && io::stderr().is_terminal()).then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self {
            spinner,
            status_lines: !cli.json && !cli.quiet,
            colour_out: io::stdout().is_terminal(),
            colour_err: io::stderr().is_terminal(),
        })
    }

    /// Run `f` with the spinner hidden so printed lines are not torn.
    fn print(&self, f: impl FnOnce()) {
        match self.spinner {
            Some(ref bar) => bar.suspend(f),
            None => f(),
        }
    }
}

impl ConversionProgressCallback for CliReporter {
    fn on_job_start(&self, index: usize, total: usize, input: &Path) {
        if let Some(ref bar) = self.spinner {
            bar.set_prefix(format!("{index}/{total}"));
            bar.set_message(display_name(input));
        }
        if self.status_lines {
            self.print(|| println!("\nConverting '{}'...", input.display()));
        }
    }

    fn on_stage(&self, input: &Path, stage: Stage) {
        if let Some(ref bar) = self.spinner {
            bar.set_message(format!("{}: {stage}", display_name(input)));
        }
    }

    fn on_job_complete(&self, _index: usize, _total: usize, input: &Path, output: &Path) {
        if self.status_lines {
            let line = format!(
                "Successfully converted {} into {}.",
                display_name(input),
                paint(self.colour_out, bold, &display_name(output))
            );
            self.print(|| println!("{}", paint(self.colour_out, green, &line)));
        }
    }

    fn on_job_error(&self, _index: usize, _total: usize, _input: &Path, error: &JobError) {
        self.print(|| eprintln!("{} {error}", paint(self.colour_err, red, "ERROR:")));
    }

    fn on_batch_complete(&self, _total: usize, _succeeded: usize) {
        if let Some(ref bar) = self.spinner {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a few textures in place
  autoheckin rock_n.dds wall$bc7.tga hud.png$bc7.tga

  # Use tools from another directory
  autoheckin --tools-dir ~/autoheckin/tools foo.png

  # Keep the DivinityMachine output without the final compression pass
  autoheckin --skip-compression foo.png

  # Machine-readable report for build scripts
  autoheckin --json textures/*.tga > report.json

NAMING CONVENTIONS:
  File name            Format     Output
  ───────────────────  ─────────  ──────────
  foo.png              BC1_RGBA   foo.tga
  rock_n.dds           BC5        rock_n.tga
  wall$bc7.tga         BC7        wall
  hud.png$bc7.tga      BC7        hud        (PNG transform output)

EXIT STATUS:
  0 when every texture converted, otherwise the number of failed textures.
  1 when no textures are given or a required tool is missing.

ENVIRONMENT VARIABLES:
  AUTOHECKIN_TOOLS_DIR         Directory holding the tools (default: tools/ next to the binary)
  AUTOHECKIN_SKIP_COMPRESSION  Skip EternalTextureCompressor
  AUTOHECKIN_NO_CLOBBER        Never overwrite an existing output file
  AUTOHECKIN_QUALITY           cuttlefish quality preset
  RUST_LOG                     Log filter, e.g. RUST_LOG=autoheckin=debug
"#;

/// Convert textures into game-ready assets.
#[derive(Parser, Debug)]
#[command(
    name = "autoheckin",
    version,
    about = "Convert textures into game-ready assets",
    long_about = "Convert textures into game-ready assets by running them through \
nvdecompress, cuttlefish, DivinityMachine and EternalTextureCompressor. The target \
format and output name are derived from each file name.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Texture files to convert.
    inputs: Vec<PathBuf>,

    /// Directory containing the external tools.
    #[arg(long, env = "AUTOHECKIN_TOOLS_DIR")]
    tools_dir: Option<PathBuf>,

    /// cuttlefish quality preset.
    #[arg(long, env = "AUTOHECKIN_QUALITY", value_enum, default_value = "lowest")]
    quality: QualityArg,

    /// Skip the final EternalTextureCompressor pass.
    #[arg(long, env = "AUTOHECKIN_SKIP_COMPRESSION", value_parser = FalseyValueParser::new())]
    skip_compression: bool,

    /// Never overwrite an existing file; append -2, -3, … instead.
    #[arg(long, env = "AUTOHECKIN_NO_CLOBBER", value_parser = FalseyValueParser::new())]
    no_clobber: bool,

    /// Keep the decompressed .tga when cuttlefish fails on a .dds input.
    #[arg(long)]
    keep_failed_intermediates: bool,

    /// Print a JSON report instead of status lines.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum QualityArg {
    Lowest,
    Low,
    Normal,
    High,
    Highest,
}

impl From<QualityArg> for CompressQuality {
    fn from(v: QualityArg) -> Self {
        match v {
            QualityArg::Lowest => CompressQuality::Lowest,
            QualityArg::Low => CompressQuality::Low,
            QualityArg::Normal => CompressQuality::Normal,
            QualityArg::High => CompressQuality::High,
            QualityArg::Highest => CompressQuality::Highest,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!(
                "\n{} {e:#}",
                paint(io::stderr().is_terminal(), red, "ERROR:")
            );
            1
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Status lines carry the normal feedback; logs are for diagnosing tools.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Usage ────────────────────────────────────────────────────────────
    if cli.inputs.is_empty() {
        print_usage();
        return Ok(1);
    }

    // ── Pre-flight: every tool must be present ───────────────────────────
    let tools = match cli.tools_dir {
        Some(ref dir) => ToolPaths::locate(dir),
        None => ToolPaths::locate_default(),
    }
    .context("Required tools are missing")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let reporter = CliReporter::new(&cli);
    let config = build_config(&cli, tools, reporter);
    let report = convert(&cli.inputs, &config).context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        println!("\nDone.");
    }

    Ok(report.exit_code())
}

fn print_usage() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "autoheckin".to_string());
    println!("\nUsage:");
    println!("{program} [texture1] [texture2] [...]\n");
    println!("Run '{program} --help' for all options.");
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, tools: ToolPaths, reporter: Arc<CliReporter>) -> ConversionConfig {
    ConversionConfig::builder(tools)
        .quality(cli.quality.into())
        .skip_final_compression(cli.skip_compression)
        .no_clobber(cli.no_clobber)
        .keep_intermediate_on_compress_failure(cli.keep_failed_intermediates)
        .progress_callback(reporter as ProgressCallback)
        .build()
}
