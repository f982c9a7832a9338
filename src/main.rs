//! diskusage - show disk usage as a size-annotated tree.
//!
//! Usage:
//!   diskusage [DIR]                  Largest entries directly below DIR
//!   diskusage -r -l 20 [DIR]         Twenty largest entries at any depth
//!   diskusage -t rs,toml -u K [DIR]  Only count Rust and TOML files
//!   diskusage --format json [DIR]    Machine-readable rows
//!   diskusage --help                 Show help

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use diskusage_core::{DEFAULT_WORKERS, ScanError, StatConfig, StatTree, Unit};
use diskusage_render::{ColorMode, Presenter, Theme};
use diskusage_scan::Scanner;

#[derive(Parser)]
#[command(
    name = "diskusage",
    version,
    about = "Show disk usage as a size-annotated tree",
    long_about = "diskusage walks a directory concurrently, sums file sizes bottom-up and \
                  prints the largest entries as a tree, each with its share of the total."
)]
struct Cli {
    /// Directory to analyze (defaults to current directory)
    path: Option<PathBuf>,

    /// Directory to analyze, same as the positional argument
    #[arg(long = "dir", conflicts_with = "path")]
    dir: Option<PathBuf>,

    /// Number of tree levels to display
    #[arg(short, long, default_value_t = 1)]
    depth: usize,

    /// Display every level (overrides --depth)
    #[arg(short, long)]
    recursive: bool,

    /// Only count files with these extensions (repeatable or comma separated)
    #[arg(short = 't', long = "type", value_delimiter = ',')]
    types: Vec<String>,

    /// Only count files whose name matches this regular expression
    #[arg(short, long)]
    filter: Option<String>,

    /// Also show directories using no space
    #[arg(short, long)]
    all: bool,

    /// Show directories only
    #[arg(short = 'D', long)]
    directory: bool,

    /// Maximum number of entries to show
    #[arg(short, long)]
    limit: Option<usize>,

    /// Maximum number of directories walked concurrently
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    worker: usize,

    /// Largest unit for sizes: B, K, M, G or T
    #[arg(short, long, default_value = "M")]
    unit: String,

    /// When to color output: auto, always or never
    #[arg(short, long, default_value = "auto")]
    color: String,

    /// Show the last modification time of each entry
    #[arg(short = 'T', long)]
    time: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    fn root(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| self.path.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build and validate the run configuration.
    fn stat_config(&self) -> Result<StatConfig, ScanError> {
        let unit = Unit::parse(&self.unit)?;
        let depth = if self.recursive { None } else { Some(self.depth) };

        let config = StatConfig::builder()
            .root(self.root())
            .types(self.types.clone())
            .filter(self.filter.clone())
            .workers(self.worker)
            .include_empty_dirs(self.all)
            .directories_only(self.directory)
            .limit(self.limit)
            .depth(depth)
            .unit(unit)
            .build()?;
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let config = cli.stat_config()?;
    let color = ColorMode::parse(&cli.color)?;
    let root = config.root.clone();
    let unit = config.unit;

    let tree = run_stat(config)
        .await
        .with_context(|| format!("failed to scan {}", root.display()))?;

    let presenter = Presenter::new(unit)
        .with_theme(Theme::for_mode(color))
        .with_time(cli.time);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match cli.format {
        OutputFormat::Text => presenter.render_text(&tree, &mut out),
        OutputFormat::Json => presenter.render_json(&tree, &mut out),
    };
    written
        .and_then(|()| out.flush())
        .context("failed to write output")?;

    Ok(())
}

/// Run the scan on the blocking pool while logging its progress.
async fn run_stat(config: StatConfig) -> Result<StatTree> {
    let scanner = Scanner::new();
    let mut progress = scanner.subscribe();

    let reporter = tokio::spawn(async move {
        loop {
            match progress.recv().await {
                Ok(p) => debug!(
                    files = p.files_scanned,
                    dirs = p.dirs_scanned,
                    bytes = %format_size(p.bytes_scanned),
                    files_per_sec = p.files_per_second() as u64,
                    "scanning"
                ),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let tree = tokio::task::spawn_blocking(move || scanner.scan(&config))
        .await
        .context("scan task failed")??;
    reporter.await.context("progress task failed")?;

    for warning in &tree.warnings {
        debug!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
    }
    info!(
        total = %format_size(tree.stats.total_size),
        files = tree.stats.total_files,
        dirs = tree.stats.total_dirs,
        warnings = tree.warnings.len(),
        elapsed = ?tree.scan_duration,
        "scan finished"
    );

    Ok(tree)
}

fn setup_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("diskusage={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// Format bytes as human-readable size.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
