//! Execution Log Viewer - Entry Point

use clap::Parser;
use exlv::config::{self, ResolvedConfig};
use exlv::integration::process_lines;
use exlv::model::{AppError, LogEntry};
use exlv::source::LogFileSource;
use exlv::store::ChunkFilter;
use exlv::view::{self, ColorConfig, DisplayOptions, RunOptions};
use exlv::viewer::{Viewer, ViewerOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

/// Execution Log Viewer - virtualized TUI for execution log chunks
#[derive(Parser, Debug)]
#[command(name = "exlv")]
#[command(version)]
#[command(about = "Virtualized terminal viewer for JSONL execution logs")]
pub struct Args {
    /// Path to JSONL execution log
    pub file: PathBuf,

    /// Follow the file and pin the view to the newest line
    #[arg(short, long)]
    pub follow: bool,

    /// Only show lines from this node
    #[arg(long)]
    pub node: Option<String>,

    /// Only show lines from this step context
    #[arg(long)]
    pub step: Option<String>,

    /// Maximum retained lines (oldest are evicted)
    #[arg(long, value_name = "N")]
    pub max_line: Option<usize>,

    /// Jump to this line number on startup
    #[arg(short, long, value_name = "N")]
    pub line: Option<u64>,

    /// Select this line number on startup
    #[arg(long, value_name = "N")]
    pub select: Option<u64>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("exlv: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let config = resolve_config(&args)?;

    exlv::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let mut source = LogFileSource::open(&args.file)?;
    let first_source_line = source.next_source_line();
    let (entries, malformed) = process_lines(source.read_new_lines()?, first_source_line);
    if !malformed.is_empty() {
        warn!(count = malformed.len(), "Skipped unparseable lines in initial load");
    }

    let viewer = Viewer::new(viewer_options(&args, &config, entries));
    let options = RunOptions {
        colors: ColorConfig::from_env_and_args(args.no_color),
        display: DisplayOptions::from_config(&config),
        ..RunOptions::default()
    };
    view::run(viewer, Some(source), options)
}

/// Defaults → config file → env vars → CLI args.
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    let with_env = config::apply_env_overrides(merged);

    // --follow can only turn follow on; absence keeps the configured value.
    let follow_override = args.follow.then_some(true);
    Ok(config::apply_cli_overrides(
        with_env,
        follow_override,
        args.max_line,
    ))
}

fn viewer_options(args: &Args, config: &ResolvedConfig, entries: Vec<LogEntry>) -> ViewerOptions {
    let mut filter = ChunkFilter::new();
    if let Some(node) = &args.node {
        filter = filter.with_node(node.clone());
    }
    if let Some(step) = &args.step {
        filter = filter.with_step_ctx(step.clone());
    }

    let mut options = ViewerOptions::from_config(config)
        .with_entries(entries)
        .with_filter(filter);
    if let Some(line) = args.line {
        options = options.with_jump_to_line(line);
    }
    if let Some(line) = args.select {
        options = options.with_selected_line(line);
    }
    options
}
