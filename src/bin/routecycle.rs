use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use routecycle::config::GlobalConfig;
use routecycle::source::InputSource;
use routecycle::{AnalysisOptions, RouteError, RoutingCycleDetector};

#[derive(Parser)]
#[command(
    name = "routecycle",
    version,
    about = "Find the longest routing cycle in a claim routing file.",
    after_help = "Example: routecycle large_input_v1.txt"
)]
struct Cli {
    /// Path to input file or URL containing routing data
    input_source: String,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of spill partitions
    #[arg(long)]
    partitions: Option<usize>,

    /// Maximum path length explored by the cycle search
    #[arg(long)]
    max_path_length: Option<usize>,

    /// Worker threads for cycle search (1 = sequential, 0 = all CPUs)
    #[arg(long, short)]
    jobs: Option<usize>,

    /// Directory for temporary partition files
    #[arg(long)]
    spill_dir: Option<PathBuf>,

    /// Print aggregate statistics
    #[arg(long)]
    summary: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

const EXIT_FOUND: u8 = 0;
const EXIT_NO_CYCLE: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            report(&e, &cli.input_source);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let mut config = GlobalConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(partitions) = cli.partitions {
        config.analysis.partitions = partitions;
    }
    if let Some(max_path_length) = cli.max_path_length {
        config.analysis.max_path_length = max_path_length;
    }
    if let Some(jobs) = cli.jobs {
        config.analysis.jobs = jobs;
    }
    if let Some(dir) = &cli.spill_dir {
        config.storage.spill_dir = Some(dir.clone());
    }
    config.validate()?;

    let source = InputSource::parse(&cli.input_source);
    let local = source.resolve(config.network.download_timeout)?;

    let detector = RoutingCycleDetector::new(AnalysisOptions::from(&config));
    let result = detector.run_path(local.path())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
        Format::Text if cli.summary => result.write_summary(&mut out)?,
        Format::Text => {
            if let Some(cycle) = &result.cycle {
                writeln!(out, "{}", cycle)?;
            }
        }
    }

    if result.cycle.is_some() {
        Ok(EXIT_FOUND)
    } else {
        warn!("No cycles found");
        Ok(EXIT_NO_CYCLE)
    }
}

fn report(err: &anyhow::Error, input: &str) {
    match err.downcast_ref::<RouteError>() {
        Some(RouteError::NotFound(_)) => error!("File not found: {}", input),
        Some(RouteError::NotAFile(_)) => error!("Not a file: {}", input),
        Some(RouteError::PermissionDenied(_)) => error!("Permission denied: {}", input),
        Some(RouteError::EncodingError(_)) => error!("Content is not valid UTF-8: {}", input),
        _ => error!("Failed to process: {:#}", err),
    }
}
