//! livepulse CLI - print, serve and watch deterministic live metrics.

#![allow(
    clippy::needless_pass_by_value,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]

mod logging;
mod server;

use clap::{Parser, Subcommand, ValueEnum};
use livepulse_core::{
    format_item, summary, synthesize, Bucket, BucketTimer, Clock, PulseError, SeededRng,
    SystemClock, TickerConfig,
};
use livepulse_terminal::{TickerApp, TuiConfig, TuiError};
use logging::Verbosity;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] PulseError),

    #[error(transparent)]
    Tui(#[from] TuiError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Server(String),
}

#[derive(Parser)]
#[command(name = "livepulse")]
#[command(about = "Deterministic live-metrics ticker")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable ANSI colors in logs and the terminal ticker
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (default: ./livepulse.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metrics for one bucket
    Snapshot {
        /// Instant in ms since the epoch (default: now)
        #[arg(long, allow_hyphen_values = true)]
        at: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Keep printing a snapshot at every bucket boundary
        #[arg(long)]
        follow: bool,

        /// Stop following after this many additional snapshots
        #[arg(long, requires = "follow")]
        limit: Option<usize>,
    },

    /// Print the first floats of a seeded stream
    Seed {
        /// Seed string, e.g. "pivotr|bucket|0"
        key: String,

        /// Number of floats
        #[arg(short = 'n', long, default_value = "4")]
        count: usize,
    },

    /// Serve snapshots over HTTP
    Serve {
        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Interface to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Run the animated ticker in the terminal
    Watch {
        /// Show a static grid instead of animating
        #[arg(long)]
        reduced_motion: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet), cli.no_color);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = TickerConfig::load(cli.config.as_deref())?;
    tracing::debug!(?config, "effective config");

    match cli.command {
        Commands::Snapshot {
            at,
            format,
            follow,
            limit,
        } => snapshot(&config, at, format, follow, limit),
        Commands::Seed { key, count } => {
            print!("{}", seed_lines(&key, count));
            Ok(())
        }
        Commands::Serve { port, host } => server::serve(&host, port, &config),
        Commands::Watch { reduced_motion } => watch(config, reduced_motion, cli.no_color),
        Commands::Config => {
            print!("{}", config.to_toml());
            Ok(())
        }
    }
}

fn snapshot(
    config: &TickerConfig,
    at: Option<i64>,
    format: OutputFormat,
    follow: bool,
    limit: Option<usize>,
) -> Result<(), CliError> {
    let at_ms = at.unwrap_or_else(|| SystemClock.now_ms());
    let bucket = Bucket::containing(at_ms, config.bucket_ms)?;
    println!("{}", render_snapshot(config, &bucket, format)?);

    if !follow {
        return Ok(());
    }
    let handle = BucketTimer::new(config.bucket_ms)?.start(SystemClock);
    for (printed, bucket) in handle.receiver().iter().enumerate() {
        println!("{}", render_snapshot(config, &bucket, format)?);
        if limit.is_some_and(|limit| printed + 1 >= limit) {
            break;
        }
    }
    handle.cancel();
    Ok(())
}

/// One snapshot as text or a single JSON line.
fn render_snapshot(
    config: &TickerConfig,
    bucket: &Bucket,
    format: OutputFormat,
) -> Result<String, CliError> {
    let snapshot = synthesize(&config.seed_namespace, bucket);
    match format {
        OutputFormat::Json => {
            let response = server::MetricsResponse {
                summary: summary(&snapshot.items),
                snapshot,
            };
            Ok(serde_json::to_string(&response)?)
        }
        OutputFormat::Text => {
            let mut out = format!(
                "Live Service Snapshot (IST) {} bucket {}\n",
                bucket.day_key, bucket.start_ms
            );
            for item in &snapshot.items {
                out.push_str(&format!(
                    "  {:<28} {:>10}\n",
                    item.label,
                    format_item(item, item.value)
                ));
            }
            out.push_str(&summary(&snapshot.items));
            Ok(out)
        }
    }
}

fn seed_lines(key: &str, count: usize) -> String {
    SeededRng::from_seed_str(key)
        .take(count)
        .map(|r| format!("{r}\n"))
        .collect()
}

fn watch(mut config: TickerConfig, reduced_motion: bool, no_color: bool) -> Result<(), CliError> {
    config.reduced_motion |= reduced_motion;
    let tui = TuiConfig {
        color: !no_color,
        ..TuiConfig::new(config)
    };
    TickerApp::new(tui)?.run()?;
    Ok(())
}
