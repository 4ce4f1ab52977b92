//! tracker-pool CLI
//!
//! Builds a connection pool against a storage tracker and exercises it, or
//! manages the pool's configuration file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tp_cli::commands::{self, ProbeOptions};
use tp_cli::output::print_error;

#[derive(Parser)]
#[command(name = "tracker-pool")]
#[command(author, version, about = "Health-checked connection pool for a storage tracker")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a pool and run liveness probes against the tracker through it
    Probe {
        /// Number of probes to run
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Maximum probes in flight at once
        #[arg(short = 'j', long, default_value_t = 4)]
        concurrency: usize,
        /// Tracker address as host:port (overrides config)
        #[arg(short, long, env = "TRACKER_SERVER")]
        tracker: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Show config file path
    Path,
    /// Check the configuration file for errors
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Probe {
            count,
            concurrency,
            tracker,
            json,
        } => {
            let mut config = commands::load_effective_config(cli.config.as_ref())?;
            if let Some(tracker) = tracker {
                config.client.tracker_server = tracker;
            }

            let summary = commands::probe_command(
                &config,
                ProbeOptions {
                    count,
                    concurrency,
                    json,
                },
            )
            .await?;

            if summary.failed() > 0 {
                if !json {
                    print_error(&format!(
                        "{} of {} probes failed",
                        summary.failed(),
                        summary.probes.len()
                    ));
                }
                std::process::exit(1);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(cli.config.as_ref())?,
            ConfigAction::Init { force } => commands::config_init(cli.config.as_ref(), force)?,
            ConfigAction::Path => commands::config_path(cli.config.as_ref()),
            ConfigAction::Validate => commands::config_validate(cli.config.as_ref())?,
        },
    }

    Ok(())
}
