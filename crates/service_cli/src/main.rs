//! downgrade-risk - Command Line Operations for the Leakage Downgrade Model
//!
//! Operational entry point for estimating the probability that a firm's
//! credit rating is downgraded after a technology-leakage shock.
//!
//! # Commands
//!
//! - `downgrade-risk run` - Estimate the downgrade probability of one scenario
//! - `downgrade-risk sweep` - Sweep severity (or another leakage parameter)
//! - `downgrade-risk check` - Validate the configuration
//!
//! # Configuration
//!
//! Parameters are read from `downgrade.toml` when present (see
//! [`config`]); `DOWNGRADE_SEED`, `DOWNGRADE_TRIALS` and
//! `DOWNGRADE_LOG_LEVEL` override the file, and command-line flags
//! override both.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::run::RunOptions;
use commands::sweep::SweepOptions;
use config::CliConfig;

/// Leakage downgrade risk CLI
#[derive(Parser)]
#[command(name = "downgrade-risk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the downgrade probability of a single scenario
    Run {
        /// Number of Monte Carlo trials
        #[arg(short = 'n', long)]
        trials: Option<usize>,

        /// Base random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Leakage severity
        #[arg(long)]
        severity: Option<f64>,

        /// Write retained sample paths to this CSV file
        #[arg(long)]
        paths_csv: Option<PathBuf>,

        /// Write the downgrade-year histogram to this CSV file
        #[arg(long)]
        histogram_csv: Option<PathBuf>,
    },

    /// Sweep a leakage parameter and write a summary CSV
    Sweep {
        /// Comma-separated values to sweep
        #[arg(long, alias = "severities", value_delimiter = ',', num_args = 1..)]
        values: Option<Vec<f64>>,

        /// Grid start
        #[arg(long)]
        from: Option<f64>,

        /// Grid end (inclusive)
        #[arg(long)]
        to: Option<f64>,

        /// Grid size
        #[arg(long)]
        steps: Option<usize>,

        /// Swept parameter (severity, leak-probability, mitigation, detection-lag)
        #[arg(short, long)]
        axis: Option<String>,

        /// Trials per sweep point
        #[arg(short = 'n', long)]
        trials: Option<usize>,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check configuration without running trials
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = CliConfig::load_or_default(&cli.config).map(CliConfig::with_env_override);

    // Initialise tracing; RUST_LOG wins over --verbose and the configured level
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.log_level.to_lowercase(),
        (Err(_), false) => "info".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let config = loaded?;
    config.validate()?;

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!(config = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Run {
            trials,
            seed,
            severity,
            paths_csv,
            histogram_csv,
        } => commands::run::run(
            &config,
            &RunOptions {
                trials,
                seed,
                severity,
                paths_csv,
                histogram_csv,
            },
        ),
        Commands::Sweep {
            values,
            from,
            to,
            steps,
            axis,
            trials,
            output,
        } => commands::sweep::run(
            &config,
            &SweepOptions {
                values,
                from,
                to,
                steps,
                axis,
                trials,
                output,
            },
        ),
        Commands::Check => commands::check::run(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sweep_values() {
        let cli = Cli::try_parse_from([
            "downgrade-risk",
            "sweep",
            "--severities",
            "0.05,0.1,0.2",
            "--trials",
            "500",
        ])
        .unwrap();

        match cli.command {
            Commands::Sweep { values, trials, .. } => {
                assert_eq!(values, Some(vec![0.05, 0.1, 0.2]));
                assert_eq!(trials, Some(500));
            }
            _ => panic!("Expected sweep command"),
        }
        assert_eq!(cli.config, PathBuf::from("downgrade.toml"));
    }

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::try_parse_from([
            "downgrade-risk",
            "run",
            "--seed",
            "7",
            "--verbose",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert!(matches!(cli.command, Commands::Run { seed: Some(7), .. }));
    }
}
