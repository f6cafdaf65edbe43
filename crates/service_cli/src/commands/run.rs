//! Run command implementation
//!
//! Runs a single scenario and reports the headline downgrade probability.

use std::path::PathBuf;

use tracing::info;

use rating_core::params::SimulationParameters;
use rating_engine::{run_scenario, ScenarioResult};

use crate::config::CliConfig;
use crate::output;
use crate::Result;

/// Command-line overrides for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub trials: Option<usize>,
    pub seed: Option<u64>,
    pub severity: Option<f64>,
    pub paths_csv: Option<PathBuf>,
    pub histogram_csv: Option<PathBuf>,
}

/// Resolve run parameters: configuration first, then CLI overrides.
pub fn resolve_parameters(config: &CliConfig, options: &RunOptions) -> Result<SimulationParameters> {
    let mut builder = config.simulation.apply(SimulationParameters::builder());
    if let Some(trials) = options.trials {
        builder = builder.n_trials(trials);
    }
    if let Some(seed) = options.seed {
        builder = builder.seed(seed);
    }
    if let Some(severity) = options.severity {
        builder = builder.severity(severity);
    }
    Ok(builder.build()?)
}

/// Run the scenario and write any requested CSV output.
pub fn execute(config: &CliConfig, options: &RunOptions) -> Result<ScenarioResult> {
    let params = resolve_parameters(config, options)?;
    info!(
        trials = params.n_trials(),
        seed = params.seed(),
        severity = params.severity(),
        leak_probability = params.leak_probability(),
        "Running scenario"
    );

    let result = run_scenario(&params);

    if let Some(path) = &options.paths_csv {
        output::write_sample_paths(output::create_output(path)?, result.sample_paths())?;
        info!("Sample paths written to {}", path.display());
    }
    if let Some(path) = &options.histogram_csv {
        output::write_histogram(output::create_output(path)?, &result)?;
        info!("Downgrade-year histogram written to {}", path.display());
    }

    Ok(result)
}

/// Run the run command
pub fn run(config: &CliConfig, options: &RunOptions) -> Result<()> {
    let result = execute(config, options)?;
    let params = result.parameters();

    println!(
        "Estimated probability of downgrade within {} years (severity {:.2}): {:.2}%",
        params.downgrade_window(),
        result.severity(),
        100.0 * result.downgrade_probability_within_window()
    );
    println!(
        "Probability of downgrade within horizon ({} years): {:.2}% (±{:.2}%)",
        result.horizon(),
        100.0 * result.downgrade_probability(),
        100.0 * result.confidence_95()
    );
    println!(
        "Leakage occurred on {:.2}% of {} paths",
        100.0 * result.leak_share(),
        result.n_trials()
    );
    if let Some(year) = result.mean_downgrade_year() {
        println!("Mean downgrade year: {:.2}", year);
    }

    info!("Run complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;

    fn small_config() -> CliConfig {
        CliConfig::from_toml("[simulation]\nn_trials = 300\nsample_size = 2\n").unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let options = RunOptions {
            trials: Some(120),
            seed: Some(9),
            severity: Some(0.35),
            ..RunOptions::default()
        };
        let params = resolve_parameters(&small_config(), &options).unwrap();
        assert_eq!(params.n_trials(), 120);
        assert_eq!(params.seed(), 9);
        assert_eq!(params.severity(), 0.35);
        assert_eq!(params.sample_size(), 2);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let options = RunOptions {
            severity: Some(-0.1),
            ..RunOptions::default()
        };
        let err = execute(&small_config(), &options).unwrap_err();
        assert!(matches!(err, CliError::Simulation(_)));
    }

    #[test]
    fn test_execute_writes_requested_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions {
            paths_csv: Some(dir.path().join("paths.csv")),
            histogram_csv: Some(dir.path().join("histogram.csv")),
            ..RunOptions::default()
        };

        let result = execute(&small_config(), &options).unwrap();
        assert_eq!(result.n_trials(), 300);

        let paths = std::fs::read_to_string(dir.path().join("paths.csv")).unwrap();
        assert_eq!(paths.lines().count(), 1 + 2 * result.horizon());
        let histogram = std::fs::read_to_string(dir.path().join("histogram.csv")).unwrap();
        assert_eq!(histogram.lines().count(), 1 + result.horizon());
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = small_config();
        let a = execute(&config, &RunOptions::default()).unwrap();
        let b = execute(&config, &RunOptions::default()).unwrap();
        assert_eq!(a, b);
    }
}
