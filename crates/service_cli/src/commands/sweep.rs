//! Sweep command implementation
//!
//! Runs one scenario per swept value on common random numbers and writes
//! the summary table to CSV.

use std::path::PathBuf;

use tracing::info;

use rating_core::params::SimulationParameters;
use rating_engine::{linspace, run_parameter_sweep, SweepAxis, SweepResult};

use crate::config::CliConfig;
use crate::output;
use crate::{CliError, Result};

/// Command-line overrides for a sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Explicit values to sweep
    pub values: Option<Vec<f64>>,
    /// Grid start, end and size
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub steps: Option<usize>,
    /// Swept parameter name
    pub axis: Option<String>,
    /// Trials per sweep point
    pub trials: Option<usize>,
    /// Summary CSV path
    pub output: Option<PathBuf>,
}

/// Fully resolved sweep request.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub base: SimulationParameters,
    pub axis: SweepAxis,
    pub values: Vec<f64>,
    pub output: PathBuf,
}

impl SweepPlan {
    /// Resolve the sweep: CLI values, then a CLI grid, then configuration.
    ///
    /// Trials per point default to half the base trials (at least one).
    pub fn resolve(config: &CliConfig, options: &SweepOptions) -> Result<Self> {
        let axis = match &options.axis {
            Some(name) => name.parse()?,
            None => config.sweep.axis,
        };

        let grid_requested =
            options.from.is_some() || options.to.is_some() || options.steps.is_some();
        let values = match &options.values {
            Some(values) => {
                if grid_requested {
                    return Err(CliError::InvalidArgument(
                        "--values cannot be combined with --from/--to/--steps".to_string(),
                    ));
                }
                values.clone()
            }
            None if grid_requested => linspace(
                options.from.unwrap_or(config.sweep.start),
                options.to.unwrap_or(config.sweep.end),
                options.steps.unwrap_or(config.sweep.steps),
            ),
            None => config.sweep.resolved_values(),
        };

        let configured = config.parameters()?;
        let trials = options
            .trials
            .or(config.sweep.trials)
            .unwrap_or_else(|| (configured.n_trials() / 2).max(1));
        let base = configured.to_builder().n_trials(trials).build()?;

        let output = options
            .output
            .clone()
            .unwrap_or_else(|| config.sweep.output.clone());

        Ok(Self {
            base,
            axis,
            values,
            output,
        })
    }
}

/// Run the sweep and write the summary CSV.
pub fn execute(config: &CliConfig, options: &SweepOptions) -> Result<SweepResult> {
    let plan = SweepPlan::resolve(config, options)?;
    info!(
        axis = plan.axis.name(),
        points = plan.values.len(),
        trials = plan.base.n_trials(),
        seed = plan.base.seed(),
        "Running sweep"
    );

    let sweep = run_parameter_sweep(&plan.base, plan.axis, &plan.values)?;
    let rows = sweep.rows();
    output::write_summary(output::create_output(&plan.output)?, &rows)?;
    info!("Summary written to {}", plan.output.display());

    Ok(sweep)
}

/// Run the sweep command
pub fn run(config: &CliConfig, options: &SweepOptions) -> Result<()> {
    let sweep = execute(config, options)?;
    print!("{}", output::format_summary_table(&sweep.rows()));
    info!("Sweep complete");
    Ok(())
}
