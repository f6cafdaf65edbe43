//! Sweep driver.
//!
//! Runs one scenario per value of a swept parameter, holding everything
//! else fixed. Every scenario reuses the base seed, so trial `i` sees the
//! same shocks in every scenario (common random numbers) and differences
//! between rows come from the swept parameter alone.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use rating_core::error::{Result, SimulationError};
use rating_core::params::SimulationParameters;
use rating_core::types::Path;

use crate::report::SummaryRow;
use crate::scenario::{run_scenario, ScenarioResult};

/// Parameter varied across a sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SweepAxis {
    /// Leakage severity.
    #[default]
    Severity,
    /// Leakage probability `P_LEAK`.
    LeakProbability,
    /// Mitigation strength.
    Mitigation,
    /// Detection lag in whole years.
    DetectionLag,
}

impl SweepAxis {
    /// Column label used in summary rows.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Severity => "severity",
            Self::LeakProbability => "leak_probability",
            Self::Mitigation => "mitigation",
            Self::DetectionLag => "detection_lag",
        }
    }

    /// Returns `base` with this parameter set to `value`, re-validated.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the value violates
    /// the parameter's invariant, including a non-integer detection lag.
    pub fn apply(&self, base: &SimulationParameters, value: f64) -> Result<SimulationParameters> {
        let builder = base.to_builder();
        match self {
            Self::Severity => builder.severity(value).build(),
            Self::LeakProbability => builder.leak_probability(value).build(),
            Self::Mitigation => builder.mitigation(value).build(),
            Self::DetectionLag => {
                if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
                    return Err(SimulationError::invalid(
                        "detection_lag",
                        format!("must be a non-negative whole number of years, got {}", value),
                    ));
                }
                builder.detection_lag(value as usize).build()
            }
        }
    }
}

impl fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepAxis {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "severity" => Ok(Self::Severity),
            "leak_probability" | "p_leak" => Ok(Self::LeakProbability),
            "mitigation" => Ok(Self::Mitigation),
            "detection_lag" | "lag" => Ok(Self::DetectionLag),
            other => Err(SimulationError::InvalidSweep(format!(
                "unknown sweep axis '{}'. Supported: severity, leak_probability, mitigation, detection_lag",
                other
            ))),
        }
    }
}

/// One point of a sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepEntry {
    /// Swept parameter value.
    pub value: f64,
    /// Scenario result at that value.
    pub result: ScenarioResult,
}

/// Ordered sweep output; entry order equals input order.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepResult {
    axis: SweepAxis,
    entries: Vec<SweepEntry>,
}

impl SweepResult {
    /// Swept parameter.
    #[inline]
    pub fn axis(&self) -> SweepAxis {
        self.axis
    }

    /// Entries in sweep order.
    #[inline]
    pub fn entries(&self) -> &[SweepEntry] {
        &self.entries
    }

    /// Iterates `(value, result)` pairs in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &ScenarioResult)> {
        self.entries.iter().map(|e| (e.value, &e.result))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the sweep holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Swept values in order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    /// First scenario whose swept value equals `value` (within 1e-12).
    pub fn get(&self, value: f64) -> Option<&ScenarioResult> {
        self.entries
            .iter()
            .find(|e| (e.value - value).abs() <= 1e-12)
            .map(|e| &e.result)
    }

    /// Flat table, one row per entry.
    pub fn rows(&self) -> Vec<SummaryRow> {
        self.entries
            .iter()
            .map(|e| e.result.summary_row_for(self.axis.name(), e.value))
            .collect()
    }

    /// Retained raw paths of the scenario at `value`.
    pub fn sample_paths(&self, value: f64) -> Option<&[Path]> {
        self.get(value).map(ScenarioResult::sample_paths)
    }

    /// Triggering years of downgraded paths of the scenario at `value`.
    pub fn downgrade_years(&self, value: f64) -> Option<&[usize]> {
        self.get(value).map(ScenarioResult::downgrade_years)
    }
}

/// Runs one scenario per value of `axis`.
///
/// All values are validated before the first scenario runs.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidSweep`] for an empty value list and
/// [`SimulationError::InvalidParameter`] for any invalid value.
pub fn run_parameter_sweep(
    base: &SimulationParameters,
    axis: SweepAxis,
    values: &[f64],
) -> Result<SweepResult> {
    if values.is_empty() {
        return Err(SimulationError::InvalidSweep(format!(
            "no {} values supplied",
            axis.name()
        )));
    }

    let scenarios = values
        .iter()
        .map(|&value| axis.apply(base, value).map(|params| (value, params)))
        .collect::<Result<Vec<_>>>()?;

    info!(axis = axis.name(), points = scenarios.len(), "Starting sweep");
    let entries = scenarios
        .into_iter()
        .enumerate()
        .map(|(step, (value, params))| {
            info!(step = step + 1, axis = axis.name(), value, "Sweep step");
            SweepEntry {
                value,
                result: run_scenario(&params),
            }
        })
        .collect();

    Ok(SweepResult { axis, entries })
}

/// Runs one scenario per severity value.
///
/// # Examples
///
/// ```rust
/// use rating_core::params::SimulationParameters;
/// use rating_engine::sweep::run_sweep;
///
/// let params = SimulationParameters::builder().n_trials(200).build().unwrap();
/// let sweep = run_sweep(&params, &[0.0, 0.2, 0.5]).unwrap();
///
/// assert_eq!(sweep.values(), vec![0.0, 0.2, 0.5]);
/// assert_eq!(sweep.rows().len(), 3);
/// ```
///
/// # Errors
///
/// See [`run_parameter_sweep`].
pub fn run_sweep(base: &SimulationParameters, severities: &[f64]) -> Result<SweepResult> {
    run_parameter_sweep(base, SweepAxis::Severity, severities)
}

/// `steps` evenly spaced values from `start` to `end` inclusive.
///
/// # Examples
///
/// ```rust
/// use rating_engine::sweep::linspace;
///
/// let grid = linspace(0.05, 0.35, 7);
/// assert_eq!(grid.len(), 7);
/// assert_eq!(grid[0], 0.05);
/// assert_eq!(grid[6], 0.35);
/// ```
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps)
                .map(|i| if i == steps - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
