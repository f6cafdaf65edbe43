//! CLI configuration management.
//!
//! Loads run configuration from a TOML file with environment variable
//! override support. Every model field is optional; fields left out keep
//! the default calibration of [`SimulationParameters`].
//!
//! ```toml
//! log_level = "info"
//!
//! [simulation]
//! n_trials = 3000
//! seed = 42
//! leak_probability = 0.15
//! severity = 0.20
//! debt_policy = { kind = "cash_sweep", maintenance_capex = 40.0, paydown_ratio = 0.5 }
//!
//! [sweep]
//! axis = "severity"
//! start = 0.05
//! end = 0.35
//! steps = 7
//! output = "risk_simulation_summary.csv"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use rating_core::params::{
    BreachRule, DebtPolicy, ImpactProfile, LeakageTiming, SimulationParameters,
    SimulationParametersBuilder,
};
use rating_core::SimulationError;
use rating_engine::{linspace, SweepAxis};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "downgrade.toml";

/// Default summary CSV written by the sweep command.
pub const DEFAULT_SUMMARY_FILE: &str = "risk_simulation_summary.csv";

/// Configuration error type
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Model parameters as written in the `[simulation]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    pub horizon_years: Option<usize>,
    pub n_trials: Option<usize>,
    pub seed: Option<u64>,
    pub initial_revenue: Option<f64>,
    pub base_growth: Option<f64>,
    pub growth_volatility: Option<f64>,
    pub initial_margin: Option<f64>,
    pub margin_volatility: Option<f64>,
    pub initial_debt: Option<f64>,
    pub interest_rate: Option<f64>,
    pub fixed_cost_intensity: Option<f64>,
    pub leak_probability: Option<f64>,
    pub severity: Option<f64>,
    pub detection_lag: Option<usize>,
    pub mitigation: Option<f64>,
    pub growth_impact_share: Option<f64>,
    pub margin_impact_share: Option<f64>,
    pub leakage_timing: Option<LeakageTiming>,
    pub impact_profile: Option<ImpactProfile>,
    pub debt_policy: Option<DebtPolicy>,
    pub coverage_floor: Option<f64>,
    pub leverage_ceiling: Option<f64>,
    pub consecutive_breaches: Option<usize>,
    pub breach_rule: Option<BreachRule>,
    pub downgrade_window: Option<usize>,
    pub sample_size: Option<usize>,
    pub growth_floor: Option<f64>,
    pub margin_floor: Option<f64>,
    pub revenue_floor: Option<f64>,
}

macro_rules! apply_fields {
    ($section:expr, $builder:expr, $($field:ident),* $(,)?) => {{
        let mut builder = $builder;
        $(
            if let Some(value) = $section.$field {
                builder = builder.$field(value);
            }
        )*
        builder
    }};
}

impl SimulationSection {
    /// Applies every present field onto `builder`.
    pub fn apply(&self, builder: SimulationParametersBuilder) -> SimulationParametersBuilder {
        apply_fields!(
            self,
            builder,
            horizon_years,
            n_trials,
            seed,
            initial_revenue,
            base_growth,
            growth_volatility,
            initial_margin,
            margin_volatility,
            initial_debt,
            interest_rate,
            fixed_cost_intensity,
            leak_probability,
            severity,
            detection_lag,
            mitigation,
            growth_impact_share,
            margin_impact_share,
            leakage_timing,
            impact_profile,
            debt_policy,
            coverage_floor,
            leverage_ceiling,
            consecutive_breaches,
            breach_rule,
            downgrade_window,
            sample_size,
            growth_floor,
            margin_floor,
            revenue_floor,
        )
    }
}

/// Sweep settings as written in the `[sweep]` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SweepSection {
    /// Swept parameter
    #[serde(default)]
    pub axis: SweepAxis,
    /// Explicit values; take precedence over the grid below
    pub values: Option<Vec<f64>>,
    /// Grid start
    #[serde(default = "default_sweep_start")]
    pub start: f64,
    /// Grid end (inclusive)
    #[serde(default = "default_sweep_end")]
    pub end: f64,
    /// Grid size
    #[serde(default = "default_sweep_steps")]
    pub steps: usize,
    /// Trials per sweep point; half the base trials when absent
    pub trials: Option<usize>,
    /// Summary CSV path
    #[serde(default = "default_summary_file")]
    pub output: PathBuf,
}

fn default_sweep_start() -> f64 {
    0.05
}

fn default_sweep_end() -> f64 {
    0.35
}

fn default_sweep_steps() -> usize {
    7
}

fn default_summary_file() -> PathBuf {
    PathBuf::from(DEFAULT_SUMMARY_FILE)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            axis: SweepAxis::default(),
            values: None,
            start: default_sweep_start(),
            end: default_sweep_end(),
            steps: default_sweep_steps(),
            trials: None,
            output: default_summary_file(),
        }
    }
}

impl SweepSection {
    /// Values to sweep: explicit list if given, otherwise the grid.
    pub fn resolved_values(&self) -> Vec<f64> {
        match &self.values {
            Some(values) => values.clone(),
            None => linspace(self.start, self.end, self.steps),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Model parameters
    #[serde(default)]
    pub simulation: SimulationSection,

    /// Sweep settings
    #[serde(default)]
    pub sweep: SweepSection,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            simulation: SimulationSection::default(),
            sweep: SweepSection::default(),
        }
    }
}

impl CliConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&content)
    }

    /// Load configuration, falling back to defaults when the default file
    /// is absent. An explicitly named file must exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        Self::load_optional(path, path != Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load `path`; a missing file yields defaults unless `required`.
    fn load_optional(path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply environment variable overrides
    pub fn with_env_override(mut self) -> Self {
        if let Ok(seed) = std::env::var("DOWNGRADE_SEED") {
            if let Ok(seed) = seed.parse() {
                self.simulation.seed = Some(seed);
            }
        }

        if let Ok(trials) = std::env::var("DOWNGRADE_TRIALS") {
            if let Ok(trials) = trials.parse() {
                self.simulation.n_trials = Some(trials);
            }
        }

        if let Ok(log_level) = std::env::var("DOWNGRADE_LOG_LEVEL") {
            self.log_level = log_level;
        }

        self
    }

    /// Validate the configuration
    ///
    /// Model invariants are checked when the parameters are built; this
    /// covers the settings that only exist at the CLI level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        match &self.sweep.values {
            Some(values) if values.is_empty() => {
                errors.push("sweep.values must not be empty".to_string());
            }
            Some(_) => {}
            None => {
                if self.sweep.steps == 0 {
                    errors.push("sweep.steps must be greater than 0".to_string());
                }
                if !self.sweep.start.is_finite() || !self.sweep.end.is_finite() {
                    errors.push("sweep.start and sweep.end must be finite".to_string());
                }
            }
        }

        if self.sweep.trials == Some(0) {
            errors.push("sweep.trials must be greater than 0".to_string());
        }

        if self.sweep.output.as_os_str().is_empty() {
            errors.push("sweep.output cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the validated base parameters
    pub fn parameters(&self) -> Result<SimulationParameters, SimulationError> {
        self.simulation.apply(SimulationParameters::builder()).build()
    }
}
