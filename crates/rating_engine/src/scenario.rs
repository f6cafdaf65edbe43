//! Scenario runner.
//!
//! Runs `N` independent trials of one parameter set and aggregates them
//! into a [`ScenarioResult`].
//!
//! # Independence and reproducibility
//!
//! Trial `i` draws from `TrialRng::for_trial(seed, i)` and nothing else, so
//! trials share no mutable state. Outcomes are collected in trial order,
//! which makes the aggregates bit-identical between serial and parallel
//! execution and between repeated runs with the same seed.
//!
//! The retained sample paths are chosen before any trial runs, from a
//! separate stream, so the choice is independent of downgrade outcomes.

use rand::seq::index;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use rating_core::params::SimulationParameters;
use rating_core::rng::{TrialRng, SAMPLE_STREAM};
use rating_core::types::{DowngradeStatus, Path};

use crate::detector::DowngradeDetector;
use crate::generator::PathGenerator;
use crate::report::SummaryRow;

/// Aggregated result of one scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioResult {
    params: SimulationParameters,
    downgrade_years: Vec<usize>,
    leaked: usize,
    degenerate_years: usize,
    sample_paths: Vec<Path>,
}

impl ScenarioResult {
    /// Parameters the scenario was run with.
    #[inline]
    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    /// Leakage severity of the scenario.
    #[inline]
    pub fn severity(&self) -> f64 {
        self.params.severity()
    }

    /// Number of trials `N`.
    #[inline]
    pub fn n_trials(&self) -> usize {
        self.params.n_trials()
    }

    /// Horizon length in years.
    #[inline]
    pub fn horizon(&self) -> usize {
        self.params.horizon_years()
    }

    /// Number of downgraded paths.
    #[inline]
    pub fn downgraded_count(&self) -> usize {
        self.downgrade_years.len()
    }

    /// Empirical downgrade probability over the whole horizon.
    pub fn downgrade_probability(&self) -> f64 {
        self.downgraded_count() as f64 / self.n_trials() as f64
    }

    /// Probability of a downgrade in year `window` or earlier.
    pub fn downgrade_probability_within(&self, window: usize) -> f64 {
        let count = self.downgrade_years.iter().filter(|&&y| y <= window).count();
        count as f64 / self.n_trials() as f64
    }

    /// Probability of a downgrade within the configured headline window.
    pub fn downgrade_probability_within_window(&self) -> f64 {
        self.downgrade_probability_within(self.params.downgrade_window())
    }

    /// Binomial standard error of [`downgrade_probability`](Self::downgrade_probability).
    pub fn std_error(&self) -> f64 {
        let p = self.downgrade_probability();
        (p * (1.0 - p) / self.n_trials() as f64).sqrt()
    }

    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error()
    }

    /// Mean triggering year among downgraded paths; `None` if there are none.
    pub fn mean_downgrade_year(&self) -> Option<f64> {
        if self.downgrade_years.is_empty() {
            return None;
        }
        let sum: usize = self.downgrade_years.iter().sum();
        Some(sum as f64 / self.downgrade_years.len() as f64)
    }

    /// Triggering years of downgraded paths, in trial order.
    #[inline]
    pub fn downgrade_years(&self) -> &[usize] {
        &self.downgrade_years
    }

    /// Downgrade counts per year; index 0 is year 1.
    pub fn downgrade_year_histogram(&self) -> Vec<usize> {
        let mut counts = vec![0; self.horizon()];
        for &year in &self.downgrade_years {
            counts[year - 1] += 1;
        }
        counts
    }

    /// Number of paths on which leakage occurred.
    #[inline]
    pub fn leaked_count(&self) -> usize {
        self.leaked
    }

    /// Share of paths on which leakage occurred.
    pub fn leak_share(&self) -> f64 {
        self.leaked as f64 / self.n_trials() as f64
    }

    /// Total years resolved by the degenerate-ratio policy.
    #[inline]
    pub fn degenerate_years(&self) -> usize {
        self.degenerate_years
    }

    /// Retained raw paths, in trial order.
    #[inline]
    pub fn sample_paths(&self) -> &[Path] {
        &self.sample_paths
    }

    /// Flat summary labelled as a severity scenario.
    pub fn summary_row(&self) -> SummaryRow {
        self.summary_row_for("severity", self.severity())
    }

    /// Flat summary labelled with an arbitrary swept parameter.
    pub fn summary_row_for(&self, parameter: &'static str, value: f64) -> SummaryRow {
        SummaryRow {
            parameter,
            value,
            severity: self.severity(),
            downgrade_probability: self.downgrade_probability(),
            downgrade_probability_within_window: self.downgrade_probability_within_window(),
            std_error: self.std_error(),
            mean_downgrade_year: self.mean_downgrade_year(),
            leak_share: self.leak_share(),
            degenerate_years: self.degenerate_years,
            n_trials: self.n_trials(),
        }
    }
}

/// Per-trial outcome kept for aggregation.
struct TrialOutcome {
    downgrade: DowngradeStatus,
    leaked: bool,
    degenerate_years: usize,
    path: Option<Path>,
}

/// Runs one trial on its own stream.
///
/// # Examples
///
/// ```rust
/// use rating_core::params::SimulationParameters;
/// use rating_engine::scenario::simulate_trial;
///
/// let params = SimulationParameters::default();
/// let path = simulate_trial(&params, 17);
/// assert_eq!(path.len(), params.horizon_years());
/// assert_eq!(path, simulate_trial(&params, 17));
/// ```
pub fn simulate_trial(params: &SimulationParameters, trial: usize) -> Path {
    let mut rng = TrialRng::for_trial(params.seed(), trial);
    let trajectory = PathGenerator::new(params).generate(&mut rng);
    let downgrade = DowngradeDetector::from_params(params).evaluate(&trajectory.years);
    Path::from_trajectory(trajectory, downgrade, rng.seed())
}

/// Trial indices whose paths are retained, sorted ascending.
fn sample_indices(params: &SimulationParameters) -> Vec<usize> {
    let amount = params.sample_size().min(params.n_trials());
    let mut rng = TrialRng::for_stream(params.seed(), SAMPLE_STREAM);
    let mut indices = index::sample(rng.as_rng_mut(), params.n_trials(), amount).into_vec();
    indices.sort_unstable();
    indices
}

/// Runs scenarios for one parameter set.
///
/// # Examples
///
/// ```rust
/// use rating_core::params::SimulationParameters;
/// use rating_engine::scenario::ScenarioRunner;
///
/// let params = SimulationParameters::builder()
///     .n_trials(500)
///     .build()
///     .unwrap();
///
/// let result = ScenarioRunner::new(&params).run();
/// assert_eq!(result.n_trials(), 500);
/// assert!((0.0..=1.0).contains(&result.downgrade_probability()));
/// assert_eq!(result.sample_paths().len(), params.sample_size());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ScenarioRunner<'a> {
    params: &'a SimulationParameters,
}

impl<'a> ScenarioRunner<'a> {
    /// Creates a runner for validated parameters.
    #[inline]
    pub fn new(params: &'a SimulationParameters) -> Self {
        Self { params }
    }

    /// Runs all trials and aggregates them.
    pub fn run(&self) -> ScenarioResult {
        let params = self.params;
        info!(
            severity = params.severity(),
            leak_probability = params.leak_probability(),
            n_trials = params.n_trials(),
            seed = params.seed(),
            "Running scenario"
        );

        let sample = sample_indices(params);
        let run_trial = |trial: usize| {
            let path = simulate_trial(params, trial);
            TrialOutcome {
                downgrade: path.downgrade(),
                leaked: path.leak_occurred(),
                degenerate_years: path.degenerate_years(),
                path: sample.binary_search(&trial).is_ok().then_some(path),
            }
        };

        #[cfg(feature = "parallel")]
        let outcomes: Vec<TrialOutcome> = (0..params.n_trials())
            .into_par_iter()
            .map(run_trial)
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<TrialOutcome> = (0..params.n_trials()).map(run_trial).collect();

        let mut result = ScenarioResult {
            params: params.clone(),
            downgrade_years: Vec::new(),
            leaked: 0,
            degenerate_years: 0,
            sample_paths: Vec::with_capacity(sample.len()),
        };
        for outcome in outcomes {
            if let Some(year) = outcome.downgrade.year() {
                result.downgrade_years.push(year);
            }
            result.leaked += usize::from(outcome.leaked);
            result.degenerate_years += outcome.degenerate_years;
            if let Some(path) = outcome.path {
                result.sample_paths.push(path);
            }
        }

        if result.degenerate_years > 0 {
            warn!(
                degenerate_years = result.degenerate_years,
                "Degenerate ratios resolved by fixed policy"
            );
        }
        debug!(
            downgrade_probability = result.downgrade_probability(),
            within_window = result.downgrade_probability_within_window(),
            leak_share = result.leak_share(),
            "Scenario complete"
        );
        result
    }
}

/// Runs one scenario for `params`.
#[inline]
pub fn run_scenario(params: &SimulationParameters) -> ScenarioResult {
    ScenarioRunner::new(params).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small(n_trials: usize) -> rating_core::params::SimulationParametersBuilder {
        SimulationParameters::builder().n_trials(n_trials)
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let params = small(2_000).build().unwrap();
        let a = run_scenario(&params);
        let b = run_scenario(&params);
        assert_eq!(a, b);
        assert_eq!(
            a.downgrade_probability().to_bits(),
            b.downgrade_probability().to_bits()
        );
    }

    #[test]
    fn test_different_seed_differs() {
        let a = run_scenario(&small(2_000).seed(1).build().unwrap());
        let b = run_scenario(&small(2_000).seed(2).build().unwrap());
        assert_ne!(a.downgrade_years(), b.downgrade_years());
    }

    #[test]
    fn test_aggregates_are_consistent() {
        let params = small(3_000).leak_probability(0.5).build().unwrap();
        let result = run_scenario(&params);

        assert_eq!(result.downgraded_count(), result.downgrade_years().len());
        assert_eq!(
            result.downgrade_year_histogram().iter().sum::<usize>(),
            result.downgraded_count()
        );
        assert!(result
            .downgrade_years()
            .iter()
            .all(|&y| (params.consecutive_breaches()..=params.horizon_years()).contains(&y)));
        assert!(result.downgrade_probability_within_window() <= result.downgrade_probability());
        assert_relative_eq!(
            result.downgrade_probability_within(params.horizon_years()),
            result.downgrade_probability()
        );
        // 1500 expected leaks, 5 sigma is about 137
        assert!((result.leaked_count() as i64 - 1_500).abs() < 140);
    }

    #[test]
    fn test_mean_year_matches_years() {
        let result = run_scenario(&small(1_000).leak_probability(1.0).build().unwrap());
        let years = result.downgrade_years();
        let expected = years.iter().sum::<usize>() as f64 / years.len() as f64;
        assert_relative_eq!(result.mean_downgrade_year().unwrap(), expected);
    }

    #[test]
    fn test_mean_year_undefined_without_downgrades() {
        let params = small(200)
            .leak_probability(0.0)
            .initial_debt(0.0)
            .build()
            .unwrap();
        let result = run_scenario(&params);
        assert_eq!(result.downgraded_count(), 0);
        assert_eq!(result.mean_downgrade_year(), None);
        assert_eq!(result.downgrade_probability(), 0.0);
        assert_eq!(result.std_error(), 0.0);
    }

    #[test]
    fn test_sample_paths_are_real_trials() {
        let params = small(300).sample_size(4).build().unwrap();
        let result = run_scenario(&params);
        let sample = sample_indices(&params);

        assert_eq!(result.sample_paths().len(), 4);
        for (path, &trial) in result.sample_paths().iter().zip(&sample) {
            assert_eq!(path, &simulate_trial(&params, trial));
            assert_eq!(path.len(), params.horizon_years());
        }
    }

    #[test]
    fn test_sample_capped_by_trials() {
        let params = small(3).sample_size(10).build().unwrap();
        let result = run_scenario(&params);
        assert_eq!(result.sample_paths().len(), 3);
    }

    #[test]
    fn test_sample_choice_ignores_severity() {
        let base = small(500).build().unwrap();
        let severe = base.with_severity(0.9).unwrap();
        assert_eq!(sample_indices(&base), sample_indices(&severe));
    }

    #[test]
    fn test_zero_leak_probability_ignores_severity() {
        let base = small(2_000).leak_probability(0.0).build().unwrap();
        let mild = run_scenario(&base.with_severity(0.0).unwrap());
        let harsh = run_scenario(&base.with_severity(0.8).unwrap());

        assert_eq!(mild.downgrade_years(), harsh.downgrade_years());
        assert_eq!(harsh.leaked_count(), 0);
        for path in harsh.sample_paths() {
            assert!(path.years().iter().all(|y| y.effective_severity == 0.0));
        }
    }

    #[test]
    fn test_summary_row() {
        let result = run_scenario(&small(400).severity(0.3).build().unwrap());
        let row = result.summary_row();
        assert_eq!(row.parameter, "severity");
        assert_eq!(row.value, 0.3);
        assert_eq!(row.severity, 0.3);
        assert_eq!(row.n_trials, 400);
        assert_eq!(row.downgrade_probability, result.downgrade_probability());
        assert_eq!(row.mean_downgrade_year, result.mean_downgrade_year());
    }
}
