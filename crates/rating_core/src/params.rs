//! Simulation parameters.
//!
//! [`SimulationParameters`] is the immutable configuration of one scenario.
//! It is built once through [`SimulationParametersBuilder`], validated at
//! build time, and only read afterwards. Deriving a variant (another
//! severity, another seed) goes back through the builder so every variant is
//! validated as well.
//!
//! The defaults reproduce the illustrative calibration of the model: a firm
//! with 1000 of revenue, an 18% EBITDA margin, 600 of debt at 5%, a 15%
//! chance of a leakage event at the start of the horizon, and a downgrade
//! after two consecutive years below 2.5x coverage or above 4.0x leverage.

use crate::error::{Result, SimulationError};

/// Maximum number of Monte Carlo trials per scenario.
pub const MAX_TRIALS: usize = 10_000_000;

/// Maximum horizon length in years.
pub const MAX_HORIZON: usize = 100;

/// Maximum number of raw paths retained per scenario.
pub const MAX_SAMPLE_SIZE: usize = 1_000;

/// When a leakage event first affects the firm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LeakageTiming {
    /// Leakage is present from year 1 (one-off hazard at the start).
    #[default]
    AtStart,
    /// Occurrence year drawn uniformly from `1..=T`.
    UniformInHorizon,
}

/// Shape of the leakage impact over time, relative to the occurrence year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImpactProfile {
    /// Full severity until detection, then severity reduced by mitigation.
    #[default]
    FullUntilDetection,
    /// No impact until detection, then severity reduced by mitigation.
    DelayedOnset,
}

/// Year-to-year debt roll-forward rule.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DebtPolicy {
    /// Debt stays at its initial balance for the whole horizon.
    #[default]
    Constant,
    /// Free cash flow `ebitda - interest - maintenance_capex` drives debt:
    /// a shortfall is borrowed in full, a surplus repays
    /// `paydown_ratio` of itself. Debt never goes below zero.
    CashSweep {
        /// Fixed annual capital expenditure.
        maintenance_capex: f64,
        /// Share of positive free cash flow used to repay debt, in [0, 1].
        paydown_ratio: f64,
    },
}

impl DebtPolicy {
    /// Returns the closing balance given the opening balance and the year's
    /// EBITDA and interest expense.
    pub fn roll_forward(&self, opening_debt: f64, ebitda: f64, interest: f64) -> f64 {
        match *self {
            Self::Constant => opening_debt,
            Self::CashSweep {
                maintenance_capex,
                paydown_ratio,
            } => {
                let free_cash_flow = ebitda - interest - maintenance_capex;
                let closing = if free_cash_flow < 0.0 {
                    opening_debt - free_cash_flow
                } else {
                    opening_debt - paydown_ratio * free_cash_flow
                };
                closing.max(0.0)
            }
        }
    }
}

/// How yearly breaches accumulate towards a downgrade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BreachRule {
    /// A single streak over years breaching either threshold.
    #[default]
    Combined,
    /// Independent coverage and leverage streaks; either may trigger.
    PerMetric,
}

/// Immutable, validated parameters of one scenario.
///
/// # Examples
///
/// ```rust
/// use rating_core::params::SimulationParameters;
///
/// let params = SimulationParameters::builder()
///     .n_trials(1_000)
///     .severity(0.25)
///     .seed(7)
///     .build()
///     .expect("valid parameters");
///
/// assert_eq!(params.n_trials(), 1_000);
/// assert_eq!(params.horizon_years(), 5);
/// assert!((params.initial_ebitda() - 180.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    horizon_years: usize,
    n_trials: usize,
    seed: u64,

    initial_revenue: f64,
    base_growth: f64,
    growth_volatility: f64,
    initial_margin: f64,
    margin_volatility: f64,
    initial_debt: f64,
    interest_rate: f64,
    fixed_cost_intensity: f64,

    leak_probability: f64,
    severity: f64,
    detection_lag: usize,
    mitigation: f64,
    growth_impact_share: f64,
    margin_impact_share: f64,
    leakage_timing: LeakageTiming,
    impact_profile: ImpactProfile,

    debt_policy: DebtPolicy,

    coverage_floor: f64,
    leverage_ceiling: f64,
    consecutive_breaches: usize,
    breach_rule: BreachRule,
    downgrade_window: usize,

    sample_size: usize,

    growth_floor: f64,
    margin_floor: f64,
    revenue_floor: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        let b = SimulationParametersBuilder::default();
        Self {
            horizon_years: b.horizon_years,
            n_trials: b.n_trials,
            seed: b.seed,
            initial_revenue: b.initial_revenue,
            base_growth: b.base_growth,
            growth_volatility: b.growth_volatility,
            initial_margin: b.initial_margin,
            margin_volatility: b.margin_volatility,
            initial_debt: b.initial_debt,
            interest_rate: b.interest_rate,
            fixed_cost_intensity: b.fixed_cost_intensity,
            leak_probability: b.leak_probability,
            severity: b.severity,
            detection_lag: b.detection_lag,
            mitigation: b.mitigation,
            growth_impact_share: b.growth_impact_share,
            margin_impact_share: b.margin_impact_share,
            leakage_timing: b.leakage_timing,
            impact_profile: b.impact_profile,
            debt_policy: b.debt_policy,
            coverage_floor: b.coverage_floor,
            leverage_ceiling: b.leverage_ceiling,
            consecutive_breaches: b.consecutive_breaches,
            breach_rule: b.breach_rule,
            downgrade_window: b.downgrade_window,
            sample_size: b.sample_size,
            growth_floor: b.growth_floor,
            margin_floor: b.margin_floor,
            revenue_floor: b.revenue_floor,
        }
    }
}

impl SimulationParameters {
    /// Creates a builder pre-populated with the default calibration.
    #[inline]
    pub fn builder() -> SimulationParametersBuilder {
        SimulationParametersBuilder::default()
    }

    /// Returns a builder holding a copy of these parameters.
    pub fn to_builder(&self) -> SimulationParametersBuilder {
        SimulationParametersBuilder {
            horizon_years: self.horizon_years,
            n_trials: self.n_trials,
            seed: self.seed,
            initial_revenue: self.initial_revenue,
            base_growth: self.base_growth,
            growth_volatility: self.growth_volatility,
            initial_margin: self.initial_margin,
            margin_volatility: self.margin_volatility,
            initial_debt: self.initial_debt,
            interest_rate: self.interest_rate,
            fixed_cost_intensity: self.fixed_cost_intensity,
            leak_probability: self.leak_probability,
            severity: self.severity,
            detection_lag: self.detection_lag,
            mitigation: self.mitigation,
            growth_impact_share: self.growth_impact_share,
            margin_impact_share: self.margin_impact_share,
            leakage_timing: self.leakage_timing,
            impact_profile: self.impact_profile,
            debt_policy: self.debt_policy,
            coverage_floor: self.coverage_floor,
            leverage_ceiling: self.leverage_ceiling,
            consecutive_breaches: self.consecutive_breaches,
            breach_rule: self.breach_rule,
            downgrade_window: self.downgrade_window,
            sample_size: self.sample_size,
            growth_floor: self.growth_floor,
            margin_floor: self.margin_floor,
            revenue_floor: self.revenue_floor,
        }
    }

    /// Returns a validated copy with a different leakage severity.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if `severity` is
    /// negative or not finite.
    pub fn with_severity(&self, severity: f64) -> Result<Self> {
        self.to_builder().severity(severity).build()
    }

    /// Horizon length `T` in years.
    #[inline]
    pub fn horizon_years(&self) -> usize {
        self.horizon_years
    }

    /// Number of Monte Carlo trials `N`.
    #[inline]
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Base seed from which every trial stream is derived.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Revenue at the start of year 1.
    #[inline]
    pub fn initial_revenue(&self) -> f64 {
        self.initial_revenue
    }

    /// Mean annual revenue growth.
    #[inline]
    pub fn base_growth(&self) -> f64 {
        self.base_growth
    }

    /// Standard deviation of the annual growth shock.
    #[inline]
    pub fn growth_volatility(&self) -> f64 {
        self.growth_volatility
    }

    /// Starting EBITDA margin.
    #[inline]
    pub fn initial_margin(&self) -> f64 {
        self.initial_margin
    }

    /// Standard deviation of the annual margin drift.
    #[inline]
    pub fn margin_volatility(&self) -> f64 {
        self.margin_volatility
    }

    /// Opening debt balance of year 1.
    #[inline]
    pub fn initial_debt(&self) -> f64 {
        self.initial_debt
    }

    /// Starting EBITDA (`initial_revenue * initial_margin`).
    #[inline]
    pub fn initial_ebitda(&self) -> f64 {
        self.initial_revenue * self.initial_margin
    }

    /// Average interest rate charged on the opening debt balance.
    #[inline]
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    /// Operating leverage amplifier on the margin impact.
    #[inline]
    pub fn fixed_cost_intensity(&self) -> f64 {
        self.fixed_cost_intensity
    }

    /// Probability `P_LEAK` that a path experiences a leakage event.
    #[inline]
    pub fn leak_probability(&self) -> f64 {
        self.leak_probability
    }

    /// Leakage severity.
    #[inline]
    pub fn severity(&self) -> f64 {
        self.severity
    }

    /// Years between leakage occurrence and detection.
    #[inline]
    pub fn detection_lag(&self) -> usize {
        self.detection_lag
    }

    /// Fraction of severity neutralised after detection.
    #[inline]
    pub fn mitigation(&self) -> f64 {
        self.mitigation
    }

    /// Share of the effective severity subtracted from growth.
    #[inline]
    pub fn growth_impact_share(&self) -> f64 {
        self.growth_impact_share
    }

    /// Share of the effective severity subtracted from margin, before the
    /// fixed-cost amplifier.
    #[inline]
    pub fn margin_impact_share(&self) -> f64 {
        self.margin_impact_share
    }

    /// Occurrence-year policy.
    #[inline]
    pub fn leakage_timing(&self) -> LeakageTiming {
        self.leakage_timing
    }

    /// Impact profile relative to detection.
    #[inline]
    pub fn impact_profile(&self) -> ImpactProfile {
        self.impact_profile
    }

    /// Debt roll-forward rule.
    #[inline]
    pub fn debt_policy(&self) -> DebtPolicy {
        self.debt_policy
    }

    /// Interest coverage floor; coverage below it is a breach.
    #[inline]
    pub fn coverage_floor(&self) -> f64 {
        self.coverage_floor
    }

    /// Leverage ceiling; leverage above it is a breach.
    #[inline]
    pub fn leverage_ceiling(&self) -> f64 {
        self.leverage_ceiling
    }

    /// Number of consecutive breach years that triggers a downgrade.
    #[inline]
    pub fn consecutive_breaches(&self) -> usize {
        self.consecutive_breaches
    }

    /// Streak accounting rule.
    #[inline]
    pub fn breach_rule(&self) -> BreachRule {
        self.breach_rule
    }

    /// Headline window (years) for the "downgraded within" probability.
    #[inline]
    pub fn downgrade_window(&self) -> usize {
        self.downgrade_window
    }

    /// Number of raw paths retained for illustration.
    #[inline]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Lower clip applied to effective growth.
    #[inline]
    pub fn growth_floor(&self) -> f64 {
        self.growth_floor
    }

    /// Lower clip applied to the margin.
    #[inline]
    pub fn margin_floor(&self) -> f64 {
        self.margin_floor
    }

    /// Lower clip applied to revenue.
    #[inline]
    pub fn revenue_floor(&self) -> f64 {
        self.revenue_floor
    }

    /// Checks every invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as
    /// [`SimulationError::InvalidParameter`].
    pub fn validate(&self) -> Result<()> {
        if self.horizon_years == 0 || self.horizon_years > MAX_HORIZON {
            return Err(SimulationError::invalid(
                "horizon_years",
                format!("must be in [1, {}], got {}", MAX_HORIZON, self.horizon_years),
            ));
        }
        if self.n_trials == 0 || self.n_trials > MAX_TRIALS {
            return Err(SimulationError::invalid(
                "n_trials",
                format!("must be in [1, {}], got {}", MAX_TRIALS, self.n_trials),
            ));
        }

        check_positive("initial_revenue", self.initial_revenue)?;
        check_finite("base_growth", self.base_growth)?;
        check_non_negative("growth_volatility", self.growth_volatility)?;
        check_finite("initial_margin", self.initial_margin)?;
        if self.initial_margin <= 0.0 || self.initial_margin > 1.0 {
            return Err(SimulationError::invalid(
                "initial_margin",
                format!("must be in (0, 1], got {}", self.initial_margin),
            ));
        }
        check_non_negative("margin_volatility", self.margin_volatility)?;
        check_non_negative("initial_debt", self.initial_debt)?;
        check_non_negative("interest_rate", self.interest_rate)?;
        check_non_negative("fixed_cost_intensity", self.fixed_cost_intensity)?;

        check_unit("leak_probability", self.leak_probability)?;
        check_non_negative("severity", self.severity)?;
        if self.detection_lag > self.horizon_years {
            return Err(SimulationError::invalid(
                "detection_lag",
                format!(
                    "must not exceed the horizon of {} years, got {}",
                    self.horizon_years, self.detection_lag
                ),
            ));
        }
        check_unit("mitigation", self.mitigation)?;
        check_non_negative("growth_impact_share", self.growth_impact_share)?;
        check_non_negative("margin_impact_share", self.margin_impact_share)?;

        if let DebtPolicy::CashSweep {
            maintenance_capex,
            paydown_ratio,
        } = self.debt_policy
        {
            check_non_negative("maintenance_capex", maintenance_capex)?;
            check_unit("paydown_ratio", paydown_ratio)?;
        }

        check_positive("coverage_floor", self.coverage_floor)?;
        check_positive("leverage_ceiling", self.leverage_ceiling)?;
        if self.consecutive_breaches == 0 || self.consecutive_breaches > self.horizon_years {
            return Err(SimulationError::invalid(
                "consecutive_breaches",
                format!(
                    "must be in [1, {}] (the horizon), got {}",
                    self.horizon_years, self.consecutive_breaches
                ),
            ));
        }
        if self.downgrade_window == 0 || self.downgrade_window > self.horizon_years {
            return Err(SimulationError::invalid(
                "downgrade_window",
                format!(
                    "must be in [1, {}] (the horizon), got {}",
                    self.horizon_years, self.downgrade_window
                ),
            ));
        }
        if self.sample_size > MAX_SAMPLE_SIZE {
            return Err(SimulationError::invalid(
                "sample_size",
                format!("must not exceed {}, got {}", MAX_SAMPLE_SIZE, self.sample_size),
            ));
        }

        check_finite("growth_floor", self.growth_floor)?;
        if self.growth_floor <= -1.0 {
            return Err(SimulationError::invalid(
                "growth_floor",
                format!("must be greater than -1, got {}", self.growth_floor),
            ));
        }
        check_positive("margin_floor", self.margin_floor)?;
        check_positive("revenue_floor", self.revenue_floor)?;
        Ok(())
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            name,
            format!("must be finite, got {}", value),
        ))
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(SimulationError::invalid(
            name,
            format!("must be non-negative, got {}", value),
        ));
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    check_finite(name, value)?;
    if value <= 0.0 {
        return Err(SimulationError::invalid(
            name,
            format!("must be positive, got {}", value),
        ));
    }
    Ok(())
}

fn check_unit(name: &'static str, value: f64) -> Result<()> {
    check_finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(SimulationError::invalid(
            name,
            format!("must be in [0, 1], got {}", value),
        ));
    }
    Ok(())
}

/// Builder for [`SimulationParameters`].
///
/// Starts from the default calibration; every setter overrides one field
/// and [`build`](Self::build) validates the whole set.
#[derive(Clone, Debug)]
pub struct SimulationParametersBuilder {
    horizon_years: usize,
    n_trials: usize,
    seed: u64,
    initial_revenue: f64,
    base_growth: f64,
    growth_volatility: f64,
    initial_margin: f64,
    margin_volatility: f64,
    initial_debt: f64,
    interest_rate: f64,
    fixed_cost_intensity: f64,
    leak_probability: f64,
    severity: f64,
    detection_lag: usize,
    mitigation: f64,
    growth_impact_share: f64,
    margin_impact_share: f64,
    leakage_timing: LeakageTiming,
    impact_profile: ImpactProfile,
    debt_policy: DebtPolicy,
    coverage_floor: f64,
    leverage_ceiling: f64,
    consecutive_breaches: usize,
    breach_rule: BreachRule,
    downgrade_window: usize,
    sample_size: usize,
    growth_floor: f64,
    margin_floor: f64,
    revenue_floor: f64,
}

impl Default for SimulationParametersBuilder {
    fn default() -> Self {
        Self {
            horizon_years: 5,
            n_trials: 3_000,
            seed: 42,
            initial_revenue: 1_000.0,
            base_growth: 0.05,
            growth_volatility: 0.06,
            initial_margin: 0.18,
            margin_volatility: 0.02,
            initial_debt: 600.0,
            interest_rate: 0.05,
            fixed_cost_intensity: 0.6,
            leak_probability: 0.15,
            severity: 0.20,
            detection_lag: 2,
            mitigation: 0.5,
            growth_impact_share: 0.6,
            margin_impact_share: 0.4,
            leakage_timing: LeakageTiming::AtStart,
            impact_profile: ImpactProfile::FullUntilDetection,
            debt_policy: DebtPolicy::Constant,
            coverage_floor: 2.5,
            leverage_ceiling: 4.0,
            consecutive_breaches: 2,
            breach_rule: BreachRule::Combined,
            downgrade_window: 3,
            sample_size: 5,
            growth_floor: -0.95,
            margin_floor: 0.01,
            revenue_floor: 1.0,
        }
    }
}

macro_rules! setters {
    ($($(#[$doc:meta])* $name:ident: $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(mut self, $name: $ty) -> Self {
                self.$name = $name;
                self
            }
        )*
    };
}

impl SimulationParametersBuilder {
    setters! {
        /// Sets the horizon length in years.
        horizon_years: usize,
        /// Sets the number of Monte Carlo trials.
        n_trials: usize,
        /// Sets the base seed.
        seed: u64,
        /// Sets the starting revenue.
        initial_revenue: f64,
        /// Sets the mean annual growth.
        base_growth: f64,
        /// Sets the growth shock standard deviation.
        growth_volatility: f64,
        /// Sets the starting EBITDA margin.
        initial_margin: f64,
        /// Sets the margin drift standard deviation.
        margin_volatility: f64,
        /// Sets the opening debt balance.
        initial_debt: f64,
        /// Sets the interest rate on debt.
        interest_rate: f64,
        /// Sets the fixed-cost (operating leverage) amplifier.
        fixed_cost_intensity: f64,
        /// Sets the leakage probability.
        leak_probability: f64,
        /// Sets the leakage severity.
        severity: f64,
        /// Sets the detection lag in years.
        detection_lag: usize,
        /// Sets the mitigation strength.
        mitigation: f64,
        /// Sets the share of severity hitting growth.
        growth_impact_share: f64,
        /// Sets the share of severity hitting margin.
        margin_impact_share: f64,
        /// Sets the occurrence-year policy.
        leakage_timing: LeakageTiming,
        /// Sets the impact profile.
        impact_profile: ImpactProfile,
        /// Sets the debt roll-forward rule.
        debt_policy: DebtPolicy,
        /// Sets the interest coverage floor.
        coverage_floor: f64,
        /// Sets the leverage ceiling.
        leverage_ceiling: f64,
        /// Sets the consecutive-breach threshold.
        consecutive_breaches: usize,
        /// Sets the streak accounting rule.
        breach_rule: BreachRule,
        /// Sets the headline downgrade window.
        downgrade_window: usize,
        /// Sets the number of retained sample paths.
        sample_size: usize,
        /// Sets the growth clip.
        growth_floor: f64,
        /// Sets the margin clip.
        margin_floor: f64,
        /// Sets the revenue clip.
        revenue_floor: f64,
    }

    /// Builds and validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] naming the first
    /// violated invariant. Values are never clamped.
    pub fn build(self) -> Result<SimulationParameters> {
        let params = SimulationParameters {
            horizon_years: self.horizon_years,
            n_trials: self.n_trials,
            seed: self.seed,
            initial_revenue: self.initial_revenue,
            base_growth: self.base_growth,
            growth_volatility: self.growth_volatility,
            initial_margin: self.initial_margin,
            margin_volatility: self.margin_volatility,
            initial_debt: self.initial_debt,
            interest_rate: self.interest_rate,
            fixed_cost_intensity: self.fixed_cost_intensity,
            leak_probability: self.leak_probability,
            severity: self.severity,
            detection_lag: self.detection_lag,
            mitigation: self.mitigation,
            growth_impact_share: self.growth_impact_share,
            margin_impact_share: self.margin_impact_share,
            leakage_timing: self.leakage_timing,
            impact_profile: self.impact_profile,
            debt_policy: self.debt_policy,
            coverage_floor: self.coverage_floor,
            leverage_ceiling: self.leverage_ceiling,
            consecutive_breaches: self.consecutive_breaches,
            breach_rule: self.breach_rule,
            downgrade_window: self.downgrade_window,
            sample_size: self.sample_size,
            growth_floor: self.growth_floor,
            margin_floor: self.margin_floor,
            revenue_floor: self.revenue_floor,
        };

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_name(result: Result<SimulationParameters>) -> &'static str {
        match result {
            Err(SimulationError::InvalidParameter { name, .. }) => name,
            other => panic!("Expected invalid parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_default_builder_is_valid() {
        let params = SimulationParameters::builder().build().unwrap();
        assert_eq!(params, SimulationParameters::default());
        assert_eq!(params.horizon_years(), 5);
        assert_eq!(params.n_trials(), 3_000);
        assert_eq!(params.consecutive_breaches(), 2);
        assert_eq!(params.debt_policy(), DebtPolicy::Constant);
        assert_eq!(params.leakage_timing(), LeakageTiming::AtStart);
    }

    #[test]
    fn test_to_builder_round_trips() {
        let params = SimulationParameters::builder()
            .severity(0.3)
            .detection_lag(1)
            .breach_rule(BreachRule::PerMetric)
            .build()
            .unwrap();
        assert_eq!(params.to_builder().build().unwrap(), params);
    }

    #[test]
    fn test_with_severity_keeps_other_fields() {
        let base = SimulationParameters::default();
        let varied = base.with_severity(0.35).unwrap();
        assert_eq!(varied.severity(), 0.35);
        assert_eq!(varied.seed(), base.seed());
        assert_eq!(varied.leak_probability(), base.leak_probability());
    }

    #[test]
    fn test_leak_probability_out_of_range() {
        let result = SimulationParameters::builder().leak_probability(1.5).build();
        assert_eq!(invalid_name(result), "leak_probability");

        let result = SimulationParameters::builder().leak_probability(-0.1).build();
        assert_eq!(invalid_name(result), "leak_probability");
    }

    #[test]
    fn test_negative_severity_rejected() {
        let result = SimulationParameters::builder().severity(-0.01).build();
        assert_eq!(invalid_name(result), "severity");
        assert!(SimulationParameters::default().with_severity(f64::NAN).is_err());
    }

    #[test]
    fn test_mitigation_out_of_range() {
        let result = SimulationParameters::builder().mitigation(1.01).build();
        assert_eq!(invalid_name(result), "mitigation");
    }

    #[test]
    fn test_zero_trials_rejected() {
        let result = SimulationParameters::builder().n_trials(0).build();
        assert_eq!(invalid_name(result), "n_trials");

        let result = SimulationParameters::builder().n_trials(MAX_TRIALS + 1).build();
        assert_eq!(invalid_name(result), "n_trials");
    }

    #[test]
    fn test_threshold_exceeding_horizon_rejected() {
        let result = SimulationParameters::builder()
            .horizon_years(3)
            .consecutive_breaches(4)
            .downgrade_window(3)
            .build();
        assert_eq!(invalid_name(result), "consecutive_breaches");

        let ok = SimulationParameters::builder()
            .horizon_years(3)
            .consecutive_breaches(3)
            .downgrade_window(3)
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let result = SimulationParameters::builder().consecutive_breaches(0).build();
        assert_eq!(invalid_name(result), "consecutive_breaches");
    }

    #[test]
    fn test_window_and_lag_bounded_by_horizon() {
        let result = SimulationParameters::builder().downgrade_window(6).build();
        assert_eq!(invalid_name(result), "downgrade_window");

        let result = SimulationParameters::builder().detection_lag(6).build();
        assert_eq!(invalid_name(result), "detection_lag");
    }

    #[test]
    fn test_margin_and_revenue_rules() {
        let result = SimulationParameters::builder().initial_margin(0.0).build();
        assert_eq!(invalid_name(result), "initial_margin");

        let result = SimulationParameters::builder().initial_revenue(-1.0).build();
        assert_eq!(invalid_name(result), "initial_revenue");

        let result = SimulationParameters::builder().growth_floor(-1.0).build();
        assert_eq!(invalid_name(result), "growth_floor");

        let result = SimulationParameters::builder().growth_volatility(f64::INFINITY).build();
        assert_eq!(invalid_name(result), "growth_volatility");
    }

    #[test]
    fn test_cash_sweep_validation() {
        let result = SimulationParameters::builder()
            .debt_policy(DebtPolicy::CashSweep {
                maintenance_capex: 20.0,
                paydown_ratio: 1.2,
            })
            .build();
        assert_eq!(invalid_name(result), "paydown_ratio");

        let result = SimulationParameters::builder()
            .debt_policy(DebtPolicy::CashSweep {
                maintenance_capex: -5.0,
                paydown_ratio: 0.5,
            })
            .build();
        assert_eq!(invalid_name(result), "maintenance_capex");
    }

    #[test]
    fn test_constant_debt_roll_forward() {
        assert_eq!(DebtPolicy::Constant.roll_forward(600.0, 10.0, 30.0), 600.0);
    }

    #[test]
    fn test_cash_sweep_roll_forward() {
        let policy = DebtPolicy::CashSweep {
            maintenance_capex: 50.0,
            paydown_ratio: 0.5,
        };
        // fcf = 180 - 30 - 50 = 100, half repays debt
        assert_eq!(policy.roll_forward(600.0, 180.0, 30.0), 550.0);
        // fcf = 60 - 30 - 50 = -20, shortfall is borrowed
        assert_eq!(policy.roll_forward(600.0, 60.0, 30.0), 620.0);
        // repayment cannot push debt below zero
        assert_eq!(policy.roll_forward(10.0, 500.0, 0.5), 0.0);
    }

    #[test]
    fn test_sample_size_limit() {
        let result = SimulationParameters::builder()
            .sample_size(MAX_SAMPLE_SIZE + 1)
            .build();
        assert_eq!(invalid_name(result), "sample_size");
    }
}
