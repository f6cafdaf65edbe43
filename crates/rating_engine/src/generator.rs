//! Path generation.
//!
//! [`PathGenerator`] turns one trial stream into one [`Trajectory`]:
//! revenue growth and margin shocks each year, an optional leakage event
//! eroding both, ratio checks against the rating thresholds, and the debt
//! roll-forward.
//!
//! # Draw order
//!
//! Per path: one uniform for the leakage decision, one index for the
//! occurrence year when timing is [`LeakageTiming::UniformInHorizon`], then
//! two standard normals per year (growth, margin). The count never depends
//! on severity, mitigation or whether leakage occurred, so two parameter
//! sets driven by the same stream see the same shocks.

use rating_core::params::{ImpactProfile, LeakageTiming, SimulationParameters};
use rating_core::rng::TrialRng;
use rating_core::types::{LeakageEvent, Trajectory, YearState};

/// Generates trajectories for one parameter set.
///
/// # Examples
///
/// ```rust
/// use rating_core::params::SimulationParameters;
/// use rating_core::rng::TrialRng;
/// use rating_engine::generator::PathGenerator;
///
/// let params = SimulationParameters::default();
/// let generator = PathGenerator::new(&params);
///
/// let mut rng = TrialRng::for_trial(params.seed(), 0);
/// let trajectory = generator.generate(&mut rng);
/// assert_eq!(trajectory.years.len(), params.horizon_years());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PathGenerator<'a> {
    params: &'a SimulationParameters,
}

impl<'a> PathGenerator<'a> {
    /// Creates a generator bound to `params`.
    #[inline]
    pub fn new(params: &'a SimulationParameters) -> Self {
        Self { params }
    }

    /// Draws the leakage event of one path.
    fn draw_leakage(&self, rng: &mut TrialRng) -> Option<LeakageEvent> {
        let p = self.params;
        let occurs = rng.gen_uniform() < p.leak_probability();
        let year = match p.leakage_timing() {
            LeakageTiming::AtStart => 1,
            LeakageTiming::UniformInHorizon => 1 + rng.gen_index(p.horizon_years()),
        };
        occurs.then_some(LeakageEvent { year })
    }

    /// Severity subtracted in `year`, after detection lag and mitigation.
    ///
    /// Returns 0 when no leakage occurred or `year` precedes it.
    pub fn effective_severity(&self, leakage: Option<LeakageEvent>, year: usize) -> f64 {
        let p = self.params;
        let Some(event) = leakage else {
            return 0.0;
        };
        if year < event.year {
            return 0.0;
        }

        let detected = year - event.year >= p.detection_lag();
        let mitigated = p.severity() * (1.0 - p.mitigation());
        match (p.impact_profile(), detected) {
            (_, true) => mitigated,
            (ImpactProfile::FullUntilDetection, false) => p.severity(),
            (ImpactProfile::DelayedOnset, false) => 0.0,
        }
    }

    /// Generates one trajectory of exactly `horizon_years` years.
    pub fn generate(&self, rng: &mut TrialRng) -> Trajectory {
        let p = self.params;
        let leakage = self.draw_leakage(rng);

        let margin_hit = p.margin_impact_share() * (1.0 + p.fixed_cost_intensity());
        let mut revenue = p.initial_revenue();
        let mut margin = p.initial_margin();
        let mut debt = p.initial_debt();
        let mut years = Vec::with_capacity(p.horizon_years());

        for year in 1..=p.horizon_years() {
            let growth_shock = rng.gen_normal_with(0.0, p.growth_volatility());
            let margin_shock = rng.gen_normal_with(0.0, p.margin_volatility());
            let severity = self.effective_severity(leakage, year);

            let growth = (p.base_growth() + growth_shock - p.growth_impact_share() * severity)
                .max(p.growth_floor());
            margin = (margin + margin_shock - margin_hit * severity).max(p.margin_floor());
            revenue = (revenue * (1.0 + growth)).max(p.revenue_floor());

            let interest = debt * p.interest_rate();
            let state = YearState::from_financials(
                year,
                revenue,
                growth,
                margin,
                interest,
                debt,
                p.coverage_floor(),
                p.leverage_ceiling(),
            )
            .with_leakage(
                leakage.is_some_and(|event| year >= event.year),
                severity,
            );

            debt = p.debt_policy().roll_forward(debt, state.ebitda, interest);
            years.push(state);
        }

        Trajectory { years, leakage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rating_core::params::DebtPolicy;
    use rating_core::types::RatioStatus;

    fn quiet_params() -> rating_core::params::SimulationParametersBuilder {
        SimulationParameters::builder()
            .growth_volatility(0.0)
            .margin_volatility(0.0)
    }

    #[test]
    fn test_path_length_matches_horizon() {
        for horizon in [1, 2, 5, 12] {
            let params = SimulationParameters::builder()
                .horizon_years(horizon)
                .consecutive_breaches(1)
                .downgrade_window(1)
                .detection_lag(0)
                .build()
                .unwrap();
            let generator = PathGenerator::new(&params);
            let trajectory = generator.generate(&mut TrialRng::for_trial(1, 0));
            assert_eq!(trajectory.years.len(), horizon);
            for (i, year) in trajectory.years.iter().enumerate() {
                assert_eq!(year.year, i + 1);
            }
        }
    }

    #[test]
    fn test_deterministic_path_without_shocks() {
        let params = quiet_params().leak_probability(0.0).build().unwrap();
        let trajectory = PathGenerator::new(&params).generate(&mut TrialRng::from_seed(5));

        let first = &trajectory.years[0];
        assert_relative_eq!(first.revenue, 1050.0, epsilon = 1e-9);
        assert_relative_eq!(first.margin, 0.18, epsilon = 1e-12);
        assert_relative_eq!(first.ebitda, 189.0, epsilon = 1e-9);
        assert_relative_eq!(first.interest, 30.0, epsilon = 1e-12);
        assert_relative_eq!(first.coverage, 6.3, epsilon = 1e-9);
        assert!(!first.breach);
        assert!(trajectory.leakage.is_none());
        assert!(trajectory.years.iter().all(|y| !y.leak_active));
    }

    #[test]
    fn test_full_until_detection_profile() {
        let params = quiet_params()
            .leak_probability(1.0)
            .severity(0.2)
            .mitigation(0.5)
            .detection_lag(2)
            .build()
            .unwrap();
        let trajectory = PathGenerator::new(&params).generate(&mut TrialRng::from_seed(5));

        assert_eq!(trajectory.leakage, Some(LeakageEvent { year: 1 }));
        let severities: Vec<f64> = trajectory
            .years
            .iter()
            .map(|y| y.effective_severity)
            .collect();
        assert_eq!(severities, vec![0.2, 0.2, 0.1, 0.1, 0.1]);
        assert!(trajectory.years.iter().all(|y| y.leak_active));

        // growth = 0.05 - 0.6 * 0.2
        assert_relative_eq!(trajectory.years[0].growth, -0.07, epsilon = 1e-12);
        // margin = 0.18 - 0.4 * 1.6 * 0.2
        assert_relative_eq!(trajectory.years[0].margin, 0.052, epsilon = 1e-12);
    }

    #[test]
    fn test_delayed_onset_profile() {
        let params = quiet_params()
            .leak_probability(1.0)
            .severity(0.2)
            .mitigation(0.25)
            .detection_lag(2)
            .impact_profile(ImpactProfile::DelayedOnset)
            .build()
            .unwrap();
        let generator = PathGenerator::new(&params);
        let event = Some(LeakageEvent { year: 1 });

        assert_eq!(generator.effective_severity(event, 1), 0.0);
        assert_eq!(generator.effective_severity(event, 2), 0.0);
        assert_relative_eq!(generator.effective_severity(event, 3), 0.15, epsilon = 1e-12);
        assert_relative_eq!(generator.effective_severity(event, 5), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_lag_applies_mitigation_immediately() {
        let params = quiet_params()
            .severity(0.2)
            .mitigation(1.0)
            .detection_lag(0)
            .build()
            .unwrap();
        let generator = PathGenerator::new(&params);
        assert_eq!(generator.effective_severity(Some(LeakageEvent { year: 1 }), 1), 0.0);
    }

    #[test]
    fn test_no_impact_before_occurrence_year() {
        let params = quiet_params().severity(0.3).build().unwrap();
        let generator = PathGenerator::new(&params);
        let event = Some(LeakageEvent { year: 3 });
        assert_eq!(generator.effective_severity(event, 2), 0.0);
        assert_eq!(generator.effective_severity(event, 3), 0.3);
        assert_eq!(generator.effective_severity(None, 3), 0.0);
    }

    #[test]
    fn test_uniform_timing_stays_in_horizon() {
        let params = SimulationParameters::builder()
            .leak_probability(1.0)
            .leakage_timing(LeakageTiming::UniformInHorizon)
            .build()
            .unwrap();
        let generator = PathGenerator::new(&params);

        let mut seen = [false; 5];
        for trial in 0..500 {
            let trajectory = generator.generate(&mut TrialRng::for_trial(3, trial));
            let event = trajectory.leakage.unwrap();
            assert!((1..=5).contains(&event.year));
            seen[event.year - 1] = true;
            for year in &trajectory.years {
                assert_eq!(year.leak_active, year.year >= event.year);
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_margin_and_revenue_floors() {
        let params = quiet_params()
            .leak_probability(1.0)
            .severity(5.0)
            .mitigation(0.0)
            .build()
            .unwrap();
        let trajectory = PathGenerator::new(&params).generate(&mut TrialRng::from_seed(1));

        for year in &trajectory.years {
            assert_eq!(year.margin, params.margin_floor());
            assert_eq!(year.growth, params.growth_floor());
            assert!(year.revenue >= params.revenue_floor());
            assert!(year.breach);
            assert_eq!(year.ratio_status, RatioStatus::Normal);
        }
    }

    #[test]
    fn test_cash_sweep_debt_evolves() {
        let params = quiet_params()
            .leak_probability(0.0)
            .debt_policy(DebtPolicy::CashSweep {
                maintenance_capex: 39.0,
                paydown_ratio: 1.0,
            })
            .build()
            .unwrap();
        let trajectory = PathGenerator::new(&params).generate(&mut TrialRng::from_seed(1));

        // year 1: fcf = 189 - 30 - 39 = 120, fully repaid
        assert_relative_eq!(trajectory.years[0].debt, 600.0);
        assert_relative_eq!(trajectory.years[1].debt, 480.0, epsilon = 1e-9);
        assert!(trajectory.years.windows(2).all(|w| w[1].debt <= w[0].debt));
    }

    #[test]
    fn test_zero_debt_has_no_interest() {
        let params = quiet_params().initial_debt(0.0).build().unwrap();
        let trajectory = PathGenerator::new(&params).generate(&mut TrialRng::from_seed(1));
        for year in &trajectory.years {
            assert_eq!(year.ratio_status, RatioStatus::NoInterest);
            assert!(!year.breach);
        }
    }

    #[test]
    fn test_same_stream_same_trajectory() {
        let params = SimulationParameters::default();
        let generator = PathGenerator::new(&params);
        let a = generator.generate(&mut TrialRng::for_trial(11, 4));
        let b = generator.generate(&mut TrialRng::for_trial(11, 4));
        assert_eq!(a, b);
    }
}
