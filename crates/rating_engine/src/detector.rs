//! Downgrade detection.
//!
//! A path is downgraded the first time its breach streak reaches the
//! configured threshold. A breach year extends the streak, a clean year
//! resets it, and evaluation stops at the first trigger: the state machine
//! moves from not-downgraded to downgraded once and never back.

use rating_core::error::{Result, SimulationError};
use rating_core::params::{BreachRule, SimulationParameters};
use rating_core::types::{DowngradeStatus, YearState};

/// Consecutive-breach streak counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Streak(usize);

impl Streak {
    /// Advances the streak by one year and returns its new length.
    #[inline]
    fn observe(&mut self, breach: bool) -> usize {
        self.0 = if breach { self.0 + 1 } else { 0 };
        self.0
    }
}

/// Applies the consecutive-breach rule to completed years.
///
/// # Examples
///
/// ```rust
/// use rating_core::types::DowngradeStatus;
/// use rating_engine::detector::DowngradeDetector;
///
/// let detector = DowngradeDetector::new(2).unwrap();
/// let status = detector.evaluate_flags(&[false, true, true, false]);
/// assert_eq!(status, DowngradeStatus::Downgraded { year: 3 });
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DowngradeDetector {
    threshold: usize,
    rule: BreachRule,
}

impl DowngradeDetector {
    /// Creates a detector using the combined breach flag.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] for a zero threshold.
    #[inline]
    pub fn new(threshold: usize) -> Result<Self> {
        Self::with_rule(threshold, BreachRule::Combined)
    }

    /// Creates a detector with an explicit streak rule.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] for a zero threshold.
    pub fn with_rule(threshold: usize, rule: BreachRule) -> Result<Self> {
        if threshold == 0 {
            return Err(SimulationError::invalid(
                "consecutive_breaches",
                "must be at least 1, got 0",
            ));
        }
        Ok(Self { threshold, rule })
    }

    /// Creates the detector configured by `params`.
    ///
    /// Validated parameters always carry a threshold of at least one.
    #[inline]
    pub fn from_params(params: &SimulationParameters) -> Self {
        Self {
            threshold: params.consecutive_breaches(),
            rule: params.breach_rule(),
        }
    }

    /// Consecutive-breach threshold.
    #[inline]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Streak rule.
    #[inline]
    pub fn rule(&self) -> BreachRule {
        self.rule
    }

    /// Evaluates a sequence of per-year breach flags (year 1 first).
    pub fn evaluate_flags(&self, flags: &[bool]) -> DowngradeStatus {
        let mut streak = Streak::default();
        for (index, &breach) in flags.iter().enumerate() {
            if streak.observe(breach) >= self.threshold {
                return DowngradeStatus::Downgraded { year: index + 1 };
            }
        }
        DowngradeStatus::NotDowngraded
    }

    /// Evaluates a path's years according to the configured rule.
    pub fn evaluate(&self, years: &[YearState]) -> DowngradeStatus {
        match self.rule {
            BreachRule::Combined => {
                let mut streak = Streak::default();
                for year in years {
                    if streak.observe(year.breach) >= self.threshold {
                        return DowngradeStatus::Downgraded { year: year.year };
                    }
                }
                DowngradeStatus::NotDowngraded
            }
            BreachRule::PerMetric => {
                let mut coverage = Streak::default();
                let mut leverage = Streak::default();
                for year in years {
                    let coverage_run = coverage.observe(year.coverage_breach);
                    let leverage_run = leverage.observe(year.leverage_breach);
                    if coverage_run.max(leverage_run) >= self.threshold {
                        return DowngradeStatus::Downgraded { year: year.year };
                    }
                }
                DowngradeStatus::NotDowngraded
            }
        }
    }
}
