//! Completed Monte Carlo trials.

use super::year::YearState;

/// Leakage event on a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeakageEvent {
    /// 1-based year in which the leakage first affects financials.
    pub year: usize,
}

/// Outcome of the consecutive-breach rule on one path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DowngradeStatus {
    /// The threshold was never reached within the horizon.
    #[default]
    NotDowngraded,
    /// The threshold was first reached in `year` (1-based).
    Downgraded {
        /// Triggering year.
        year: usize,
    },
}

impl DowngradeStatus {
    /// True if the path was downgraded.
    #[inline]
    pub fn is_downgraded(self) -> bool {
        matches!(self, Self::Downgraded { .. })
    }

    /// Triggering year, if any.
    #[inline]
    pub fn year(self) -> Option<usize> {
        match self {
            Self::Downgraded { year } => Some(year),
            Self::NotDowngraded => None,
        }
    }
}

/// Raw output of the path generator, before downgrade evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    /// Years in order, one per horizon year.
    pub years: Vec<YearState>,
    /// Leakage event, if one occurred.
    pub leakage: Option<LeakageEvent>,
}

/// One Monte Carlo trial.
///
/// Built once by the scenario runner and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    years: Vec<YearState>,
    leakage: Option<LeakageEvent>,
    downgrade: DowngradeStatus,
    seed: u64,
}

impl Path {
    /// Creates a path from its parts.
    pub fn new(
        years: Vec<YearState>,
        leakage: Option<LeakageEvent>,
        downgrade: DowngradeStatus,
        seed: u64,
    ) -> Self {
        Self {
            years,
            leakage,
            downgrade,
            seed,
        }
    }

    /// Creates a path from a generated trajectory and its evaluation.
    pub fn from_trajectory(trajectory: Trajectory, downgrade: DowngradeStatus, seed: u64) -> Self {
        Self::new(trajectory.years, trajectory.leakage, downgrade, seed)
    }

    /// Years in order.
    #[inline]
    pub fn years(&self) -> &[YearState] {
        &self.years
    }

    /// Number of simulated years.
    #[inline]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// True if the path holds no years.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Leakage event, if any.
    #[inline]
    pub fn leakage(&self) -> Option<LeakageEvent> {
        self.leakage
    }

    /// True if a leakage event occurred on this path.
    #[inline]
    pub fn leak_occurred(&self) -> bool {
        self.leakage.is_some()
    }

    /// Year in which leakage first affects financials.
    #[inline]
    pub fn leak_year(&self) -> Option<usize> {
        self.leakage.map(|event| event.year)
    }

    /// Downgrade outcome.
    #[inline]
    pub fn downgrade(&self) -> DowngradeStatus {
        self.downgrade
    }

    /// True if the path was downgraded.
    #[inline]
    pub fn is_downgraded(&self) -> bool {
        self.downgrade.is_downgraded()
    }

    /// Triggering year, if downgraded.
    #[inline]
    pub fn downgrade_year(&self) -> Option<usize> {
        self.downgrade.year()
    }

    /// Seed of the stream that generated this path.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Interest coverage by year.
    pub fn coverage_series(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.coverage).collect()
    }

    /// Leverage by year.
    pub fn leverage_series(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.leverage).collect()
    }

    /// Revenue by year.
    pub fn revenue_series(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.revenue).collect()
    }

    /// EBITDA by year.
    pub fn ebitda_series(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.ebitda).collect()
    }

    /// Breach flags by year.
    pub fn breach_flags(&self) -> Vec<bool> {
        self.years.iter().map(|y| y.breach).collect()
    }

    /// Number of years whose ratios came from the degenerate-ratio policy.
    pub fn degenerate_years(&self) -> usize {
        self.years
            .iter()
            .filter(|y| y.ratio_status.is_degenerate())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(n: usize, margin: f64) -> YearState {
        YearState::from_financials(n, 1000.0, 0.05, margin, 30.0, 600.0, 2.5, 4.0)
    }

    #[test]
    fn test_accessors() {
        let path = Path::new(
            vec![year(1, 0.18), year(2, 0.10), year(3, 0.0)],
            Some(LeakageEvent { year: 1 }),
            DowngradeStatus::Downgraded { year: 3 },
            99,
        );

        assert_eq!(path.len(), 3);
        assert!(path.leak_occurred());
        assert_eq!(path.leak_year(), Some(1));
        assert!(path.is_downgraded());
        assert_eq!(path.downgrade_year(), Some(3));
        assert_eq!(path.seed(), 99);
        assert_eq!(path.breach_flags(), vec![false, true, true]);
        assert_eq!(path.degenerate_years(), 1);
        assert_eq!(path.coverage_series().len(), 3);
        assert_eq!(path.revenue_series(), vec![1000.0; 3]);
    }

    #[test]
    fn test_status_helpers() {
        assert!(!DowngradeStatus::NotDowngraded.is_downgraded());
        assert_eq!(DowngradeStatus::NotDowngraded.year(), None);
        assert_eq!(DowngradeStatus::Downgraded { year: 4 }.year(), Some(4));
    }
}
