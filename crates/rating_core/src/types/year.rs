//! Yearly financial state and the degenerate-ratio policy.

/// Magnitude bound on every stored ratio.
///
/// Coverage and leverage are clamped to `[-RATIO_CAP, RATIO_CAP]`, and the
/// degenerate cases below map onto the bound, so aggregates never see an
/// infinite or NaN ratio.
pub const RATIO_CAP: f64 = 1_000.0;

/// How the ratios of a year were obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RatioStatus {
    /// Both ratios computed directly.
    #[default]
    Normal,
    /// EBITDA was zero, negative or non-finite: coverage is set to 0,
    /// leverage to [`RATIO_CAP`], and both count as breached.
    DegenerateEbitda,
    /// Interest expense was zero: coverage is set to [`RATIO_CAP`] and is
    /// not breached; leverage is computed normally.
    NoInterest,
}

impl RatioStatus {
    /// True for any status other than [`RatioStatus::Normal`].
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self != Self::Normal
    }
}

/// Output of [`assess_ratios`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioAssessment {
    /// EBITDA / interest expense.
    pub coverage: f64,
    /// Debt / EBITDA.
    pub leverage: f64,
    /// Coverage below the floor.
    pub coverage_breach: bool,
    /// Leverage above the ceiling.
    pub leverage_breach: bool,
    /// Policy branch taken.
    pub status: RatioStatus,
}

impl RatioAssessment {
    /// Either threshold violated.
    #[inline]
    pub fn breach(&self) -> bool {
        self.coverage_breach || self.leverage_breach
    }
}

/// Computes interest coverage and leverage for one year.
///
/// The policy is applied in order:
///
/// 1. `ebitda <= 0` or non-finite: [`RatioStatus::DegenerateEbitda`],
///    automatic breach of both thresholds.
/// 2. `interest <= 0`: [`RatioStatus::NoInterest`], coverage is unbounded
///    and never a breach.
/// 3. Otherwise both ratios are computed.
///
/// Breaches are decided on the uncapped ratios; the stored `coverage` and
/// `leverage` are clamped to [`RATIO_CAP`] so they stay finite.
///
/// # Examples
///
/// ```rust
/// use rating_core::types::{assess_ratios, RatioStatus};
///
/// let normal = assess_ratios(180.0, 30.0, 600.0, 2.5, 4.0);
/// assert_eq!(normal.status, RatioStatus::Normal);
/// assert!((normal.coverage - 6.0).abs() < 1e-12);
/// assert!(!normal.breach());
///
/// let degenerate = assess_ratios(0.0, 30.0, 600.0, 2.5, 4.0);
/// assert_eq!(degenerate.status, RatioStatus::DegenerateEbitda);
/// assert!(degenerate.breach());
/// assert!(degenerate.leverage.is_finite());
/// ```
pub fn assess_ratios(
    ebitda: f64,
    interest: f64,
    debt: f64,
    coverage_floor: f64,
    leverage_ceiling: f64,
) -> RatioAssessment {
    if !ebitda.is_finite() || ebitda <= 0.0 {
        return RatioAssessment {
            coverage: 0.0,
            leverage: RATIO_CAP,
            coverage_breach: true,
            leverage_breach: true,
            status: RatioStatus::DegenerateEbitda,
        };
    }

    // thresholds are tested on the raw ratios; only the stored values are capped
    let raw_leverage = debt / ebitda;
    let leverage_breach = raw_leverage > leverage_ceiling;
    let leverage = raw_leverage.clamp(-RATIO_CAP, RATIO_CAP);

    if !interest.is_finite() || interest <= 0.0 {
        return RatioAssessment {
            coverage: RATIO_CAP,
            leverage,
            coverage_breach: false,
            leverage_breach,
            status: RatioStatus::NoInterest,
        };
    }

    let raw_coverage = ebitda / interest;
    RatioAssessment {
        coverage: raw_coverage.clamp(-RATIO_CAP, RATIO_CAP),
        leverage,
        coverage_breach: raw_coverage < coverage_floor,
        leverage_breach,
        status: RatioStatus::Normal,
    }
}

/// Financial state of one simulated year.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearState {
    /// 1-based year within the horizon.
    pub year: usize,
    /// Revenue at year end.
    pub revenue: f64,
    /// Effective growth applied this year.
    pub growth: f64,
    /// Effective EBITDA margin.
    pub margin: f64,
    /// Revenue times margin.
    pub ebitda: f64,
    /// Interest on the opening debt balance.
    pub interest: f64,
    /// Opening debt balance.
    pub debt: f64,
    /// EBITDA / interest.
    pub coverage: f64,
    /// Debt / EBITDA.
    pub leverage: f64,
    /// Coverage below the floor.
    pub coverage_breach: bool,
    /// Leverage above the ceiling.
    pub leverage_breach: bool,
    /// Either threshold violated.
    pub breach: bool,
    /// Leakage has occurred on or before this year.
    pub leak_active: bool,
    /// Severity actually subtracted this year (after lag and mitigation).
    pub effective_severity: f64,
    /// Ratio policy branch.
    pub ratio_status: RatioStatus,
}

impl YearState {
    /// Assembles a year from its financials, applying [`assess_ratios`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_financials(
        year: usize,
        revenue: f64,
        growth: f64,
        margin: f64,
        interest: f64,
        debt: f64,
        coverage_floor: f64,
        leverage_ceiling: f64,
    ) -> Self {
        let ebitda = revenue * margin;
        let ratios = assess_ratios(ebitda, interest, debt, coverage_floor, leverage_ceiling);
        Self {
            year,
            revenue,
            growth,
            margin,
            ebitda,
            interest,
            debt,
            coverage: ratios.coverage,
            leverage: ratios.leverage,
            coverage_breach: ratios.coverage_breach,
            leverage_breach: ratios.leverage_breach,
            breach: ratios.breach(),
            leak_active: false,
            effective_severity: 0.0,
            ratio_status: ratios.status,
        }
    }

    /// Marks the leakage state of this year.
    #[inline]
    pub fn with_leakage(mut self, leak_active: bool, effective_severity: f64) -> Self {
        self.leak_active = leak_active;
        self.effective_severity = effective_severity;
        self
    }
}
