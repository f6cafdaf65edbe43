//! Flat tabular summaries.
//!
//! One [`SummaryRow`] per scenario, ready for CSV writers and table
//! printers.

/// Summary statistics of one scenario.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SummaryRow {
    /// Name of the swept parameter.
    pub parameter: &'static str,
    /// Value of the swept parameter for this row.
    pub value: f64,
    /// Leakage severity of the scenario.
    pub severity: f64,
    /// Share of paths downgraded at any time in the horizon.
    pub downgrade_probability: f64,
    /// Share of paths downgraded within the headline window.
    pub downgrade_probability_within_window: f64,
    /// Binomial standard error of `downgrade_probability`.
    pub std_error: f64,
    /// Mean triggering year among downgraded paths.
    pub mean_downgrade_year: Option<f64>,
    /// Share of paths on which leakage occurred.
    pub leak_share: f64,
    /// Years resolved by the degenerate-ratio policy.
    pub degenerate_years: usize,
    /// Number of trials.
    pub n_trials: usize,
}

impl SummaryRow {
    /// Column names in serialisation order.
    pub const HEADERS: [&'static str; 10] = [
        "parameter",
        "value",
        "severity",
        "downgrade_probability",
        "downgrade_probability_within_window",
        "std_error",
        "mean_downgrade_year",
        "leak_share",
        "degenerate_years",
        "n_trials",
    ];
}
