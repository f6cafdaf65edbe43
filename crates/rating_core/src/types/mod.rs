//! Per-year and per-path record types.
//!
//! - [`YearState`]: one simulated year of financials and ratio checks
//! - [`Path`]: one completed Monte Carlo trial
//! - [`assess_ratios`]: the fixed policy turning EBITDA, interest and debt
//!   into finite coverage and leverage figures

mod path;
mod year;

pub use path::{DowngradeStatus, LeakageEvent, Path, Trajectory};
pub use year::{assess_ratios, RatioAssessment, RatioStatus, YearState, RATIO_CAP};
