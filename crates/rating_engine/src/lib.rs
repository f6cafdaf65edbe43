//! # rating_engine: Monte Carlo Downgrade Engine
//!
//! ## Layer Role
//!
//! rating_engine sits on top of `rating_core` and carries all of the model's
//! simulation logic:
//!
//! 1. [`generator`]: one stochastic trajectory of growth, margin, EBITDA,
//!    interest and debt, optionally eroded by a leakage event
//! 2. [`detector`]: the consecutive-breach downgrade rule
//! 3. [`scenario`]: `N` independent trials aggregated into a
//!    [`ScenarioResult`]
//! 4. [`sweep`]: one scenario per value of a swept parameter
//! 5. [`report`]: flat summary rows for external writers
//!
//! ## Usage Example
//!
//! ```rust
//! use rating_core::params::SimulationParameters;
//! use rating_engine::run_sweep;
//!
//! let params = SimulationParameters::builder().n_trials(500).build().unwrap();
//! let sweep = run_sweep(&params, &[0.05, 0.20, 0.35]).unwrap();
//!
//! for row in sweep.rows() {
//!     println!("{:.2} -> {:.3}", row.severity, row.downgrade_probability);
//! }
//!
//! let examples = sweep.sample_paths(0.20).unwrap();
//! let timing = sweep.downgrade_years(0.20).unwrap();
//! # assert!(!examples.is_empty());
//! # assert!(timing.len() <= 500);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Run trials on the rayon thread pool. Results are
//!   identical with and without it.
//! - `serde`: Serialisation for summary rows and sweep axes

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod detector;
pub mod generator;
pub mod report;
pub mod scenario;
pub mod sweep;

pub use detector::DowngradeDetector;
pub use generator::PathGenerator;
pub use report::SummaryRow;
pub use scenario::{run_scenario, simulate_trial, ScenarioResult, ScenarioRunner};
pub use sweep::{linspace, run_parameter_sweep, run_sweep, SweepAxis, SweepEntry, SweepResult};
