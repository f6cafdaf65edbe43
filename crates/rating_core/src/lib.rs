//! # rating_core: Foundation for the Leakage Downgrade Model
//!
//! ## Layer 1 (Foundation) Role
//!
//! rating_core is the bottom layer of the workspace, providing:
//! - Validated, immutable scenario parameters (`params`)
//! - Per-trial seeded random streams (`rng`)
//! - Year and path record types plus the degenerate-ratio policy (`types`)
//! - The configuration error taxonomy (`error`)
//!
//! It has no dependency on the engine or service crates.
//!
//! ## Usage Example
//!
//! ```rust
//! use rating_core::params::SimulationParameters;
//! use rating_core::rng::TrialRng;
//!
//! let params = SimulationParameters::builder()
//!     .leak_probability(0.3)
//!     .build()
//!     .unwrap();
//!
//! let mut rng = TrialRng::for_trial(params.seed(), 0);
//! let _shock = rng.gen_normal_with(params.base_growth(), params.growth_volatility());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialisation for parameter enums and path types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod params;
pub mod rng;
pub mod types;

pub use error::{Result, SimulationError};
pub use params::{
    BreachRule, DebtPolicy, ImpactProfile, LeakageTiming, SimulationParameters,
    SimulationParametersBuilder,
};
pub use rng::TrialRng;
pub use types::{DowngradeStatus, LeakageEvent, Path, RatioStatus, Trajectory, YearState};
