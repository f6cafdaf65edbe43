//! # Random Number Streams
//!
//! Every Monte Carlo trial draws from its own seeded stream. Streams are
//! derived from a single base seed and a stream index by SplitMix64 mixing,
//! so that:
//!
//! - **Reproducibility**: the same `(seed, index)` pair always yields the
//!   same sequence, independent of thread scheduling.
//! - **Independence**: neighbouring indices produce unrelated streams, so
//!   trials never share draws.
//! - **No shared state**: [`TrialRng`] is not `Clone` and there is no
//!   global generator; a stream is owned by exactly one trial.
//!
//! ## Usage Example
//!
//! ```rust
//! use rating_core::rng::TrialRng;
//!
//! let mut first = TrialRng::for_trial(42, 0);
//! let mut again = TrialRng::for_trial(42, 0);
//! assert_eq!(first.gen_normal(), again.gen_normal());
//!
//! let u = first.gen_uniform();
//! assert!((0.0..1.0).contains(&u));
//! ```

mod prng;

pub use prng::{derive_seed, TrialRng, SAMPLE_STREAM};
