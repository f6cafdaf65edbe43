//! Seeded pseudo-random stream wrapper for Monte Carlo trials.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Stream index reserved for choosing which paths a scenario retains.
///
/// Trial streams use indices `0..N`, so the sample stream sits at the top
/// of the index space.
pub const SAMPLE_STREAM: u64 = u64::MAX;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derives the seed of stream `index` from a base seed.
///
/// # Examples
///
/// ```rust
/// use rating_core::rng::derive_seed;
///
/// assert_eq!(derive_seed(42, 3), derive_seed(42, 3));
/// assert_ne!(derive_seed(42, 3), derive_seed(42, 4));
/// assert_ne!(derive_seed(42, 3), derive_seed(43, 3));
/// ```
#[inline]
pub fn derive_seed(base_seed: u64, index: u64) -> u64 {
    splitmix64(base_seed ^ splitmix64(index))
}

/// Random stream owned by a single trial.
///
/// Wraps [`StdRng`]; normal variates use the Ziggurat sampler of
/// `rand_distr::StandardNormal`.
pub struct TrialRng {
    inner: StdRng,
    seed: u64,
}

impl TrialRng {
    /// Creates a stream initialised directly with `seed`.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates the stream of trial `trial` under `base_seed`.
    #[inline]
    pub fn for_trial(base_seed: u64, trial: usize) -> Self {
        Self::from_seed(derive_seed(base_seed, trial as u64))
    }

    /// Creates an auxiliary stream under `base_seed`, such as
    /// [`SAMPLE_STREAM`].
    #[inline]
    pub fn for_stream(base_seed: u64, stream: u64) -> Self {
        Self::from_seed(derive_seed(base_seed, stream))
    }

    /// Returns the seed this stream was initialised with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform variate in [0, 1).
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Standard normal variate (mean 0, std 1).
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Normal variate with the given mean and standard deviation.
    ///
    /// Always consumes exactly one standard normal draw, including when
    /// `std_dev` is zero.
    #[inline]
    pub fn gen_normal_with(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.gen_normal()
    }

    /// Uniform index in `0..n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    #[inline]
    pub fn gen_index(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }

    /// Mutable access to the underlying generator, for `rand` helpers such
    /// as `rand::seq::index::sample`.
    #[inline]
    pub fn as_rng_mut(&mut self) -> &mut StdRng {
        &mut self.inner
    }
}
