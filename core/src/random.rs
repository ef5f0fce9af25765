//! Sources of randomness for weight sampling and dropout masks.
//!
//! Nothing in the crate reaches for a global RNG. Every function that needs randomness takes a
//! `&mut impl RandomSource`, so a seeded [`StdRandom`] gives reproducible runs and a
//! [`ReplaySource`] gives fully scripted ones.

use crate::matrix::{Matrix, Scalar, scalar};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Returns a sample drawn uniformly from `[-1, 1)`.
    fn uniform(&mut self) -> f64;

    /// Returns `true` with probability `p`.
    fn bernoulli(&mut self, p: f64) -> bool;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        (**self).bernoulli(p)
    }
}

/// `RandomSource` backed by `rand`'s standard generator.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// A generator whose output is fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for StdRandom {
    fn uniform(&mut self) -> f64 {
        self.rng.random_range(-1.0..1.0)
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }
}

/// Replays fixed values instead of drawing random ones. Used to pin down weights in tests.
///
/// `uniform` cycles through `values` (or returns `0.0` if there are none). `bernoulli` cycles
/// through the keep pattern; with no pattern it answers `p > 0.5`.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    values: Vec<f64>,
    pattern: Vec<bool>,
    next_value: usize,
    next_flag: usize,
}

impl ReplaySource {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn with_pattern(mut self, pattern: Vec<bool>) -> Self {
        self.pattern = pattern;
        self
    }
}

impl RandomSource for ReplaySource {
    fn uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next_value % self.values.len()];
        self.next_value += 1;
        v
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        if self.pattern.is_empty() {
            return p > 0.5;
        }
        let flag = self.pattern[self.next_flag % self.pattern.len()];
        self.next_flag += 1;
        flag
    }
}

/// Samples a `[rows, cols]` matrix with entries uniform in `[-1, 1)` scaled by `1 / sqrt(cols)`.
///
/// Entries are drawn in row-major order.
pub fn random_matrix<T: Scalar>(
    rows: usize,
    cols: usize,
    rng: &mut impl RandomSource,
) -> Matrix<T> {
    let mut out = Matrix::zeros([rows, cols]);
    if cols == 0 {
        return out;
    }
    let scale = 1.0 / (cols as f64).sqrt();
    for val in out.data_mut() {
        *val = scalar(rng.uniform() * scale);
    }
    out
}
