use crate::matrix::ops::PARALLEL_THRESHOLD;
use crate::matrix::{Matrix, Scalar, scalar};
use rayon::prelude::*;

/// Default `eps` added to the variance before the square root.
pub const DEFAULT_EPS: f64 = 1e-5;

/// Layer Normalization without learned parameters.
///
/// Each row is shifted to zero mean and scaled to unit variance:
/// `y = (x - mean) / sqrt(var + eps)`, where `var` is the biased (divide by N) variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerNorm<T: Scalar> {
    pub eps: T,
}

impl<T: Scalar> Default for LayerNorm<T> {
    fn default() -> Self {
        Self::new(scalar(DEFAULT_EPS))
    }
}

impl<T: Scalar> LayerNorm<T> {
    pub fn new(eps: T) -> Self {
        Self { eps }
    }

    /// Normalizes every row of `x` independently.
    pub fn forward(&self, x: &Matrix<T>) -> Matrix<T> {
        let cols = x.cols();
        let mut out = x.clone();
        if cols == 0 {
            return out;
        }

        let n: T = scalar(cols as f64);
        let eps = self.eps;
        let normalize = |row: &mut [T]| {
            let mut sum = T::zero();
            for &val in row.iter() {
                sum += val;
            }
            let mean = sum / n;

            let mut sum_sq_diff = T::zero();
            for &val in row.iter() {
                let diff = val - mean;
                sum_sq_diff += diff * diff;
            }
            let var = sum_sq_diff / n;
            let rstd = T::one() / (var + eps).sqrt();

            for val in row.iter_mut() {
                *val = (*val - mean) * rstd;
            }
        };

        if out.data().len() >= PARALLEL_THRESHOLD {
            out.data_mut().par_chunks_mut(cols).for_each(normalize);
        } else {
            out.data_mut().chunks_mut(cols).for_each(normalize);
        }
        out
    }
}

/// Shorthand for `LayerNorm::new(eps).forward(x)`.
pub fn layer_norm<T: Scalar>(x: &Matrix<T>, eps: T) -> Matrix<T> {
    LayerNorm::new(eps).forward(x)
}
