//! Activation functions.
//!
//! The feed-forward block uses ReLU, $f(x) = \max(0, x)$, to add non-linearity between its
//! two projections.

use crate::matrix::{Matrix, Scalar};

/// Computes ReLU for a single value. `NaN` passes through unchanged.
pub fn relu<T: Scalar>(x: T) -> T {
    if x < T::zero() { T::zero() } else { x }
}

/// Element-wise activation functions over matrices.
pub struct Activation;

impl Activation {
    pub fn relu<T: Scalar>(x: &Matrix<T>) -> Matrix<T> {
        x.map(relu)
    }
}
