use crate::error::Result;
use crate::matrix::{Matrix, Scalar};
use crate::nn::{Activation, Linear};
use crate::random::RandomSource;

/// Position-wise feed-forward block: `ReLU(x · W1 + b1) · W2 + b2`.
///
/// `up` maps `embed_dim -> ffn_dim`, `down` maps back to `embed_dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedForward<T: Scalar> {
    pub up: Linear<T>,
    pub down: Linear<T>,
}

impl<T: Scalar> FeedForward<T> {
    pub fn new(up: Linear<T>, down: Linear<T>) -> Self {
        Self { up, down }
    }

    /// Samples `W1` and then `W2`, both with zero biases.
    pub fn random(embed_dim: usize, ffn_dim: usize, rng: &mut impl RandomSource) -> Self {
        let up = Linear::random(embed_dim, ffn_dim, rng);
        let down = Linear::random(ffn_dim, embed_dim, rng);
        Self { up, down }
    }

    pub fn num_parameters(&self) -> usize {
        self.up.num_parameters() + self.down.num_parameters()
    }

    pub fn forward(&self, x: &Matrix<T>) -> Result<Matrix<T>> {
        let hidden = self.up.forward(x)?;
        let hidden = Activation::relu(&hidden);
        self.down.forward(&hidden)
    }
}

/// Applies a freshly sampled feed-forward block to `input`.
///
/// Each call draws new weights, so two calls on the same input generally disagree.
pub fn feed_forward<T: Scalar>(
    input: &Matrix<T>,
    ffn_dim: usize,
    rng: &mut impl RandomSource,
) -> Result<Matrix<T>> {
    FeedForward::random(input.cols(), ffn_dim, rng).forward(input)
}
