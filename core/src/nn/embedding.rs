use crate::error::{DecoderError, Result};
use crate::matrix::{Matrix, Scalar};
use crate::random::{RandomSource, random_matrix};

/// Token embedding table of shape `[vocab_size, embed_dim]`.
///
/// Lookups wrap: token `t` reads row `t % vocab_size`, so IDs outside the vocabulary are still
/// accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding<T: Scalar> {
    pub weight: Matrix<T>,
}

impl<T: Scalar> Embedding<T> {
    pub fn new(weight: Matrix<T>) -> Self {
        Self { weight }
    }

    pub fn random(vocab_size: usize, embed_dim: usize, rng: &mut impl RandomSource) -> Self {
        Self::new(random_matrix(vocab_size, embed_dim, rng))
    }

    pub fn vocab_size(&self) -> usize {
        self.weight.rows()
    }

    pub fn embed_dim(&self) -> usize {
        self.weight.cols()
    }

    /// Gathers one table row per token into a `[tokens.len(), embed_dim]` matrix.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationInvalid` if the table has no rows and `tokens` is not empty.
    pub fn forward(&self, tokens: &[usize]) -> Result<Matrix<T>> {
        let vocab_size = self.vocab_size();
        let embed_dim = self.embed_dim();
        if vocab_size == 0 && !tokens.is_empty() {
            return Err(DecoderError::ConfigurationInvalid(
                "embedding table has no rows".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(tokens.len() * embed_dim);
        for &token in tokens {
            data.extend_from_slice(self.weight.row(token % vocab_size));
        }
        Matrix::new(data, [tokens.len(), embed_dim])
    }
}
