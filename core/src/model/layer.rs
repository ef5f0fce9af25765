use crate::error::Result;
use crate::matrix::{Matrix, Scalar};
use crate::nn::{Dropout, FeedForward, LayerNorm, Mode, self_attention};
use crate::random::RandomSource;

/// One decoder layer (post-norm):
///
/// ```text
/// h   = LayerNorm(x + Attention(x, x, x))
/// out = Dropout(LayerNorm(h + FeedForward(h)))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransformerLayer<T: Scalar> {
    pub num_heads: usize,
    pub ffn: FeedForward<T>,
    pub norm: LayerNorm<T>,
    pub dropout: Dropout,
}

impl<T: Scalar> TransformerLayer<T> {
    pub fn new(num_heads: usize, ffn: FeedForward<T>, dropout: Dropout) -> Self {
        Self {
            num_heads,
            ffn,
            norm: LayerNorm::default(),
            dropout,
        }
    }

    /// Samples the feed-forward weights for a layer of the given shape.
    pub fn random(
        num_heads: usize,
        embed_dim: usize,
        ffn_dim: usize,
        dropout: f64,
        rng: &mut impl RandomSource,
    ) -> Result<Self> {
        let dropout = Dropout::new(dropout)?;
        let ffn = FeedForward::random(embed_dim, ffn_dim, rng);
        Ok(Self::new(num_heads, ffn, dropout))
    }

    pub fn forward(
        &self,
        x: &Matrix<T>,
        mode: Mode,
        rng: &mut impl RandomSource,
    ) -> Result<Matrix<T>> {
        let attn = self_attention(x, x, x, self.num_heads)?;
        let hidden = self.norm.forward(&(x + &attn)?);

        let ffn = self.ffn.forward(&hidden)?;
        let out = self.norm.forward(&(&hidden + &ffn)?);

        self.dropout.forward(&out, mode, rng)
    }
}
