//! End-to-end forward pass.
//!
//! ```text
//! tokens ─► truncate ─► embed ─► + positions ─► layer × N ─► LayerNorm ─► · projection ─► softmax
//! ```
//!
//! The output has one row per (kept) input position and one column per vocabulary entry; each
//! row is a probability distribution.

use crate::error::Result;
use crate::matrix::{Matrix, Scalar};
use crate::model::{ModelConfig, TransformerLayer};
use crate::nn::{Embedding, LayerNorm, Mode, positional_encoding};
use crate::random::{RandomSource, StdRandom, random_matrix};
use crate::tokenizer::string_to_tokens;
use tracing::{debug, info};

/// A fully materialized decoder: embedding table, layers and vocabulary projection.
///
/// Weights are sampled once in [`ForwardPipeline::random`] and reused by every call to
/// [`ForwardPipeline::forward`].
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPipeline<T: Scalar> {
    config: ModelConfig,
    pub embedding: Embedding<T>,
    pub layers: Vec<TransformerLayer<T>>,
    pub final_norm: LayerNorm<T>,
    /// `[embed_dim, vocab_size]`
    pub projection: Matrix<T>,
}

impl<T: Scalar> ForwardPipeline<T> {
    /// Validates `config` and samples every weight.
    ///
    /// Draw order: embedding table, then `W1` and `W2` of each layer, then the projection.
    pub fn random(config: &ModelConfig, rng: &mut impl RandomSource) -> Result<Self> {
        config.validate()?;

        let embedding = Embedding::random(config.vocab_size, config.embed_dim, rng);
        let layers = (0..config.num_layers)
            .map(|_| {
                TransformerLayer::random(
                    config.num_heads,
                    config.embed_dim,
                    config.ffn_dim,
                    config.dropout,
                    rng,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        let projection = random_matrix(config.embed_dim, config.vocab_size, rng);

        debug!(
            num_layers = config.num_layers,
            num_parameters = config.num_parameters(),
            "sampled decoder weights"
        );

        Ok(Self {
            config: config.clone(),
            embedding,
            layers,
            final_norm: LayerNorm::default(),
            projection,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Computes next-token probabilities for every position of `tokens`.
    ///
    /// Only the first `max_seq_length` tokens are used. The result has shape
    /// `[min(tokens.len(), max_seq_length), vocab_size]`.
    #[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len(), mode = ?mode))]
    pub fn forward(
        &self,
        tokens: &[usize],
        mode: Mode,
        rng: &mut impl RandomSource,
    ) -> Result<Matrix<T>> {
        let tokens = &tokens[..tokens.len().min(self.config.max_seq_length)];
        let seq_len = tokens.len();

        let embedded = self.embedding.forward(tokens)?;
        let positions = positional_encoding(seq_len, self.config.embed_dim);
        let mut hidden = (&embedded + &positions)?;

        for (index, layer) in self.layers.iter().enumerate() {
            hidden = layer.forward(&hidden, mode, rng)?;
            debug!(layer = index, "layer done");
        }

        let hidden = self.final_norm.forward(&hidden);
        let mut probs = hidden.matmul(&self.projection)?;
        probs.softmax_rows();
        Ok(probs)
    }
}

/// Runs one forward pass over freshly sampled weights using the given source.
pub fn forward_pass_with<T: Scalar>(
    tokens: &[usize],
    config: &ModelConfig,
    mode: Mode,
    rng: &mut impl RandomSource,
) -> Result<Matrix<T>> {
    let pipeline = ForwardPipeline::random(config, rng)?;
    pipeline.forward(tokens, mode, rng)
}

/// Runs one forward pass over fresh OS-seeded weights with dropout active.
///
/// Every call samples a new model, so repeated calls give different distributions.
pub fn forward_pass<T: Scalar>(tokens: &[usize], config: &ModelConfig) -> Result<Matrix<T>> {
    let mut rng = StdRandom::from_entropy();
    forward_pass_with(tokens, config, Mode::Train, &mut rng)
}

/// Tokenizes `text` by code point and runs [`forward_pass`].
pub fn forward_text<T: Scalar>(text: &str, config: &ModelConfig) -> Result<Matrix<T>> {
    let tokens = string_to_tokens(text);
    info!(chars = tokens.len(), "running forward pass on text");
    forward_pass(&tokens, config)
}
