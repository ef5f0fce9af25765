use crate::error::{DecoderError, Result};
use serde::{Deserialize, Serialize};

/// Hyper-parameters of the decoder.
///
/// A config is plain data; call [`ModelConfig::validate`] (or build a pipeline, which does it for
/// you) before relying on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub num_layers: usize,
    pub num_heads: usize,
    pub embed_dim: usize,
    pub ffn_dim: usize,
    pub max_seq_length: usize,
    pub vocab_size: usize,
    pub dropout: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl ModelConfig {
    /// Four layers of four heads over 256-wide embeddings and a 128-entry vocabulary.
    pub fn reference() -> Self {
        Self {
            num_layers: 4,
            num_heads: 4,
            embed_dim: 256,
            ffn_dim: 512,
            max_seq_length: 128,
            vocab_size: 128,
            dropout: 0.1,
        }
    }

    /// A single small layer, for tests and quick runs.
    pub fn tiny() -> Self {
        Self {
            num_layers: 1,
            num_heads: 2,
            embed_dim: 4,
            ffn_dim: 8,
            max_seq_length: 16,
            vocab_size: 5,
            dropout: 0.0,
        }
    }

    /// Width of each attention head.
    pub fn head_dim(&self) -> usize {
        self.embed_dim.checked_div(self.num_heads).unwrap_or(0)
    }

    /// Number of weights a pipeline built from this config samples.
    pub fn num_parameters(&self) -> usize {
        let embedding = self.vocab_size * self.embed_dim;
        // W1, b1, W2, b2
        let per_layer = self.embed_dim * self.ffn_dim
            + self.ffn_dim
            + self.ffn_dim * self.embed_dim
            + self.embed_dim;
        let projection = self.embed_dim * self.vocab_size;
        embedding + self.num_layers * per_layer + projection
    }

    /// Checks every field against its legal range.
    ///
    /// `num_layers` may be zero; the pipeline then normalizes and projects the embeddings
    /// directly.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("num_heads", self.num_heads),
            ("embed_dim", self.embed_dim),
            ("ffn_dim", self.ffn_dim),
            ("max_seq_length", self.max_seq_length),
            ("vocab_size", self.vocab_size),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(DecoderError::ConfigurationInvalid(format!(
                    "{name} must be greater than zero"
                )));
            }
        }

        if self.embed_dim % self.num_heads != 0 {
            return Err(DecoderError::ConfigurationInvalid(format!(
                "embed_dim ({}) must be divisible by num_heads ({})",
                self.embed_dim, self.num_heads
            )));
        }

        if !(0.0..1.0).contains(&self.dropout) {
            return Err(DecoderError::ConfigurationInvalid(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }

        Ok(())
    }
}
