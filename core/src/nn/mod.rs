//! Neural network building blocks.
//!
//! Every layer maps a `[seq_len, width]` matrix to another one, row by row unless noted:
//!
//! - [`LayerNorm`]: zero mean, unit variance per row.
//! - [`positional_encoding`]: the fixed sinusoidal table added after embedding.
//! - [`self_attention`]: causal multi-head attention, the only layer that mixes rows.
//! - [`FeedForward`]: two [`Linear`] projections with a ReLU between them.
//! - [`Dropout`]: inverted dropout, active only in [`Mode::Train`].

pub mod activation;
pub mod attention;
pub mod dropout;
pub mod embedding;
pub mod feed_forward;
pub mod linear;
pub mod norm;
pub mod positional;

pub use activation::{Activation, relu};
pub use attention::{apply_causal_mask, causal_mask, self_attention};
pub use dropout::{Dropout, Mode, dropout};
pub use embedding::Embedding;
pub use feed_forward::{FeedForward, feed_forward};
pub use linear::Linear;
pub use norm::{LayerNorm, layer_norm};
pub use positional::positional_encoding;
