//! # decoder-rs
//!
//! `decoder-rs` runs the forward pass of a small decoder-only transformer on the CPU.
//! Weights are sampled from a random source rather than loaded from a checkpoint, so the
//! output is a well-formed probability distribution per position but not a real prediction.
//!
//! ## Modules
//!
//! - [`mod@matrix`]: Row-major 2-D matrices and the linear algebra the model needs.
//! - [`nn`]: Layer building blocks (layer norm, positional encoding, attention, feed-forward, dropout).
//! - [`model`]: Configuration, the transformer layer, and the end-to-end forward pipeline.
//! - [`random`]: Injectable randomness used for weight sampling and dropout masks.
//! - [`tokenizer`]: Code point tokenization of raw text.
//!
//! ## Example
//!
//! ```rust
//! use decoder_rs::model::{ModelConfig, forward_pass_with};
//! use decoder_rs::nn::Mode;
//! use decoder_rs::random::StdRandom;
//!
//! let config = ModelConfig::tiny();
//! let mut rng = StdRandom::seeded(7);
//! let probs = forward_pass_with::<f64>(&[1, 2, 3], &config, Mode::Eval, &mut rng).unwrap();
//!
//! assert_eq!(probs.shape(), &[3, config.vocab_size]);
//! for row in probs.iter_rows() {
//!     assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-6);
//! }
//! ```

/// Macro for creating a [`Matrix`](matrix::Matrix) with a compile-time size check.
///
/// # Examples
///
/// ```rust
/// use decoder_rs::matrix;
///
/// let m = matrix!([1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]);
/// assert_eq!(m.shape(), &[2, 3]);
///
/// // Fails to compile:
/// // let m = matrix!([1.0, 2.0, 3.0], [2, 2]);
/// ```
#[macro_export]
macro_rules! matrix {
    ($data:expr, [$rows:expr, $cols:expr]) => {{
        const DATA_LEN: usize = (&$data as &[_]).len();
        const _: () = assert!(
            DATA_LEN == $rows * $cols,
            "matrix!: data length does not match rows * cols"
        );

        // Length was checked above.
        $crate::matrix::Matrix::new($data.to_vec(), [$rows, $cols]).unwrap()
    }};
}

pub mod error;
pub mod matrix;
pub mod model;
pub mod nn;
pub mod random;
pub mod tokenizer;

pub use error::{DecoderError, Result};
pub use matrix::{Matrix, Scalar};
pub use model::{ForwardPipeline, ModelConfig, forward_pass, forward_pass_with, forward_text};
pub use random::{RandomSource, ReplaySource, StdRandom};
