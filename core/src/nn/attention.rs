//! Causal multi-head self-attention.
//!
//! Each head `h` works on its own `d_k = embed_dim / num_heads` wide column band of Q, K and V:
//!
//! ```text
//! scores = (Q_h · K_hᵀ) / sqrt(d_k)
//! scores[i][j] = -inf            for j > i   (causal mask)
//! head_h = softmax_rows(scores) · V_h
//! ```
//!
//! Head outputs are concatenated column-wise in head order. There are no Q/K/V or output
//! projections; callers pass the same activations for all three.
//!
//! When `embed_dim` is not a multiple of `num_heads`, the trailing `embed_dim % num_heads`
//! columns belong to no head and are dropped, so the output is `num_heads * d_k` wide.
//! `ModelConfig::validate` rules this case out for full models.

use crate::error::{DecoderError, Result};
use crate::matrix::ops::PARALLEL_THRESHOLD;
use crate::matrix::{Matrix, Scalar, scalar};
use rayon::prelude::*;
use tracing::trace;

/// Returns a `[seq_len, seq_len]` additive mask: `0` on and below the diagonal, `-inf` above it.
pub fn causal_mask<T: Scalar>(seq_len: usize) -> Matrix<T> {
    let mut mask = Matrix::zeros([seq_len, seq_len]);
    apply_causal_mask(&mut mask);
    mask
}

/// Overwrites every entry above the diagonal with `-inf`, so position `i` only sees `j <= i`.
pub fn apply_causal_mask<T: Scalar>(scores: &mut Matrix<T>) {
    let cols = scores.cols();
    if cols == 0 {
        return;
    }
    for (i, row) in scores.data_mut().chunks_mut(cols).enumerate() {
        for val in row.iter_mut().skip(i + 1) {
            *val = T::neg_infinity();
        }
    }
}

/// Runs causal multi-head attention over a single sequence.
///
/// # Errors
///
/// - `ConfigurationInvalid` if `num_heads == 0`.
/// - `DimensionMismatch` if `q`, `k` and `v` do not share one shape, or if the embedding is
///   narrower than `num_heads`.
pub fn self_attention<T: Scalar>(
    q: &Matrix<T>,
    k: &Matrix<T>,
    v: &Matrix<T>,
    num_heads: usize,
) -> Result<Matrix<T>> {
    if num_heads == 0 {
        return Err(DecoderError::ConfigurationInvalid(
            "num_heads must be greater than zero".to_string(),
        ));
    }
    for other in [k, v] {
        if other.shape() != q.shape() {
            return Err(DecoderError::DimensionMismatch {
                op: "attention",
                expected: q.shape().to_vec(),
                got: other.shape().to_vec(),
            });
        }
    }

    let [seq_len, embed_dim] = *q.shape();
    if embed_dim < num_heads {
        return Err(DecoderError::DimensionMismatch {
            op: "attention",
            expected: vec![seq_len, num_heads],
            got: vec![seq_len, embed_dim],
        });
    }

    let head_dim = embed_dim / num_heads;
    let scale = T::one() / scalar::<T>(head_dim as f64).sqrt();
    trace!(seq_len, embed_dim, num_heads, head_dim, "self-attention");

    let run_head = |h: usize| attention_head(q, k, v, h * head_dim, head_dim, scale);
    let heads: Vec<Matrix<T>> = if seq_len * seq_len * num_heads >= PARALLEL_THRESHOLD {
        (0..num_heads)
            .into_par_iter()
            .map(run_head)
            .collect::<Result<_>>()?
    } else {
        (0..num_heads).map(run_head).collect::<Result<_>>()?
    };

    Matrix::hconcat(&heads)
}

/// One head over columns `start..start + head_dim`.
fn attention_head<T: Scalar>(
    q: &Matrix<T>,
    k: &Matrix<T>,
    v: &Matrix<T>,
    start: usize,
    head_dim: usize,
    scale: T,
) -> Result<Matrix<T>> {
    let end = start + head_dim;
    let q_h = q.slice_cols(start, end)?;
    let k_h = k.slice_cols(start, end)?;
    let v_h = v.slice_cols(start, end)?;

    let mut scores = q_h.matmul(&k_h.transpose()?)?.scale(scale);
    apply_causal_mask(&mut scores);
    scores.softmax_rows();

    scores.matmul(&v_h)
}
