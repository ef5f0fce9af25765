//! CPU kernels for `decoder-rs`.
//!
//! Every kernel works on flat, row-major buffers plus an explicit `[rows, cols]` shape.
//! Keeping them free of the `Matrix` type lets the core crate swap in a BLAS-backed
//! implementation without touching the layers above.

use num_traits::{FromPrimitive, Num, NumAssign, ToPrimitive};
use std::fmt::Debug;
use thiserror::Error;

pub mod cpu_matmul;
pub mod cpu_softmax;
pub mod cpu_transpose;

pub use cpu_matmul::cpu_matmul;
pub use cpu_softmax::{cpu_softmax_row, cpu_softmax_rows};
pub use cpu_transpose::cpu_transpose;

/// Below this many output elements the kernels stay on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 4096;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("{op}: shape mismatch, expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Trait bound for elements that can be processed by kernels.
/// This mirrors `Scalar` in the core crate without depending on it.
pub trait KernelElem:
    Num + NumAssign + Copy + Clone + Debug + Send + Sync + FromPrimitive + ToPrimitive + PartialOrd
{
}

impl<T> KernelElem for T where
    T: Num
        + NumAssign
        + Copy
        + Clone
        + Debug
        + Send
        + Sync
        + FromPrimitive
        + ToPrimitive
        + PartialOrd
{
}

/// Checks that a buffer holds exactly `rows * cols` elements.
pub(crate) fn check_len<T>(op: &'static str, data: &[T], shape: &[usize; 2]) -> Result<()> {
    let size = shape[0] * shape[1];
    if data.len() != size {
        return Err(KernelError::ShapeMismatch {
            op,
            expected: vec![size],
            got: vec![data.len()],
        });
    }
    Ok(())
}
