use crate::{KernelElem, KernelError, PARALLEL_THRESHOLD, Result, check_len};
use rayon::prelude::*;

/// CPU matrix multiplication: `[m, k] x [k, n] -> [m, n]`.
///
/// The right-hand side is transposed first so that both operands of every dot product are
/// read sequentially. Output rows are computed independently (in parallel once the output is
/// large enough); each element is accumulated in a fixed order, so the result does not depend
/// on the number of threads.
///
/// To move onto BLAS, replace the body with an `sgemm`/`dgemm` call in row-major mode.
pub fn cpu_matmul<T>(
    lhs_data: &[T],
    rhs_data: &[T],
    lhs_shape: &[usize; 2],
    rhs_shape: &[usize; 2],
) -> Result<Vec<T>>
where
    T: KernelElem,
{
    let [m, k] = *lhs_shape;
    let [k2, n] = *rhs_shape;

    if k != k2 {
        return Err(KernelError::ShapeMismatch {
            op: "matmul",
            expected: vec![k, n],
            got: vec![k2, n],
        });
    }
    check_len("matmul", lhs_data, lhs_shape)?;
    check_len("matmul", rhs_data, rhs_shape)?;

    let mut out_data = vec![T::zero(); m * n];
    if m == 0 || n == 0 {
        return Ok(out_data);
    }

    // rhs is [K, N], rhs_t is [N, K]
    let rhs_t_data = super::cpu_transpose::cpu_transpose(rhs_data, rhs_shape)?;

    let row_kernel = |(row, out_row): (usize, &mut [T])| {
        let a_slice = &lhs_data[row * k..(row + 1) * k];
        for (col, out_elem) in out_row.iter_mut().enumerate() {
            let b_slice = &rhs_t_data[col * k..(col + 1) * k];
            let mut sum = T::zero();
            for (&val_a, &val_b) in a_slice.iter().zip(b_slice.iter()) {
                sum += val_a * val_b;
            }
            *out_elem = sum;
        }
    };

    if m * n * k.max(1) >= PARALLEL_THRESHOLD {
        out_data.par_chunks_mut(n).enumerate().for_each(row_kernel);
    } else {
        out_data.chunks_mut(n).enumerate().for_each(row_kernel);
    }

    Ok(out_data)
}
