use crate::{KernelElem, PARALLEL_THRESHOLD, Result, check_len};
use rayon::prelude::*;

/// Transposes a `[rows, cols]` row-major buffer into a `[cols, rows]` one.
///
/// Work is split over rows of the output, so each task gathers one input column.
pub fn cpu_transpose<T>(data: &[T], shape: &[usize; 2]) -> Result<Vec<T>>
where
    T: KernelElem,
{
    check_len("transpose", data, shape)?;
    let [m, n] = *shape;

    let mut out_data = vec![T::zero(); m * n];
    if m == 0 || n == 0 {
        return Ok(out_data);
    }

    // Output row `col` is input column `col`.
    let gather = |(col, out_row): (usize, &mut [T])| {
        for (r, out_elem) in out_row.iter_mut().enumerate() {
            *out_elem = data[r * n + col];
        }
    };

    if out_data.len() >= PARALLEL_THRESHOLD {
        out_data.par_chunks_mut(m).enumerate().for_each(gather);
    } else {
        out_data.chunks_mut(m).enumerate().for_each(gather);
    }

    Ok(out_data)
}
