use crate::{KernelElem, PARALLEL_THRESHOLD};
use num_traits::Float;
use rayon::prelude::*;

/// Numerically stable softmax over a single row, in place.
///
/// The row maximum is subtracted before exponentiation. Entries equal to `-inf` come out as
/// exactly zero. An empty row is left as is.
pub fn cpu_softmax_row<T>(row: &mut [T])
where
    T: KernelElem + Float,
{
    if row.is_empty() {
        return;
    }

    let max = row.iter().copied().fold(T::neg_infinity(), T::max);
    // A fully masked row has no finite maximum; leave the exponent at zero.
    let shift = if max.is_finite() { max } else { T::zero() };

    let mut sum = T::zero();
    for val in row.iter_mut() {
        *val = (*val - shift).exp();
        sum += *val;
    }
    for val in row.iter_mut() {
        *val /= sum;
    }
}

/// Applies [`cpu_softmax_row`] to every `cols`-wide row of a row-major buffer.
pub fn cpu_softmax_rows<T>(data: &mut [T], cols: usize)
where
    T: KernelElem + Float,
{
    if cols == 0 {
        return;
    }
    if data.len() >= PARALLEL_THRESHOLD {
        data.par_chunks_mut(cols).for_each(cpu_softmax_row);
    } else {
        data.chunks_mut(cols).for_each(cpu_softmax_row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_row_sums_to_one() {
        let mut row = vec![1.0f64, 2.0, 3.0];
        cpu_softmax_row(&mut row);

        // e^-2, e^-1, e^0 normalised
        let denom = (-2.0f64).exp() + (-1.0f64).exp() + 1.0;
        assert!((row[2] - 1.0 / denom).abs() < 1e-12);
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_large_values_do_not_overflow() {
        let mut row = vec![1000.0f32, 1000.0];
        cpu_softmax_row(&mut row);
        assert!((row[0] - 0.5).abs() < 1e-6);
        assert!((row[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_masked_entries_are_zero() {
        let mut row = vec![0.5f64, f64::NEG_INFINITY, f64::NEG_INFINITY];
        cpu_softmax_row(&mut row);
        assert_eq!(row, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_softmax_rows() {
        let mut data = vec![0.0f64, 0.0, 5.0, 5.0];
        cpu_softmax_rows(&mut data, 2);
        assert_eq!(data, vec![0.5, 0.5, 0.5, 0.5]);
    }
}
