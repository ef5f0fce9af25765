//! Matrix operations.
//!
//! # Overview
//!
//! - **Element-wise arithmetic**: `&a + &b` and `&a * &b`. Shapes must match exactly; there is
//!   no broadcasting.
//! - **Matrix multiplication and transpose**: delegated to `decoder_rs_kernels`.
//! - **Row softmax**: numerically stable, in place.
//! - **Column slicing and concatenation**: used to split attention heads apart and join them again.
//!
//! # Parallelism
//!
//! Element-wise work runs through `rayon` once a matrix reaches
//! [`PARALLEL_THRESHOLD`] elements. Smaller matrices stay on the calling thread.
//!
//! ```rust
//! use decoder_rs::matrix::Matrix;
//!
//! let a = Matrix::<f32>::new(vec![1.0, 2.0], [1, 2]).unwrap();
//! let b = Matrix::<f32>::new(vec![3.0, 4.0], [1, 2]).unwrap();
//!
//! let c = (&a + &b).unwrap();
//! assert_eq!(c.data(), &[4.0, 6.0]);
//! ```

use super::{Matrix, Scalar};
use crate::error::{DecoderError, Result};
use decoder_rs_kernels::{cpu_matmul, cpu_softmax_row, cpu_softmax_rows, cpu_transpose};
use rayon::prelude::*;
use std::ops::{Add, Mul};

pub use decoder_rs_kernels::PARALLEL_THRESHOLD;

/// Implements an element-wise binary operator for `&Matrix`.
///
/// The output is a fresh matrix; mismatched shapes produce `DimensionMismatch`.
macro_rules! impl_bin_op {
    ($trait:ident, $method:ident) => {
        impl<T: Scalar> $trait for &Matrix<T> {
            type Output = Result<Matrix<T>>;

            fn $method(self, rhs: Self) -> Self::Output {
                if self.shape != rhs.shape {
                    return Err(DecoderError::DimensionMismatch {
                        op: stringify!($method),
                        expected: self.shape.to_vec(),
                        got: rhs.shape.to_vec(),
                    });
                }

                let mut out = Matrix::zeros(self.shape);
                if out.data.len() >= PARALLEL_THRESHOLD {
                    out.data
                        .par_iter_mut()
                        .zip(self.data.par_iter())
                        .zip(rhs.data.par_iter())
                        .for_each(|((o, a), b)| *o = (*a).$method(*b));
                } else {
                    out.data
                        .iter_mut()
                        .zip(self.data.iter())
                        .zip(rhs.data.iter())
                        .for_each(|((o, a), b)| *o = (*a).$method(*b));
                }

                Ok(out)
            }
        }
    };
}

impl_bin_op!(Add, add);
impl_bin_op!(Mul, mul);

/// Numerically stable softmax over one row, in place.
///
/// Invariant to adding a constant to every entry; `-inf` entries become exactly `0`.
pub fn softmax_row<T: Scalar>(row: &mut [T]) {
    cpu_softmax_row(row);
}

impl<T: Scalar> Matrix<T> {
    /// Applies `f` to every element.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync,
    {
        let data = if self.data.len() >= PARALLEL_THRESHOLD {
            self.data.par_iter().map(|&x| f(x)).collect()
        } else {
            self.data.iter().map(|&x| f(x)).collect()
        };
        Self {
            shape: self.shape,
            data,
        }
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` unless `self.cols() == rhs.rows()`.
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        let data = cpu_matmul(&self.data, &rhs.data, &self.shape, &rhs.shape)?;
        Matrix::new(data, [self.rows(), rhs.cols()])
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Result<Self> {
        let data = cpu_transpose(&self.data, &self.shape)?;
        Matrix::new(data, [self.cols(), self.rows()])
    }

    /// Replaces every row with its softmax.
    pub fn softmax_rows(&mut self) {
        let cols = self.cols();
        cpu_softmax_rows(&mut self.data, cols);
    }

    /// Copies columns `start..end` of every row into a new `[rows, end - start]` matrix.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the range is reversed or reaches past `self.cols()`.
    pub fn slice_cols(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.cols() {
            return Err(DecoderError::DimensionMismatch {
                op: "slice_cols",
                expected: vec![self.cols()],
                got: vec![start, end],
            });
        }

        let width = end - start;
        let mut data = Vec::with_capacity(self.rows() * width);
        for row in self.iter_rows() {
            data.extend_from_slice(&row[start..end]);
        }
        Matrix::new(data, [self.rows(), width])
    }

    /// Concatenates matrices side by side, in the order given.
    ///
    /// An empty list gives a `[0, 0]` matrix.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the parts have different row counts.
    pub fn hconcat(parts: &[Self]) -> Result<Self> {
        let Some(first) = parts.first() else {
            return Ok(Matrix::zeros([0, 0]));
        };
        let rows = first.rows();
        if let Some(bad) = parts.iter().find(|p| p.rows() != rows) {
            return Err(DecoderError::DimensionMismatch {
                op: "hconcat",
                expected: vec![rows],
                got: vec![bad.rows()],
            });
        }

        let cols: usize = parts.iter().map(Matrix::cols).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for part in parts {
                data.extend_from_slice(part.row(r));
            }
        }
        Matrix::new(data, [rows, cols])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix;

    #[test]
    fn test_arithmetic() {
        let a = matrix!([1.0, 2.0, 3.0, 4.0], [2, 2]);
        let b = matrix!([5.0, 6.0, 7.0, 8.0], [2, 2]);

        assert_eq!((&a + &b).unwrap().data(), &[6.0, 8.0, 10.0, 12.0]);
        assert_eq!((&a * &b).unwrap().data(), &[5.0, 12.0, 21.0, 32.0]);
    }

    #[test]
    fn test_add_shape_mismatch() {
        let a = Matrix::<f32>::zeros([2, 3]);
        let b = Matrix::<f32>::zeros([3, 2]);
        assert_eq!(
            &a + &b,
            Err(DecoderError::DimensionMismatch {
                op: "add",
                expected: vec![2, 3],
                got: vec![3, 2],
            })
        );
    }

    #[test]
    fn test_add_large_parallel() {
        // 100x50 crosses the parallel threshold.
        let a = Matrix::new(vec![1.5f64; 5000], [100, 50]).unwrap();
        let b = Matrix::new(vec![0.5f64; 5000], [100, 50]).unwrap();
        let c = (&a + &b).unwrap();
        assert!(c.data().iter().all(|&x| x == 2.0));
    }

    #[test]
    fn test_map_and_scale() {
        let a = matrix!([-1.0, 2.0], [1, 2]);
        assert_eq!(a.map(f64::abs).data(), &[1.0, 2.0]);
        assert_eq!(a.scale(0.5).data(), &[-0.5, 1.0]);
    }

    #[test]
    fn test_matmul() {
        let a = matrix!([1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]);
        let b = matrix!([7.0, 8.0, 9.0, 10.0, 11.0, 12.0], [3, 2]);

        let c = a.matmul(&b).unwrap();
        // [1*7 + 2*9 + 3*11, 1*8 + 2*10 + 3*12] = [58, 64]
        // [4*7 + 5*9 + 6*11, 4*8 + 5*10 + 6*12] = [139, 154]
        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.data(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_matmul_inner_dimension_mismatch() {
        let a = Matrix::<f64>::zeros([2, 3]);
        let b = Matrix::<f64>::zeros([2, 2]);
        assert!(matches!(
            a.matmul(&b),
            Err(DecoderError::DimensionMismatch { op: "matmul", .. })
        ));
    }

    #[test]
    fn test_transpose() {
        let a = matrix!([1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]);
        let t = a.transpose().unwrap();
        assert_eq!(t.shape(), &[3, 2]);
        assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.transpose().unwrap(), a);
    }

    #[test]
    fn test_softmax_rows() {
        let mut a = matrix!([1.0, 2.0, 3.0, 0.0, 0.0, f64::NEG_INFINITY], [2, 3]);
        a.softmax_rows();

        let first: f64 = a.row(0).iter().sum();
        assert!((first - 1.0).abs() < 1e-12);
        assert!(a.row(0)[2] > a.row(0)[1] && a.row(0)[1] > a.row(0)[0]);
        assert_eq!(a.row(1), &[0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_softmax_row_shift_invariant() {
        let mut a = vec![0.1f64, -2.0, 3.5, 0.7];
        let mut b: Vec<f64> = a.iter().map(|x| x + 42.0).collect();
        softmax_row(&mut a);
        softmax_row(&mut b);

        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_slice_and_concat() {
        let a = matrix!([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], [2, 4]);
        let left = a.slice_cols(0, 2).unwrap();
        let right = a.slice_cols(2, 4).unwrap();
        assert_eq!(left.data(), &[1.0, 2.0, 5.0, 6.0]);
        assert_eq!(right.data(), &[3.0, 4.0, 7.0, 8.0]);

        let joined = Matrix::hconcat(&[left, right]).unwrap();
        assert_eq!(joined, a);
    }

    #[test]
    fn test_slice_out_of_range() {
        let a = Matrix::<f32>::zeros([2, 4]);
        assert!(a.slice_cols(3, 5).is_err());
        assert!(a.slice_cols(3, 2).is_err());
    }

    #[test]
    fn test_hconcat_row_mismatch() {
        let a = Matrix::<f32>::zeros([2, 1]);
        let b = Matrix::<f32>::zeros([3, 1]);
        assert!(matches!(
            Matrix::hconcat(&[a, b]),
            Err(DecoderError::DimensionMismatch { op: "hconcat", .. })
        ));
    }
}
