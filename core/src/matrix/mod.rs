//! Row-major 2-D matrices.
//!
//! Every activation in the model is a sequence of row vectors, one per token position, so a
//! single rank-2 type is all the pipeline needs. A `Matrix` is:
//! 1. **Data**: a flat `Vec<T>` holding the elements row after row.
//! 2. **Shape**: `[rows, cols]`, with `data.len() == rows * cols` at all times.
//!
//! ```rust
//! use decoder_rs::matrix::Matrix;
//!
//! let m = Matrix::<f32>::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
//! assert_eq!(m.shape(), &[2, 3]);
//! assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
//! assert_eq!(m.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! ```

use crate::error::{DecoderError, Result};
use decoder_rs_kernels::KernelElem;
use num_traits::Float;
use std::fmt;

pub mod ops;

pub use ops::softmax_row;

/// Trait bound for matrix elements.
///
/// # Requirements
/// - `KernelElem`: arithmetic plus `Send + Sync`, so data can go through the rayon kernels.
/// - `Float`: `exp`, `sqrt`, `sin`, `cos` and infinities for softmax, normalization and masking.
pub trait Scalar: KernelElem + Float + 'static {}

impl<T> Scalar for T where T: KernelElem + Float + 'static {}

/// Converts an `f64` constant into the element type.
pub(crate) fn scalar<T: Scalar>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// A dense `[rows, cols]` matrix stored in row-major order.
#[derive(Clone, PartialEq)]
pub struct Matrix<T: Scalar> {
    shape: [usize; 2],
    data: Vec<T>,
}

impl<T: Scalar> Matrix<T> {
    /// Creates a matrix from flat row-major data.
    ///
    /// # Errors
    ///
    /// Returns `DecoderError::DimensionMismatch` if `data.len() != rows * cols`.
    pub fn new(data: Vec<T>, shape: [usize; 2]) -> Result<Self> {
        let size = shape[0] * shape[1];
        if data.len() != size {
            return Err(DecoderError::DimensionMismatch {
                op: "new",
                expected: vec![size],
                got: vec![data.len()],
            });
        }
        Ok(Self { shape, data })
    }

    /// Creates a matrix filled with zeros.
    pub fn zeros(shape: [usize; 2]) -> Self {
        Self {
            shape,
            data: vec![T::zero(); shape[0] * shape[1]],
        }
    }

    /// Builds a matrix from a list of equally long rows.
    ///
    /// An empty list gives a `[0, 0]` matrix.
    ///
    /// # Errors
    ///
    /// Returns `DecoderError::DimensionMismatch` if the rows are ragged.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(DecoderError::DimensionMismatch {
                    op: "from_rows",
                    expected: vec![cols],
                    got: vec![row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            shape: [rows.len(), cols],
            data,
        })
    }

    pub fn shape(&self) -> &[usize; 2] {
        &self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    pub fn cols(&self) -> usize {
        self.shape[1]
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns row `index` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.rows()`.
    pub fn row(&self, index: usize) -> &[T] {
        assert!(
            index < self.rows(),
            "row {index} out of range for {} rows",
            self.rows()
        );
        let cols = self.cols();
        &self.data[index * cols..(index + 1) * cols]
    }

    /// Returns the element at (`row`, `col`), or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows() && col < self.cols() {
            Some(self.data[row * self.cols() + col])
        } else {
            None
        }
    }

    /// Iterates over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows()).map(move |r| self.row(r))
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(<[T]>::to_vec).collect()
    }
}

impl<T: Scalar> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix(shape={:?}) [", self.shape)?;
        for row in self.iter_rows() {
            writeln!(f, "  {:?},", row)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        let res = Matrix::<f32>::new(vec![1.0, 2.0, 3.0], [2, 2]);
        assert!(matches!(
            res,
            Err(DecoderError::DimensionMismatch { op: "new", .. })
        ));
    }

    #[test]
    fn test_from_rows_ragged() {
        let res = Matrix::<f64>::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(
            res,
            Err(DecoderError::DimensionMismatch {
                op: "from_rows",
                expected: vec![2],
                got: vec![1],
            })
        );
    }

    #[test]
    fn test_from_rows_empty() {
        let m = Matrix::<f64>::from_rows(&[]).unwrap();
        assert_eq!(m.shape(), &[0, 0]);
        assert_eq!(m.iter_rows().count(), 0);
    }

    #[test]
    fn test_accessors() {
        let m = crate::matrix!([1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [3, 2]);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.get(2, 1), Some(6.0));
        assert_eq!(m.get(3, 0), None);
        assert_eq!(
            m.to_rows(),
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]
        );
    }

    #[test]
    fn test_zero_width_rows() {
        let m = Matrix::<f32>::zeros([3, 0]);
        assert_eq!(m.iter_rows().count(), 3);
        assert!(m.row(2).is_empty());
    }

    #[test]
    fn test_debug_format() {
        let m = crate::matrix!([1.0f32, 2.0], [1, 2]);
        let s = format!("{:?}", m);
        assert!(s.starts_with("Matrix(shape=[1, 2])"));
    }
}
