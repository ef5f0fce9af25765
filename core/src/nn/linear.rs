use crate::error::{DecoderError, Result};
use crate::matrix::{Matrix, Scalar};
use crate::random::{RandomSource, random_matrix};

/// A fully connected layer: `y = x · W + b`.
///
/// `weight` has shape `[in_features, out_features]`, so inputs multiply from the left without a
/// transpose. `bias` has one entry per output feature and is added to every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear<T: Scalar> {
    pub weight: Matrix<T>,
    pub bias: Vec<T>,
}

impl<T: Scalar> Linear<T> {
    /// Creates a layer from explicit parameters. `None` means a zero bias.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the bias length differs from `weight.cols()`.
    pub fn new(weight: Matrix<T>, bias: Option<Vec<T>>) -> Result<Self> {
        let out_features = weight.cols();
        let bias = bias.unwrap_or_else(|| vec![T::zero(); out_features]);
        if bias.len() != out_features {
            return Err(DecoderError::DimensionMismatch {
                op: "linear",
                expected: vec![out_features],
                got: vec![bias.len()],
            });
        }
        Ok(Self { weight, bias })
    }

    /// Samples a `[in_features, out_features]` weight with a zero bias.
    pub fn random(in_features: usize, out_features: usize, rng: &mut impl RandomSource) -> Self {
        Self {
            weight: random_matrix(in_features, out_features, rng),
            bias: vec![T::zero(); out_features],
        }
    }

    pub fn in_features(&self) -> usize {
        self.weight.rows()
    }

    pub fn out_features(&self) -> usize {
        self.weight.cols()
    }

    pub fn num_parameters(&self) -> usize {
        self.weight.data().len() + self.bias.len()
    }

    /// Projects `[rows, in_features]` to `[rows, out_features]`.
    pub fn forward(&self, x: &Matrix<T>) -> Result<Matrix<T>> {
        if x.cols() != self.in_features() {
            return Err(DecoderError::DimensionMismatch {
                op: "linear",
                expected: vec![x.rows(), self.in_features()],
                got: x.shape().to_vec(),
            });
        }

        let mut out = x.matmul(&self.weight)?;
        let out_features = self.out_features();
        if out_features > 0 {
            for row in out.data_mut().chunks_mut(out_features) {
                for (val, &b) in row.iter_mut().zip(self.bias.iter()) {
                    *val += b;
                }
            }
        }
        Ok(out)
    }
}
