use crate::error::{DecoderError, Result};
use crate::matrix::{Matrix, Scalar, scalar};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Whether stochastic layers are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Dropout masks are sampled and applied.
    Train,
    /// Dropout is the identity.
    #[default]
    Eval,
}

/// Inverted dropout.
///
/// In [`Mode::Train`] each element is zeroed with probability `rate` and the survivors are
/// scaled by `1 / (1 - rate)`, keeping the expected value unchanged. A rate of `0` or
/// [`Mode::Eval`] returns the input untouched and draws nothing from the random source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dropout {
    rate: f64,
}

impl Dropout {
    /// # Errors
    ///
    /// Returns `ConfigurationInvalid` unless `0 <= rate < 1`.
    pub fn new(rate: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&rate) {
            return Err(DecoderError::ConfigurationInvalid(format!(
                "dropout must be in [0, 1), got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn forward<T: Scalar>(
        &self,
        x: &Matrix<T>,
        mode: Mode,
        rng: &mut impl RandomSource,
    ) -> Result<Matrix<T>> {
        if mode == Mode::Eval || self.rate == 0.0 {
            return Ok(x.clone());
        }

        let keep = 1.0 - self.rate;
        let survivor: T = scalar(1.0 / keep);
        let mut mask = Matrix::zeros(*x.shape());
        for m in mask.data_mut() {
            if rng.bernoulli(keep) {
                *m = survivor;
            }
        }
        x * &mask
    }
}

/// Applies training-mode dropout with the given `rate`.
pub fn dropout<T: Scalar>(
    x: &Matrix<T>,
    rate: f64,
    rng: &mut impl RandomSource,
) -> Result<Matrix<T>> {
    Dropout::new(rate)?.forward(x, Mode::Train, rng)
}
