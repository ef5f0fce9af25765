use decoder_rs_kernels::KernelError;
use thiserror::Error;

/// Error type for every fallible operation in the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    /// Two operands (or an operand and a layer) disagree on shape.
    #[error("{op}: dimension mismatch, expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        op: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    /// A model or layer parameter is outside its legal range.
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),
}

pub type Result<T> = std::result::Result<T, DecoderError>;

impl From<KernelError> for DecoderError {
    fn from(err: KernelError) -> Self {
        match err {
            KernelError::ShapeMismatch { op, expected, got } => {
                DecoderError::DimensionMismatch { op, expected, got }
            }
        }
    }
}
