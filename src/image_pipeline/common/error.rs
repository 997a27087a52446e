use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Failed to decode source image: {0}")]
    SourceDecodeFailure(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Filtering cancelled after {completed} iteration(s)")]
    Cancelled { completed: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FilterError {
    pub(crate) fn mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        FilterError::DimensionMismatch { expected, actual }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
