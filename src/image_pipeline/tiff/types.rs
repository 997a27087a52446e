//! Structure transfer configuration types

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Configuration for reading, filtering and writing an image pair
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Compression method for the output TIFF
    pub compression: TiffCompression,
    /// Predictor value for compression (2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// Whether to validate decoded image dimensions before filtering
    pub validate_dimensions: bool,
    /// Resample a guidance image of a different size to the target size; when disabled a size
    /// difference is a dimension mismatch
    pub resample_guidance: bool,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            resample_guidance: true,
            max_dimension: Some(50000),
        }
    }
}

impl TransferConfig {
    pub fn builder() -> TransferConfigBuilder {
        TransferConfigBuilder::default()
    }
}

/// Builder for TransferConfig
#[derive(Default)]
pub struct TransferConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    resample_guidance: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl TransferConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn resample_guidance(mut self, resample: bool) -> Self {
        self.resample_guidance = Some(resample);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> TransferConfig {
        let default = TransferConfig::default();
        TransferConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            resample_guidance: self.resample_guidance.unwrap_or(default.resample_guidance),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
