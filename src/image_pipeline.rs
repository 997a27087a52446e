//! Image processing pipeline module
//!
//! This module provides structure-preserving filtering of an image pair, with separate
//! modules for raster data, filtering primitives, iteration control, TIFF I/O and
//! orchestration.

pub mod common;
pub mod raster;
pub mod filter;
pub mod mutual_structure;
pub mod tiff;
pub mod conversions;

pub use common::{
    FilterError,
    Result,
};

pub use raster::{
    GrayscalePlane,
    Plane,
    PlaneSet,
    RasterImage,
    combine_planes,
    extract_planes,
    resize_bilinear,
    to_grayscale,
};

pub use filter::{
    box_filter,
    guided_filter_channel,
};

pub use mutual_structure::{
    CancelToken,
    FilterParams,
    FilterParamsBuilder,
    LogProgress,
    MutualStructureFilter,
    NoProgress,
    PipelineState,
    ProgressSink,
    mutual_structure_filter,
};

pub use tiff::{
    RasterReader,
    RasterWriter,
    StandardTiffReader,
    StandardTiffWriter,
    TiffCompression,
    TransferConfig,
    TransferConfigBuilder,
};

pub use conversions::{
    Explainer,
    ParameterSummary,
    StructureTransferPipeline,
    TransferReport,
};
