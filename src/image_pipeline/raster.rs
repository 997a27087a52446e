//! Raster data module
//!
//! This module holds the RGBA raster and float plane types, the codec between them,
//! and guidance resampling.

pub mod types;
mod codec;
mod resample;

pub use types::{GrayscalePlane, Plane, PlaneSet, RasterImage, RASTER_CHANNELS};
pub use codec::{combine_planes, extract_planes, to_grayscale, LUMA_WEIGHTS};
pub use resample::resize_bilinear;
