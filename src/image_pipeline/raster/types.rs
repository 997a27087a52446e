//! Raster and plane data types

use rayon::prelude::*;

use crate::image_pipeline::common::error::{FilterError, Result};

/// Number of interleaved samples per raster pixel (R, G, B, A).
pub const RASTER_CHANNELS: usize = 4;

/// 8-bit RGBA raster, row-major, top-to-bottom.
///
/// The sample buffer always holds exactly `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wraps an interleaved RGBA buffer.
    ///
    /// Zero-sized rasters are rejected as [`FilterError::UnsupportedFormat`], a buffer of the
    /// wrong length as [`FilterError::InvalidParameter`].
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::UnsupportedFormat(format!(
                "raster dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let expected = width * height * RASTER_CHANNELS;
        if data.len() != expected {
            return Err(FilterError::InvalidParameter(format!(
                "raster buffer holds {} bytes, expected {} for {}x{} RGBA",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a raster filled with a single RGBA value.
    pub fn from_pixel(width: usize, height: usize, pixel: [u8; RASTER_CHANNELS]) -> Result<Self> {
        let data = pixel.repeat(width * height);
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGBA sample of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; RASTER_CHANNELS] {
        let offset = (y * self.width + x) * RASTER_CHANNELS;
        let mut px = [0u8; RASTER_CHANNELS];
        px.copy_from_slice(&self.data[offset..offset + RASTER_CHANNELS]);
        px
    }

    pub(crate) fn from_raw_parts(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * RASTER_CHANNELS);
        Self {
            width,
            height,
            data,
        }
    }
}

/// Single-channel dense grid of `f32` samples in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

/// Luma plane derived from a guidance [`PlaneSet`].
pub type GrayscalePlane = Plane;

impl Plane {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::UnsupportedFormat(format!(
                "plane dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(FilterError::InvalidParameter(format!(
                "plane buffer holds {} samples, expected {} for {}x{}",
                data.len(),
                width * height,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_value(width: usize, height: usize, value: f32) -> Result<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub(crate) fn from_raw_parts(width: usize, height: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Elementwise combination of two planes of equal size into a new plane.
    pub(crate) fn zip_map<F>(&self, other: &Plane, f: F) -> Plane
    where
        F: Fn(f32, f32) -> f32 + Send + Sync,
    {
        debug_assert_eq!(self.size(), other.size());
        let data = self
            .data
            .par_iter()
            .zip(other.data.par_iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Plane::from_raw_parts(self.width, self.height, data)
    }
}

/// Three independent R, G, B planes of identical size.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneSet {
    red: Plane,
    green: Plane,
    blue: Plane,
}

impl PlaneSet {
    pub fn new(red: Plane, green: Plane, blue: Plane) -> Result<Self> {
        for plane in [&green, &blue] {
            if plane.size() != red.size() {
                return Err(FilterError::mismatch(red.size(), plane.size()));
            }
        }
        Ok(Self { red, green, blue })
    }

    pub(crate) fn from_raw_parts(red: Plane, green: Plane, blue: Plane) -> Self {
        debug_assert!(red.size() == green.size() && red.size() == blue.size());
        Self { red, green, blue }
    }

    pub fn red(&self) -> &Plane {
        &self.red
    }

    pub fn green(&self) -> &Plane {
        &self.green
    }

    pub fn blue(&self) -> &Plane {
        &self.blue
    }

    pub fn width(&self) -> usize {
        self.red.width()
    }

    pub fn height(&self) -> usize {
        self.red.height()
    }

    pub fn size(&self) -> (usize, usize) {
        self.red.size()
    }

    pub fn channels(&self) -> [&Plane; 3] {
        [&self.red, &self.green, &self.blue]
    }

    pub fn into_channels(self) -> [Plane; 3] {
        [self.red, self.green, self.blue]
    }
}
