//! Conversion between interleaved RGBA rasters and normalized float planes.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::raster::types::{
    GrayscalePlane, Plane, PlaneSet, RASTER_CHANNELS, RasterImage,
};

/// Rec. 601 luma weights applied to R, G, B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

const SAMPLE_MAX: f32 = u8::MAX as f32;

/// Splits a raster into three normalized `[0, 1]` planes. Alpha is dropped.
pub fn extract_planes(raster: &RasterImage) -> PlaneSet {
    let (width, height) = raster.size();
    let pixels = width * height;

    let mut red = Vec::with_capacity(pixels);
    let mut green = Vec::with_capacity(pixels);
    let mut blue = Vec::with_capacity(pixels);

    for px in raster.as_slice().chunks_exact(RASTER_CHANNELS) {
        red.push(px[0] as f32 / SAMPLE_MAX);
        green.push(px[1] as f32 / SAMPLE_MAX);
        blue.push(px[2] as f32 / SAMPLE_MAX);
    }

    debug!(width, height, "Extracted RGB planes");

    PlaneSet::from_raw_parts(
        Plane::from_raw_parts(width, height, red),
        Plane::from_raw_parts(width, height, green),
        Plane::from_raw_parts(width, height, blue),
    )
}

/// Reassembles three planes into an opaque RGBA raster.
///
/// Samples are scaled by 255, clamped and rounded to the nearest integer; alpha is always 255.
pub fn combine_planes(planes: &PlaneSet) -> RasterImage {
    let (width, height) = planes.size();
    let [red, green, blue] = planes.channels();

    let mut data = vec![0u8; width * height * RASTER_CHANNELS];
    data.par_chunks_exact_mut(RASTER_CHANNELS)
        .zip(red.as_slice().par_iter())
        .zip(green.as_slice().par_iter())
        .zip(blue.as_slice().par_iter())
        .for_each(|(((px, &r), &g), &b)| {
            px[0] = to_sample(r);
            px[1] = to_sample(g);
            px[2] = to_sample(b);
            px[3] = u8::MAX;
        });

    RasterImage::from_raw_parts(width, height, data)
}

/// Weighted luma of the three guidance planes.
pub fn to_grayscale(planes: &PlaneSet) -> GrayscalePlane {
    let (width, height) = planes.size();
    let [red, green, blue] = planes.channels();
    let [wr, wg, wb] = LUMA_WEIGHTS;

    let data = red
        .as_slice()
        .par_iter()
        .zip(green.as_slice().par_iter())
        .zip(blue.as_slice().par_iter())
        .map(|((&r, &g), &b)| wr * r + wg * g + wb * b)
        .collect();

    Plane::from_raw_parts(width, height, data)
}

#[inline]
fn to_sample(value: f32) -> u8 {
    (value * SAMPLE_MAX).clamp(0.0, SAMPLE_MAX).round() as u8
}
