//! Constant-time box filter with replicate borders.
//!
//! Each pass slides a running sum along one axis: the sample leaving the window is subtracted
//! and the sample entering it is added, with both positions clamped into the image. The second
//! pass runs the same row kernel over the transposed result, so the total cost is
//! O(width * height) for any radius.

use rayon::prelude::*;

use crate::image_pipeline::raster::types::Plane;

/// Mean over the `(2 * radius + 1)^2` window centred at every sample.
///
/// Out-of-image window positions read the nearest edge sample. The divisor is always
/// `2 * radius + 1` per axis, so clamped windows count replicated samples with multiplicity.
/// A radius of 0 returns an identical plane.
pub fn box_filter(plane: &Plane, radius: usize) -> Plane {
    if radius == 0 {
        return plane.clone();
    }

    let (width, height) = plane.size();
    let horizontal = row_pass(plane.as_slice(), width, height, radius);
    let transposed = transpose(&horizontal, width, height);
    let vertical = row_pass(&transposed, height, width, radius);

    Plane::from_raw_parts(width, height, transpose(&vertical, height, width))
}

/// Horizontal moving average of every row of a `width` x `height` buffer.
fn row_pass(src: &[f32], width: usize, height: usize, radius: usize) -> Vec<f32> {
    let mut dst = vec![0.0f32; width * height];
    src.par_chunks_exact(width)
        .zip(dst.par_chunks_exact_mut(width))
        .for_each(|(src_row, dst_row)| sliding_mean(src_row, dst_row, radius));
    dst
}

fn sliding_mean(src: &[f32], dst: &mut [f32], radius: usize) {
    let last = src.len() - 1;
    let divisor = 2.0 * radius as f64 + 1.0;

    // window at column 0: the left half is clamped onto the first sample and anything past
    // the row end onto the last one
    let reach = radius.min(last);
    let mut acc = src[0] as f64 * (radius as f64 + 1.0)
        + src[1..=reach].iter().map(|&v| v as f64).sum::<f64>()
        + src[last] as f64 * (radius - reach) as f64;
    dst[0] = (acc / divisor) as f32;

    for c in 1..src.len() {
        let leaving = if c > radius { src[c - radius - 1] } else { src[0] };
        acc -= leaving as f64;
        acc += src[c.saturating_add(radius).min(last)] as f64;
        dst[c] = (acc / divisor) as f32;
    }
}

fn transpose(src: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut dst = vec![0.0f32; width * height];
    dst.par_chunks_exact_mut(height)
        .enumerate()
        .for_each(|(x, dst_row)| {
            for (y, out) in dst_row.iter_mut().enumerate() {
                *out = src[y * width + x];
            }
        });
    dst
}
