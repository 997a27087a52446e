//! Bilinear resampling of RGBA rasters.
//!
//! Used to bring the guidance image to the target's dimensions before the grayscale guidance
//! plane is derived.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{FilterError, Result};
use crate::image_pipeline::raster::types::{RASTER_CHANNELS, RasterImage};

/// Resize `src` to `width` x `height` with bilinear interpolation.
///
/// Corner pixels of the source map onto corner pixels of the destination, so a source
/// coordinate is `dst * (src_len - 1) / (dst_len - 1)`.
pub fn resize_bilinear(src: &RasterImage, width: usize, height: usize) -> Result<RasterImage> {
    if width == 0 || height == 0 {
        return Err(FilterError::UnsupportedFormat(format!(
            "cannot resample to {}x{}",
            width, height
        )));
    }
    if src.size() == (width, height) {
        return Ok(src.clone());
    }

    debug!(
        src_width = src.width(),
        src_height = src.height(),
        width,
        height,
        "Resampling raster"
    );

    let xs = linspace(src.width(), width);
    let ys = linspace(src.height(), height);
    let (src_cols, src_rows) = src.size();
    let src_data = src.as_slice();

    let mut data = vec![0u8; width * height * RASTER_CHANNELS];
    data.par_chunks_exact_mut(width * RASTER_CHANNELS)
        .zip(ys.par_iter())
        .for_each(|(row, &v)| {
            let iv0 = (v.trunc() as usize).min(src_rows - 1);
            let iv1 = (iv0 + 1).min(src_rows - 1);
            let frac_v = v.fract();

            for (px, &u) in row.chunks_exact_mut(RASTER_CHANNELS).zip(xs.iter()) {
                let iu0 = (u.trunc() as usize).min(src_cols - 1);
                let iu1 = (iu0 + 1).min(src_cols - 1);
                let frac_u = u.fract();

                let w00 = (1.0 - frac_u) * (1.0 - frac_v);
                let w01 = frac_u * (1.0 - frac_v);
                let w10 = (1.0 - frac_u) * frac_v;
                let w11 = frac_u * frac_v;

                let base00 = (iv0 * src_cols + iu0) * RASTER_CHANNELS;
                let base01 = (iv0 * src_cols + iu1) * RASTER_CHANNELS;
                let base10 = (iv1 * src_cols + iu0) * RASTER_CHANNELS;
                let base11 = (iv1 * src_cols + iu1) * RASTER_CHANNELS;

                for (k, out) in px.iter_mut().enumerate() {
                    let value = src_data[base00 + k] as f32 * w00
                        + src_data[base01 + k] as f32 * w01
                        + src_data[base10 + k] as f32 * w10
                        + src_data[base11 + k] as f32 * w11;
                    *out = value.round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    Ok(RasterImage::from_raw_parts(width, height, data))
}

/// Evenly spaced source coordinates for `dst_len` destination samples.
fn linspace(src_len: usize, dst_len: usize) -> Vec<f32> {
    if dst_len == 1 {
        return vec![0.0];
    }
    let step = (src_len - 1) as f32 / (dst_len - 1) as f32;
    (0..dst_len).map(|i| i as f32 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_size_is_a_copy() {
        let raster = RasterImage::from_pixel(3, 2, [10, 20, 30, 40]).unwrap();
        let resized = resize_bilinear(&raster, 3, 2).unwrap();
        assert_eq!(resized, raster);
    }

    #[test]
    fn test_upsample_interpolates_between_corners() {
        // 2x1 black -> white ramp resampled to 3x1
        let raster = RasterImage::new(2, 1, vec![0, 0, 0, 255, 200, 200, 200, 255]).unwrap();
        let resized = resize_bilinear(&raster, 3, 2).unwrap();

        assert_eq!(resized.size(), (3, 2));
        assert_eq!(resized.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(resized.pixel(1, 0), [100, 100, 100, 255]);
        assert_eq!(resized.pixel(2, 1), [200, 200, 200, 255]);
    }

    #[test]
    fn test_downsample_keeps_constant_image() {
        let raster = RasterImage::from_pixel(9, 7, [128, 64, 32, 255]).unwrap();
        let resized = resize_bilinear(&raster, 4, 3).unwrap();
        assert!(
            resized
                .as_slice()
                .chunks_exact(RASTER_CHANNELS)
                .all(|px| px == [128, 64, 32, 255])
        );
    }

    #[test]
    fn test_zero_target_size_is_unsupported() {
        let raster = RasterImage::from_pixel(2, 2, [0, 0, 0, 255]).unwrap();
        let result = resize_bilinear(&raster, 0, 2);
        assert!(matches!(result, Err(FilterError::UnsupportedFormat(_))));
    }
}
