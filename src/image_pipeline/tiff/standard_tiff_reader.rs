//! TIFF source reader.
//!
//! Decodes 8-bit grayscale, grayscale + alpha, RGB and RGBA TIFF images into RGBA rasters.
//! Missing channels are expanded: gray is replicated into R, G and B, and an absent alpha
//! channel becomes fully opaque.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{FilterError, Result};
use crate::image_pipeline::raster::types::{RASTER_CHANNELS, RasterImage};
use crate::image_pipeline::tiff::reader::RasterReader;

/// Raster reader backed by the `tiff` crate.
pub struct StandardTiffReader;

impl RasterReader for StandardTiffReader {
    fn read_raster(&self, data: &[u8]) -> Result<RasterImage> {
        debug!("Decoding TIFF image, {} bytes", data.len());

        let decode_err = |e: tiff::TiffError| FilterError::SourceDecodeFailure(e.to_string());

        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_err)?;
        let (width, height) = decoder.dimensions().map_err(decode_err)?;
        let color_type = decoder.colortype().map_err(decode_err)?;
        let (width, height) = (width as usize, height as usize);

        let channels = match color_type {
            ColorType::Gray(8) => 1,
            ColorType::GrayA(8) => 2,
            ColorType::RGB(8) => 3,
            ColorType::RGBA(8) => 4,
            other => {
                return Err(FilterError::UnsupportedFormat(format!(
                    "color type {:?}, expected 8-bit gray or RGB(A)",
                    other
                )));
            }
        };

        let samples = match decoder.read_image().map_err(decode_err)? {
            DecodingResult::U8(samples) => samples,
            _ => {
                return Err(FilterError::UnsupportedFormat(
                    "only 8-bit samples are supported".to_string(),
                ));
            }
        };

        if samples.len() != width * height * channels {
            return Err(FilterError::SourceDecodeFailure(format!(
                "decoded {} samples for a {}x{} image with {} channel(s)",
                samples.len(),
                width,
                height,
                channels
            )));
        }

        debug!(width, height, channels, "Decoded TIFF image");

        let rgba = samples
            .chunks_exact(channels)
            .flat_map(expand_to_rgba)
            .collect::<Vec<u8>>();
        debug_assert_eq!(rgba.len(), width * height * RASTER_CHANNELS);

        RasterImage::new(width, height, rgba)
    }
}

fn expand_to_rgba(px: &[u8]) -> [u8; RASTER_CHANNELS] {
    match *px {
        [g] => [g, g, g, u8::MAX],
        [g, a] => [g, g, g, a],
        [r, g, b] => [r, g, b, u8::MAX],
        [r, g, b, a] => [r, g, b, a],
        _ => unreachable!("chunk length is the channel count"),
    }
}
