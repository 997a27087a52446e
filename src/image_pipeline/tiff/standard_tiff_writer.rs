use std::io::{Cursor, Write};

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{colortype, Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{FilterError, Result};
use crate::image_pipeline::raster::types::RasterImage;
use crate::image_pipeline::tiff::types::{TiffCompression, TransferConfig};
use crate::image_pipeline::tiff::writer::RasterWriter;

/// Encodes rasters as 8-bit RGBA TIFF.
///
/// The encoder needs a seekable sink, so the file is assembled in memory and handed to
/// `output` in a single write.
pub struct StandardTiffWriter;

impl RasterWriter for StandardTiffWriter {
    fn write_raster(&self, image: &RasterImage, output: &mut dyn Write, config: &TransferConfig) -> Result<()> {
        let (width, height) = image.size();
        debug!(width, height, compression = ?config.compression, "Encoding RGBA TIFF");

        let mut encoded = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut encoded)
                .map_err(encode_error)?
                .with_compression(compression_of(config.compression));
            if let Some(predictor) = config.predictor.map(predictor_of) {
                encoder = encoder.with_predictor(predictor);
            }
            encoder
                .write_image::<colortype::RGBA8>(width as u32, height as u32, image.as_slice())
                .map_err(encode_error)?;
        }

        let encoded = encoded.into_inner();
        output.write_all(&encoded)?;

        debug!(bytes = encoded.len(), "TIFF encoding complete");
        Ok(())
    }
}

fn compression_of(compression: TiffCompression) -> Compression {
    match compression {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    }
}

/// TIFF tag value 2 selects horizontal differencing; anything else disables prediction.
fn predictor_of(tag: u16) -> Predictor {
    match tag {
        2 => Predictor::Horizontal,
        _ => Predictor::None,
    }
}

fn encode_error(e: tiff::TiffError) -> FilterError {
    FilterError::EncodeError(e.to_string())
}
