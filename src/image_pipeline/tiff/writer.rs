use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::types::RasterImage;
use crate::image_pipeline::tiff::types::TransferConfig;

pub trait RasterWriter {
    fn write_raster(&self, image: &RasterImage, output: &mut dyn Write, config: &TransferConfig) -> Result<()>;
}
