//! TIFF reading and writing module
//!
//! This module decodes 8-bit TIFF sources into RGBA rasters and encodes filtered
//! rasters back to TIFF with various compression options.

mod reader;
mod writer;
mod standard_tiff_reader;
mod standard_tiff_writer;
pub mod types;

pub use reader::RasterReader;
pub use writer::RasterWriter;
pub use standard_tiff_reader::StandardTiffReader;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{TiffCompression, TransferConfig, TransferConfigBuilder};
