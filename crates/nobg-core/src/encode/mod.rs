//! Image encoding for the batch pipeline.
//!
//! This module provides functionality for:
//! - Encoding RGBA rasters to PNG (lossless, alpha preserved)
//! - Encoding RGBA rasters to JPEG (alpha flattened over white)
//!
//! # Examples
//!
//! ```ignore
//! use nobg_core::encode::{encode, OutputFormat};
//!
//! let png = encode(&asset.raster, OutputFormat::Png).unwrap();
//! println!("Encoded {} bytes", png.len());
//! ```

mod format;
mod jpeg;
mod png;

pub use format::{EncodeError, OutputFormat};
pub use jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use png::{encode_png, PNG_SIGNATURE};

use crate::decode::Raster;

/// Encode a raster in the requested format, using the default JPEG quality.
pub fn encode(raster: &Raster, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    encode_with_quality(raster, format, DEFAULT_JPEG_QUALITY)
}

/// Encode a raster in the requested format. `quality` only affects JPEG.
pub fn encode_with_quality(
    raster: &Raster,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Png => encode_png(raster),
        OutputFormat::Jpeg => encode_jpeg(raster, quality),
    }
}

/// Encode a raster in a format given by name (`png`, `jpg`, `jpeg`).
pub fn encode_named(raster: &Raster, format: &str) -> Result<Vec<u8>, EncodeError> {
    encode(raster, format.parse()?)
}
