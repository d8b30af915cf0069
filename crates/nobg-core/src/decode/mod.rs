//! Image decoding for the batch pipeline.
//!
//! This module provides functionality for:
//! - Sniffing and decoding PNG and JPEG containers
//! - Applying EXIF orientation so rasters are upright
//! - Normalizing every raster to RGBA8
//!
//! # Architecture
//!
//! All operations are synchronous, single-threaded and pure: bytes in,
//! new [`ImageAsset`] out.
//!
//! # Examples
//!
//! ```ignore
//! use nobg_core::decode::decode;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let asset = decode("photo.jpg", &bytes).unwrap();
//! println!("Decoded {}x{} image", asset.width(), asset.height());
//! ```

mod container;
mod orientation;
mod types;

pub use container::{decode, decode_raster};
pub use orientation::{read_orientation, Orientation};
pub use types::{DecodeError, FilterType, ImageAsset, Raster, SourceFormat, CHANNELS};

/// File extensions accepted from uploaders.
pub const ALLOWED_TYPES: [&str; 3] = ["png", "jpg", "jpeg"];

/// Whether a filename carries one of the [`ALLOWED_TYPES`] extensions.
///
/// The comparison ignores ASCII case. Callers enforce this before handing
/// files to the pipeline; decoding itself sniffs the real container.
pub fn is_allowed_type(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_TYPES.iter().any(|t| t.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
