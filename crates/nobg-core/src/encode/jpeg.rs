//! JPEG encoding.
//!
//! JPEG has no alpha channel, so transparent pixels are composited over
//! white before encoding. That matches how a cut-out looks on a plain page.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::format::{validate_raster, EncodeError, OutputFormat};
use crate::decode::{Raster, CHANNELS};

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encode an RGBA raster to JPEG bytes.
///
/// # Arguments
///
/// * `raster` - RGBA raster to encode
/// * `quality` - JPEG quality (1-100, where 100 is highest quality); clamped
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate_raster(raster)?;

    let quality = quality.clamp(1, 100);
    let rgb = flatten_over_white(&raster.pixels);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// Composite RGBA pixels over an opaque white background, dropping alpha.
fn flatten_over_white(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let alpha = px[3] as u32;
        for &c in &px[..3] {
            // c * a + 255 * (1 - a), rounded
            let v = (c as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(v as u8);
        }
    }
    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep small for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=40, 1u32..=40)
    }

    proptest! {
        /// Property: Encoding always produces a well-formed JPEG for valid rasters.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in dimensions_strategy(),
            quality in 1u8..=100,
            alpha in any::<u8>(),
        ) {
            let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
            for _ in 0..(width * height) {
                pixels.extend_from_slice(&[200, 100, 50, alpha]);
            }
            let raster = Raster::new(width, height, pixels);

            let jpeg_bytes = encode_jpeg(&raster, quality).unwrap();
            prop_assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8], "Should have SOI marker");
            let len = jpeg_bytes.len();
            prop_assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9], "Should have EOI marker");
        }
    }
}
