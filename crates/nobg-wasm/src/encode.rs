//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_image } from '@nobg/wasm';
//!
//! const png = encode_png(image);
//! const jpeg = encode_image(image, 'jpeg', 90);
//! ```

use nobg_core::encode;
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsImageAsset};

/// Encode an image as PNG, keeping its alpha channel.
///
/// # Errors
///
/// Returns an error if the pixel buffer does not match the dimensions or
/// either dimension is zero.
#[wasm_bindgen]
pub fn encode_png(image: &JsImageAsset) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(&image.to_raster()).map_err(to_js_error)
}

/// Encode an image in a named format (`png`, `jpg`, `jpeg`).
///
/// `quality` (1-100) only applies to JPEG, which is composited over white.
#[wasm_bindgen]
pub fn encode_image(image: &JsImageAsset, format: &str, quality: u8) -> Result<Vec<u8>, JsValue> {
    let format: encode::OutputFormat = format.parse().map_err(to_js_error)?;
    encode::encode_with_quality(&image.to_raster(), format, quality).map_err(to_js_error)
}
