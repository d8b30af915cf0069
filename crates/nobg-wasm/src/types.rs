//! WASM-compatible wrapper types for image data.

use nobg_core::decode::{FilterType, ImageAsset, Raster, SourceFormat};
use wasm_bindgen::prelude::*;

/// A decoded image for JavaScript.
///
/// Pixels are RGBA, 4 bytes per pixel, row-major. Calling `pixels()`
/// copies them out of WASM memory into a `Uint8Array`.
#[wasm_bindgen]
#[derive(Debug)]
pub struct JsImageAsset {
    identifier: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    source_format: String,
}

#[wasm_bindgen]
impl JsImageAsset {
    /// Wrap RGBA pixels produced on the JavaScript side.
    #[wasm_bindgen(constructor)]
    pub fn new(identifier: String, width: u32, height: u32, pixels: Vec<u8>) -> JsImageAsset {
        JsImageAsset {
            identifier,
            width,
            height,
            pixels,
            source_format: "rgba".to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn identifier(&self) -> String {
        self.identifier.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Container the image was decoded from: `png`, `jpeg`, another
    /// codec name, or `rgba` for images built from raw pixels.
    #[wasm_bindgen(getter)]
    pub fn source_format(&self) -> String {
        self.source_format.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsImageAsset {
    pub(crate) fn from_asset(asset: ImageAsset) -> Self {
        let source_format = match &asset.source_format {
            SourceFormat::Png => "png".to_string(),
            SourceFormat::Jpeg => "jpeg".to_string(),
            SourceFormat::Other(name) => name.clone(),
        };
        Self {
            identifier: asset.identifier,
            width: asset.raster.width,
            height: asset.raster.height,
            pixels: asset.raster.pixels,
            source_format,
        }
    }

    /// Same identity, new pixels.
    pub(crate) fn with_raster(&self, raster: Raster) -> Self {
        Self {
            identifier: self.identifier.clone(),
            width: raster.width,
            height: raster.height,
            pixels: raster.pixels,
            source_format: self.source_format.clone(),
        }
    }

    /// Copy out as a core raster. The buffer length is not checked here;
    /// core functions reject inconsistent rasters themselves.
    pub(crate) fn to_raster(&self) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest
/// - 1 = Bilinear
/// - 2 = Lanczos3
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Error conversion used by every binding.
pub(crate) fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}
