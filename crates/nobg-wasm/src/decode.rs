//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, is_allowed_type } from '@nobg/wasm';
//!
//! if (is_allowed_type(file.name)) {
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   const image = decode_image(bytes, file.name);
//!   console.log(`Decoded ${image.width}x${image.height} ${image.source_format}`);
//! }
//! ```

use nobg_core::decode;
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsImageAsset};

/// Decode PNG or JPEG bytes into an upright RGBA image.
///
/// The container is sniffed from the bytes; `identifier` is only carried
/// along (usually the filename).
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8], identifier: &str) -> Result<JsImageAsset, JsValue> {
    decode::decode(identifier, bytes)
        .map(JsImageAsset::from_asset)
        .map_err(to_js_error)
}

/// Whether a filename has one of the accepted extensions (`png`, `jpg`, `jpeg`).
#[wasm_bindgen]
pub fn is_allowed_type(filename: &str) -> bool {
    decode::is_allowed_type(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed_type() {
        assert!(is_allowed_type("cat.PNG"));
        assert!(is_allowed_type("dog.jpeg"));
        assert!(!is_allowed_type("notes.txt"));
    }

    #[test]
    fn test_core_decode_wraps_into_js_asset() {
        let png = nobg_core::encode_png(&nobg_core::Raster::transparent(3, 2)).unwrap();
        let asset = decode::decode("t.png", &png).map(JsImageAsset::from_asset).unwrap();
        assert_eq!((asset.width(), asset.height()), (3, 2));
        assert_eq!(asset.source_format(), "png");
    }
}
