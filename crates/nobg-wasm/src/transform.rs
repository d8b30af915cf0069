//! WASM bindings for geometric transforms.

use nobg_core::decode::FilterType;
use nobg_core::transform::{apply_transform as core_transform, Transform, TransformError};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, to_js_error, JsImageAsset};

/// Apply one transform to an image.
///
/// `transform` is a plain object tagged by `kind`:
///
/// ```typescript
/// apply_transform(image, { kind: 'rotate', degrees: 15 }, 1);
/// apply_transform(image, { kind: 'translate', dx: 10, dy: -5 }, 1);
/// apply_transform(image, { kind: 'scale', sx: 0.5, sy: 0.5 }, 2);
/// apply_transform(image, { kind: 'shear', factor: 0.25 }, 1);
/// ```
///
/// `filter` is 0 (nearest), 1 (bilinear) or 2 (lanczos3).
#[wasm_bindgen]
pub fn apply_transform(
    image: &JsImageAsset,
    transform: JsValue,
    filter: u8,
) -> Result<JsImageAsset, JsValue> {
    let transform: Transform = serde_wasm_bindgen::from_value(transform).map_err(to_js_error)?;
    transform_image(image, &transform, filter_from_u8(filter)).map_err(to_js_error)
}

fn transform_image(
    image: &JsImageAsset,
    transform: &Transform,
    filter: FilterType,
) -> Result<JsImageAsset, TransformError> {
    let raster = core_transform(&image.to_raster(), transform, filter)?;
    Ok(image.with_raster(raster))
}
