//! nobg WASM - WebAssembly bindings for nobg
//!
//! This crate exposes the nobg-core pipeline to JavaScript/TypeScript. The
//! background removal model itself stays in JavaScript and is handed to
//! [`process_batch`] as a callback.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` / `encode` - PNG and JPEG in and out
//! - `transform` - rotate, translate, scale, shear
//! - `archive` - zip bundling
//! - `pipeline` - the batch entry point
//!
//! # Usage
//!
//! ```typescript
//! import init, { process_batch } from '@nobg/wasm';
//!
//! await init();
//! const result = process_batch(files, removeBackground, { transform: { kind: 'none' } });
//! ```

use wasm_bindgen::prelude::*;

mod archive;
mod decode;
mod encode;
mod logger;
mod pipeline;
mod transform;
mod types;

pub use archive::bundle_archive;
pub use decode::{decode_image, is_allowed_type};
pub use encode::{encode_image, encode_png};
pub use pipeline::{process_batch, JsBatchResult};
pub use transform::apply_transform;
pub use types::JsImageAsset;

/// Initialize the WASM module (called automatically on load)
///
/// Routes `log` output from the core crate to the browser console at `info`.
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Change the console log level (`off`, `error`, `warn`, `info`, `debug`, `trace`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = logger::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    logger::install(filter);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Largest number of files a batch processes by default.
#[wasm_bindgen]
pub fn max_files() -> usize {
    nobg_core::MAX_FILES
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_set_log_level() {
        assert!(set_log_level("debug").is_ok());
        assert!(set_log_level("chatty").is_err());
    }
}
