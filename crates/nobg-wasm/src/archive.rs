//! Zip bundling WASM bindings.

use js_sys::{Array, Uint8Array};
use nobg_core::archive::{bundle, ArchiveEntry, ArchiveError};
use wasm_bindgen::prelude::*;

use crate::types::to_js_error;

/// Bundle files into one zip.
///
/// `names` and `files` are parallel arrays; `files` holds `Uint8Array`s.
/// Repeated names get `_1`, `_2`, ... suffixes.
///
/// ```typescript
/// const zip = bundle_archive(['a_nobg.png', 'b_nobg.png'], [pngA, pngB]);
/// ```
#[wasm_bindgen]
pub fn bundle_archive(names: Vec<String>, files: Array) -> Result<Vec<u8>, JsValue> {
    if names.len() != files.length() as usize {
        return Err(JsValue::from_str(&format!(
            "Got {} names for {} files",
            names.len(),
            files.length()
        )));
    }
    let mut contents = Vec::with_capacity(names.len());
    for (file, name) in files.iter().zip(&names) {
        if !file.is_instance_of::<Uint8Array>() {
            return Err(JsValue::from_str(&format!("{}: file must be a Uint8Array", name)));
        }
        contents.push(Uint8Array::new(&file).to_vec());
    }
    bundle_named(names, contents).map_err(to_js_error)
}

fn bundle_named(names: Vec<String>, contents: Vec<Vec<u8>>) -> Result<Vec<u8>, ArchiveError> {
    let entries: Vec<ArchiveEntry> = names
        .into_iter()
        .zip(contents)
        .map(|(name, bytes)| ArchiveEntry::new(name, bytes))
        .collect();
    bundle(&entries)
}
