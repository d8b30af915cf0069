//! Batch pipeline WASM bindings.
//!
//! The background remover lives on the JavaScript side and is passed in as
//! a synchronous callback taking and returning a `Uint8Array` of PNG bytes.
//!
//! ```typescript
//! import { process_batch } from '@nobg/wasm';
//!
//! const files = await Promise.all(inputs.map(async f => ({
//!   name: f.name,
//!   bytes: new Uint8Array(await f.arrayBuffer()),
//! })));
//!
//! const result = process_batch(files, png => removeBackground(png), {
//!   transform: { kind: 'rotate', degrees: 90 },
//!   failure_policy: 'isolate',
//! });
//!
//! if (result.has_output) {
//!   download(new Blob([result.bytes], { type: result.mime }), result.filename);
//! }
//! ```

use js_sys::{Function, Reflect, Uint8Array};
use nobg_core::pipeline::{BatchItem, BatchOutput, BatchPipeline, BatchResult};
use nobg_core::remove::{from_fn, RemovalError};
use nobg_core::{PipelineConfig, Transform};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::types::to_js_error;

/// Options accepted by [`process_batch`]. Every field is optional.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct BatchOptions {
    #[serde(flatten)]
    config: PipelineConfig,
    transform: Transform,
}

/// One failed upload as seen from JavaScript.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct JsItemFailure {
    index: usize,
    identifier: String,
    message: String,
}

/// Outcome of [`process_batch`].
#[wasm_bindgen]
pub struct JsBatchResult {
    output: Option<BatchOutput>,
    output_names: Vec<String>,
    failures: Vec<JsItemFailure>,
    warnings: Vec<String>,
}

#[wasm_bindgen]
impl JsBatchResult {
    /// False when every upload failed.
    #[wasm_bindgen(getter)]
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn is_archive(&self) -> bool {
        self.output.as_ref().is_some_and(BatchOutput::is_archive)
    }

    /// `<stem>_nobg.png` for a single image, the archive name otherwise.
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> Option<String> {
        self.output.as_ref().map(|o| o.filename().to_string())
    }

    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> Option<String> {
        self.output.as_ref().map(|o| o.mime().to_string())
    }

    /// The PNG or zip to hand to the user.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.output.as_ref().map(|o| o.bytes().to_vec())
    }

    #[wasm_bindgen(getter)]
    pub fn succeeded(&self) -> usize {
        self.output_names.len()
    }

    #[wasm_bindgen(getter)]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Output filenames of the successful uploads, in input order.
    pub fn output_names(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.output_names).map_err(to_js_error)
    }

    /// `[{ index, identifier, message }]` for every failed upload.
    pub fn failures(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.failures).map_err(to_js_error)
    }

    /// Human-readable warnings, e.g. about dropped files.
    pub fn warnings(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.warnings).map_err(to_js_error)
    }
}

impl From<BatchResult> for JsBatchResult {
    fn from(result: BatchResult) -> Self {
        Self {
            output_names: result.items.into_iter().map(|i| i.output_name).collect(),
            failures: result
                .failures
                .into_iter()
                .map(|f| JsItemFailure {
                    index: f.index,
                    identifier: f.identifier,
                    message: f.error.to_string(),
                })
                .collect(),
            warnings: result.warnings.iter().map(ToString::to_string).collect(),
            output: result.output,
        }
    }
}

/// Run a batch of uploads through background removal.
///
/// # Arguments
///
/// * `files` - Array of `{ name: string, bytes: Uint8Array }`
/// * `remover` - `(png: Uint8Array) => Uint8Array`, returning the same image
///   with a transparent background
/// * `options` - optional pipeline settings plus `transform`
///
/// # Errors
///
/// Returns an error for an empty batch, invalid options, an out-of-range
/// transform, or the first failing upload when `failure_policy` is
/// `abort_on_first`.
#[wasm_bindgen]
pub fn process_batch(
    files: js_sys::Array,
    remover: Function,
    options: JsValue,
) -> Result<JsBatchResult, JsValue> {
    let options: BatchOptions = if options.is_undefined() || options.is_null() {
        BatchOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
    };

    let items = files
        .iter()
        .map(|file| batch_item(&file))
        .collect::<Result<Vec<_>, _>>()?;

    let remover = from_fn(move |bytes: &[u8]| call_remover(&remover, bytes));
    let result = BatchPipeline::new(options.config, remover)
        .process_files(items, options.transform)
        .map_err(to_js_error)?;

    Ok(result.into())
}

/// Read `{ name, bytes }` from a JS object.
fn batch_item(file: &JsValue) -> Result<BatchItem, JsValue> {
    let name = Reflect::get(file, &JsValue::from_str("name"))?
        .as_string()
        .ok_or_else(|| JsValue::from_str("Each file needs a string `name`"))?;
    let bytes = Reflect::get(file, &JsValue::from_str("bytes"))?;
    if !bytes.is_instance_of::<Uint8Array>() {
        return Err(JsValue::from_str(&format!("{}: `bytes` must be a Uint8Array", name)));
    }
    Ok(BatchItem::new(name, Uint8Array::new(&bytes).to_vec()))
}

fn call_remover(remover: &Function, bytes: &[u8]) -> Result<Vec<u8>, RemovalError> {
    let input = Uint8Array::from(bytes);
    let output = remover
        .call1(&JsValue::NULL, &input)
        .map_err(|e| RemovalError::Failed(js_message(&e)))?;
    if !output.is_instance_of::<Uint8Array>() {
        return Err(RemovalError::MalformedOutput(
            "remover callback must return a Uint8Array".to_string(),
        ));
    }
    Ok(Uint8Array::new(&output).to_vec())
}

/// Best-effort text for a thrown JS value.
fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
