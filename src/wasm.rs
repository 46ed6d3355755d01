//! WebAssembly bindings for in-browser evidence analysis.
//!
//! Each exported function accepts raw file bytes as `&[u8]` (via wasm-bindgen)
//! and returns a JSON string. These are thin wrappers over the same library
//! code used by the CLI subcommands.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::forensic::inspector::FileInspector;
use crate::forensic::repair::HeaderRepairEngine;
use crate::forensic::signature::FileType;
use crate::forensic::strings::{scan_strings, DEFAULT_MIN_LENGTH};
use crate::util::hex::render;

fn to_js_err(e: crate::HexdetError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(val: &T) -> Result<String, JsValue> {
    serde_json::to_string(val).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Detect the type of `data` and return the analysis summary as JSON.
///
/// Fields: `file`, `size`, `detected_type`, `sha256`, `header_hex`,
/// `header_ascii`, `string_count` and `strings` (first five, truncated).
#[wasm_bindgen]
pub fn analyze_bytes(data: &[u8]) -> Result<String, JsValue> {
    let mut inspector = FileInspector::from_bytes(data.to_vec());
    inspector.detect_type();
    to_json(&inspector.summary())
}

/// Extract printable strings with their offsets as a JSON array.
///
/// `min_length` defaults to [`DEFAULT_MIN_LENGTH`] when omitted.
#[wasm_bindgen]
pub fn extract_strings(data: &[u8], min_length: Option<usize>) -> Result<String, JsValue> {
    to_json(&scan_strings(data, min_length.unwrap_or(DEFAULT_MIN_LENGTH)))
}

/// Render a hex dump of `[start, start + length)`.
#[wasm_bindgen]
pub fn hex_dump(data: &[u8], start: usize, length: usize) -> String {
    render(data, start, length)
}

/// Compare the header against the canonical signature for `file_type`.
#[wasm_bindgen]
pub fn diagnose_header(data: &[u8], file_type: &str) -> Result<String, JsValue> {
    let engine = HeaderRepairEngine::from_bytes("upload", data.to_vec());
    let report = engine.diagnose(file_type).map_err(to_js_err)?;
    to_json(&report)
}

#[derive(Serialize)]
struct RepairedBytes {
    file_type: FileType,
    patched: usize,
    data: Vec<u8>,
}

/// Return `data` with its header replaced by the canonical signature.
///
/// Pass `"auto"` to let the evidence heuristics choose the type. The buffer
/// is patched in memory only; nothing is written to disk.
#[wasm_bindgen]
pub fn repair_header(data: &[u8], file_type: &str) -> Result<String, JsValue> {
    if data.is_empty() {
        return Err(to_js_err(crate::HexdetError::EmptyBuffer));
    }
    let mut engine = HeaderRepairEngine::from_bytes("upload", data.to_vec());
    let target = if file_type.eq_ignore_ascii_case("auto") {
        engine
            .guess_type()
            .ok_or_else(|| to_js_err(crate::HexdetError::Undetected))?
    } else {
        file_type.parse::<FileType>().map_err(to_js_err)?
    };

    let patches = engine.patch_header(target);
    to_json(&RepairedBytes {
        file_type: target,
        patched: patches.len(),
        data: engine.into_data(),
    })
}
