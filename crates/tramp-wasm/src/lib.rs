//! Trampoline generators as a WASM module for JavaScript hosts.
//!
//! The returned bytes are ready for `WebAssembly.Module`; the host supplies
//! the `env` imports when instantiating.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { create_invoke_module, create_promising_module } from 'tramp-wasm';
//!
//! await init();
//!
//! const invoke = new WebAssembly.Module(create_invoke_module("dd"));
//! const promising = new WebAssembly.Module(
//!   create_promising_module({ parameters: ["f64"], results: ["f64"] }),
//! );
//! ```

use serde::Serialize;
use tramp_compiler::{GenerateResult, TrampolineConfig, TrampolineKind};
use tramp_types::FuncType;
use wasm_bindgen::prelude::*;

/// Build the invoke trampoline for a compact signature such as `"vd"`.
///
/// Throws on a signature character outside `v i j f d e`.
#[wasm_bindgen]
pub fn create_invoke_module(signature: &str) -> Result<Vec<u8>, JsError> {
    Ok(tramp_codegen::create_invoke_module(signature)?)
}

/// Build the promising trampoline for `{ parameters, results }`, each a list
/// of `"i32"`, `"i64"`, `"f32"`, `"f64"` or `"externref"`.
#[wasm_bindgen]
pub fn create_promising_module(func_type: JsValue) -> Result<Vec<u8>, JsError> {
    let func_type: FuncType = serde_wasm_bindgen::from_value(func_type)?;
    Ok(tramp_codegen::create_promising_module(&func_type)?)
}

/// Build the promising trampoline for a compact signature.
#[wasm_bindgen]
pub fn create_promising_module_for_signature(signature: &str) -> Result<Vec<u8>, JsError> {
    Ok(tramp_codegen::create_promising_module_for_signature(signature)?)
}

/// Generate and validate a trampoline of `kind` (`"invoke"` or `"promising"`).
///
/// Returns a JSON string containing a `GenerateResult`:
/// ```json
/// {
///   "success": true,
///   "wasm": [0, 97, 115, 109, ...],
///   "sha256": "…",
///   "export_name": "trampoline",
///   "error": null
/// }
/// ```
///
/// On failure, `success` is `false`, `wasm` and `sha256` are `null`, and
/// `error` holds the message.
#[wasm_bindgen]
pub fn generate(kind: &str, signature: &str) -> String {
    let result = match kind.parse::<TrampolineKind>() {
        Ok(kind) => tramp_compiler::generate_to_result(kind, signature, &TrampolineConfig::default()),
        Err(e) => GenerateResult::from_outcome(Err(e)),
    };
    to_json(&result)
}

/// Return the generator version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_json(result: &impl Serialize) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"wasm":null,"sha256":null,"export_name":"trampoline","error":"Serialization error: {}"}}"#,
            e
        )
    })
}
