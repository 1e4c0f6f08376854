//! Serialisable generation outcome.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tramp_codegen::types::EXPORT_NAME;

use crate::error::CompileResult;

/// The outcome of one generation, shaped for JSON hosts.
///
/// On success `wasm` and `sha256` are set and `error` is `None`; on failure
/// the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResult {
    pub success: bool,
    pub wasm: Option<Vec<u8>>,
    /// Lowercase hex SHA-256 of `wasm`.
    pub sha256: Option<String>,
    pub export_name: String,
    pub error: Option<String>,
}

impl GenerateResult {
    pub fn from_outcome(outcome: CompileResult<Vec<u8>>) -> Self {
        match outcome {
            Ok(wasm) => Self {
                success: true,
                sha256: Some(sha256_hex(&wasm)),
                wasm: Some(wasm),
                export_name: EXPORT_NAME.to_string(),
                error: None,
            },
            Err(e) => Self {
                success: false,
                wasm: None,
                sha256: None,
                export_name: EXPORT_NAME.to_string(),
                error: Some(e.to_string()),
            },
        }
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
