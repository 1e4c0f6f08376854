//! Generation settings.

use serde::{Deserialize, Serialize};

use crate::error::CompileResult;

/// Settings for a [`crate::Generator`].
///
/// Missing fields take their defaults, so `{}` is a valid document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrampolineConfig {
    /// Validate every generated module before returning it.
    pub validate: bool,
    /// Memoise generated modules per (kind, signature).
    pub cache: bool,
}

impl Default for TrampolineConfig {
    fn default() -> Self {
        Self {
            validate: true,
            cache: true,
        }
    }
}

impl TrampolineConfig {
    pub fn from_json(json: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
