use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Which generator a trampoline comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrampolineKind {
    /// `call_indirect` through an imported table.
    Invoke,
    /// Forwarding to a suspending import.
    Promising,
}

impl TrampolineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TrampolineKind::Invoke => "invoke",
            TrampolineKind::Promising => "promising",
        }
    }
}

impl fmt::Display for TrampolineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrampolineKind {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoke" => Ok(TrampolineKind::Invoke),
            "promising" => Ok(TrampolineKind::Promising),
            other => Err(CompileError::UnknownKind(other.to_string())),
        }
    }
}
