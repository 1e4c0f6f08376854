//! Compact signature strings and function types.
//!
//! A compact signature is one character per value: the first character is
//! the return type, every following character is one parameter.
//!
//! ```text
//! v = no value   i = i32   j = i64   f = f32   d = f64   e = externref
//! ```
//!
//! `"vd"` is `(f64) -> ()`, `"iijfde"` is `(i32, i64, f32, f64, externref) -> i32`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{TypeError, ValueType};

/// An ordered list of parameter types and result types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncType {
    pub parameters: Vec<ValueType>,
    pub results: Vec<ValueType>,
}

impl FuncType {
    pub fn new(
        parameters: impl IntoIterator<Item = ValueType>,
        results: impl IntoIterator<Item = ValueType>,
    ) -> Self {
        Self {
            parameters: parameters.into_iter().collect(),
            results: results.into_iter().collect(),
        }
    }

    /// Parse a compact signature string. See [`map_signature`].
    pub fn from_signature(signature: &str) -> Result<Self, TypeError> {
        map_signature(signature)
    }

    /// Render back to the compact alphabet.
    ///
    /// Returns `None` for types with more than one result, which the compact
    /// form cannot express.
    pub fn to_signature(&self) -> Option<String> {
        let ret = match self.results.as_slice() {
            [] => 'v',
            [ty] => ty.signature_char(),
            _ => return None,
        };
        let mut sig = String::with_capacity(1 + self.parameters.len());
        sig.push(ret);
        sig.extend(self.parameters.iter().map(|ty| ty.signature_char()));
        Some(sig)
    }
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |tys: &[ValueType]| {
            tys.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({}) -> ({})", join(&self.parameters), join(&self.results))
    }
}

/// Map a compact signature string to a [`FuncType`].
///
/// `v` in the return position yields no results; in a parameter position it
/// contributes nothing. Any character outside the alphabet is rejected.
pub fn map_signature(signature: &str) -> Result<FuncType, TypeError> {
    let mut chars = signature.chars().enumerate();
    let (_, ret) = chars.next().ok_or(TypeError::EmptySignature)?;

    let invalid = |position: usize, found: char| TypeError::InvalidSignature {
        signature: signature.to_string(),
        found,
        position,
    };

    let results = match ret {
        'v' => Vec::new(),
        c => vec![ValueType::from_signature_char(c).ok_or_else(|| invalid(0, c))?],
    };

    let mut parameters = Vec::with_capacity(signature.len().saturating_sub(1));
    for (position, c) in chars {
        if c == 'v' {
            continue;
        }
        parameters.push(ValueType::from_signature_char(c).ok_or_else(|| invalid(position, c))?);
    }

    Ok(FuncType {
        parameters,
        results,
    })
}
