//! The closed set of value types exchanged across function boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeError;

/// A primitive value type of the target stack machine.
///
/// | Variant     | Signature char | Binary byte |
/// |-------------|----------------|-------------|
/// | `I32`       | `i`            | `0x7F`      |
/// | `I64`       | `j`            | `0x7E`      |
/// | `F32`       | `f`            | `0x7D`      |
/// | `F64`       | `d`            | `0x7C`      |
/// | `ExternRef` | `e`            | `0x6F`      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    I32,
    I64,
    F32,
    F64,
    ExternRef,
}

impl ValueType {
    /// Every value type, in binary-byte order.
    pub const ALL: [ValueType; 5] = [
        ValueType::I32,
        ValueType::I64,
        ValueType::F32,
        ValueType::F64,
        ValueType::ExternRef,
    ];

    /// The byte that encodes this type in a binary module.
    pub const fn byte(self) -> u8 {
        match self {
            ValueType::I32 => 0x7F,
            ValueType::I64 => 0x7E,
            ValueType::F32 => 0x7D,
            ValueType::F64 => 0x7C,
            ValueType::ExternRef => 0x6F,
        }
    }

    /// Decode a binary value-type byte.
    pub fn from_byte(byte: u8) -> Result<Self, TypeError> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.byte() == byte)
            .ok_or_else(|| TypeError::UnsupportedValueType(format!("0x{byte:02X}")))
    }

    /// The compact signature character for this type.
    pub const fn signature_char(self) -> char {
        match self {
            ValueType::I32 => 'i',
            ValueType::I64 => 'j',
            ValueType::F32 => 'f',
            ValueType::F64 => 'd',
            ValueType::ExternRef => 'e',
        }
    }

    /// Map a compact signature character to a value type.
    ///
    /// Returns `None` for `v` (no value) and for characters outside the
    /// alphabet; callers distinguish the two.
    pub const fn from_signature_char(c: char) -> Option<Self> {
        match c {
            'i' => Some(ValueType::I32),
            'j' => Some(ValueType::I64),
            'f' => Some(ValueType::F32),
            'd' => Some(ValueType::F64),
            'e' => Some(ValueType::ExternRef),
            _ => None,
        }
    }

    /// Whether constants of this type can be pushed with a `*.const` opcode.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, ValueType::ExternRef)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::ExternRef => "externref",
        };
        f.write_str(name)
    }
}
