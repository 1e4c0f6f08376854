//! Binary-format constants: header, section ids, opcodes, import kinds and
//! the fixed names every generated module uses.

use std::fmt;

// ── Header ───────────────────────────────────────────────────────────────────

/// `\0asm`
pub const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];
/// Binary format version 1.
pub const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

// ── Section ids ──────────────────────────────────────────────────────────────

/// Ids of the sections this assembler emits.
///
/// Variants are declared in binary order, so the derived `Ord` is the order
/// sections must appear in a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SectionId {
    Type = 1,
    Import = 2,
    Function = 3,
    Export = 7,
    Code = 10,
}

impl SectionId {
    pub const fn byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionId::Type => "type",
            SectionId::Import => "import",
            SectionId::Function => "function",
            SectionId::Export => "export",
            SectionId::Code => "code",
        };
        f.write_str(name)
    }
}

// ── Type encodings ───────────────────────────────────────────────────────────

/// Leading byte of a function type entry.
pub const FUNC_TYPE: u8 = 0x60;
/// `funcref` element type for tables.
pub const FUNCREF: u8 = 0x70;
/// Limits flag: minimum only, no maximum.
pub const LIMITS_MIN_ONLY: u8 = 0x00;
/// Global mutability flag: `var`.
pub const MUTABLE: u8 = 0x01;
/// Tag attribute: exception.
pub const TAG_EXCEPTION: u8 = 0x00;

// ── Import / export kinds ────────────────────────────────────────────────────

pub const KIND_FUNCTION: u8 = 0x00;
pub const KIND_TABLE: u8 = 0x01;
pub const KIND_GLOBAL: u8 = 0x03;
pub const KIND_TAG: u8 = 0x04;

// ── Opcodes ──────────────────────────────────────────────────────────────────

pub const OP_END: u8 = 0x0B;
pub const OP_CALL: u8 = 0x10;
pub const OP_CALL_INDIRECT: u8 = 0x11;
pub const OP_LOCAL_GET: u8 = 0x20;
pub const OP_LOCAL_SET: u8 = 0x21;
pub const OP_LOCAL_TEE: u8 = 0x22;
pub const OP_GLOBAL_GET: u8 = 0x23;
pub const OP_GLOBAL_SET: u8 = 0x24;
pub const OP_I32_CONST: u8 = 0x41;
pub const OP_I64_CONST: u8 = 0x42;
pub const OP_F32_CONST: u8 = 0x43;
pub const OP_F64_CONST: u8 = 0x44;

// ── Host contract ────────────────────────────────────────────────────────────

/// Namespace every import lives under.
pub const HOST_NAMESPACE: &str = "env";
/// Name of the single exported function.
pub const EXPORT_NAME: &str = "trampoline";
/// Function-pointer table imported by invoke trampolines.
pub const TABLE_IMPORT: &str = "table";
/// Mutable `externref` global imported by promising trampolines.
pub const SUSPENDER_IMPORT: &str = "suspender";
/// Suspending function imported by promising trampolines.
pub const SUSPENDING_IMPORT: &str = "suspending";
