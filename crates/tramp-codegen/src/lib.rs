//! Trampoline assembler: synthesizes small WebAssembly modules at runtime.
//!
//! # Architecture
//!
//! ```text
//! signature ─► FuncType ─► TypeSection / ImportSection / CodeSection ─► WasmModule ─► bytes
//! ```
//!
//! Two generators are built on the section builders:
//!
//! - [`create_invoke_module`]: exports `trampoline(params…, index: i32)`,
//!   which `call_indirect`s through the imported `env.table`.
//! - [`create_promising_module`]: exports a function of the given type that
//!   reads the imported `env.suspender` global and forwards it, followed by
//!   its parameters, to the imported `env.suspending` function.
//!
//! Every generated module exports exactly one function under
//! [`types::EXPORT_NAME`].

pub mod code;
pub mod error;
pub mod imports;
pub mod invoke;
pub mod leb128;
pub mod module;
pub mod promising;
pub mod section;
pub mod type_section;
pub mod types;
pub mod validate;

pub use code::{CodeSection, Const};
pub use error::{CodegenError, CodegenResult};
pub use imports::{Import, ImportKind, ImportSection};
pub use invoke::{build_invoke_module, create_invoke_module};
pub use module::WasmModule;
pub use promising::{
    build_promising_module, create_promising_module, create_promising_module_for_signature,
};
pub use section::{Section, SectionEncoder};
pub use type_section::TypeSection;
pub use types::SectionId;
pub use validate::validate;

pub use tramp_types::{map_signature, FuncType, TypeError, ValueType};
