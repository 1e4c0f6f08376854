//! Indirect-call trampolines.
//!
//! For a signature `R(P…)` the generated module is equivalent to:
//!
//! ```text
//! (type $target (func (param P…) (result R)))
//! (type $export (func (param P… i32) (result R)))
//! (import "env" "table" (table 0 funcref))
//! (func (export "trampoline") (type $export)
//!   local.get 0 … local.get N     ;; parameters, then the table index
//!   call_indirect (type $target))
//! ```

use tracing::debug;
use tramp_types::{map_signature, ValueType};

use crate::code::CodeSection;
use crate::error::CodegenResult;
use crate::imports::ImportSection;
use crate::module::WasmModule;
use crate::type_section::TypeSection;
use crate::types::TABLE_IMPORT;

/// Build the invoke trampoline for `signature` without serializing it.
pub fn build_invoke_module(signature: &str) -> CodegenResult<WasmModule> {
    let target = map_signature(signature)?;

    let mut export = target.clone();
    export.parameters.push(ValueType::I32);

    let mut types = TypeSection::new();
    let target_index = types.add_wasm(target);
    let export_index = types.add_wasm(export.clone());

    let mut imports = ImportSection::new();
    imports.add_table(TABLE_IMPORT);

    let mut code = CodeSection::new(export);
    for local in 0..code.func_type().parameters.len() as u32 {
        code.local_get(local);
    }
    code.call_indirect(target_index);

    let mut module = WasmModule::new();
    module
        .add_section(types)
        .add_import_section(imports)
        .set_export_type(export_index)
        .add_section(code);
    Ok(module)
}

/// Generate the invoke trampoline for `signature`.
///
/// The export takes the signature's parameters plus a trailing `i32` table
/// index and returns whatever the target returns.
pub fn create_invoke_module(signature: &str) -> CodegenResult<Vec<u8>> {
    let bytes = build_invoke_module(signature)?.generate()?;
    debug!(signature, bytes = bytes.len(), "created invoke module");
    Ok(bytes)
}
