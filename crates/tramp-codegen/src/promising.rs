//! Promising-call trampolines.
//!
//! For a function type `(P…) -> R` the generated module is equivalent to:
//!
//! ```text
//! (type $export (func (param P…) (result R)))
//! (type $suspending (func (param externref P…) (result R)))
//! (import "env" "suspending" (func $suspending (type $suspending)))
//! (import "env" "suspender" (global $suspender (mut externref)))
//! (func (export "trampoline") (type $export)
//!   global.get $suspender
//!   local.get 0 … local.get N-1
//!   call $suspending)
//! ```
//!
//! Suspension is invisible inside the module: the host decides whether the
//! call to `$suspending` parks the stack.

use tracing::debug;
use tramp_types::{map_signature, FuncType, ValueType};

use crate::code::CodeSection;
use crate::error::CodegenResult;
use crate::imports::ImportSection;
use crate::module::WasmModule;
use crate::type_section::TypeSection;
use crate::types::{SUSPENDER_IMPORT, SUSPENDING_IMPORT};

/// Build the promising trampoline for `func_type` without serializing it.
pub fn build_promising_module(func_type: &FuncType) -> CodegenResult<WasmModule> {
    let mut suspending = FuncType::new([ValueType::ExternRef], []);
    suspending.parameters.extend_from_slice(&func_type.parameters);
    suspending.results.clone_from(&func_type.results);

    let mut types = TypeSection::new();
    let export_index = types.add_wasm(func_type.clone());
    let suspending_type = types.add_wasm(suspending);

    let mut imports = ImportSection::new();
    let suspending_fn = imports.add_function(SUSPENDING_IMPORT, suspending_type);
    // The suspender goes on top of the imports the base call already needs.
    let suspender = imports.add_global(ValueType::ExternRef, SUSPENDER_IMPORT);

    let mut code = CodeSection::new(func_type.clone());
    code.global_get(suspender);
    for local in 0..func_type.parameters.len() as u32 {
        code.local_get(local);
    }
    code.call(suspending_fn);

    let mut module = WasmModule::new();
    module
        .add_section(types)
        .add_import_section(imports)
        .set_export_type(export_index)
        .add_section(code);
    Ok(module)
}

/// Generate the promising trampoline for `func_type`.
pub fn create_promising_module(func_type: &FuncType) -> CodegenResult<Vec<u8>> {
    let bytes = build_promising_module(func_type)?.generate()?;
    debug!(%func_type, bytes = bytes.len(), "created promising module");
    Ok(bytes)
}

/// Generate the promising trampoline for a compact signature.
pub fn create_promising_module_for_signature(signature: &str) -> CodegenResult<Vec<u8>> {
    create_promising_module(&map_signature(signature)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_signature() {
        let bytes = create_promising_module_for_signature("v").unwrap();
        assert_eq!(
            bytes,
            [
                0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00,
                // type: () -> (), (externref) -> ()
                0x01, 0x08, 0x02, 0x60, 0x00, 0x00, 0x60, 0x01, 0x6F, 0x00,
                // import: env.suspending func 1, env.suspender mut externref
                0x02, 0x23, 0x02,
                0x03, b'e', b'n', b'v',
                0x0A, b's', b'u', b's', b'p', b'e', b'n', b'd', b'i', b'n', b'g', 0x00, 0x01,
                0x03, b'e', b'n', b'v',
                0x09, b's', b'u', b's', b'p', b'e', b'n', b'd', b'e', b'r', 0x03, 0x6F, 0x01,
                // function: type 0
                0x03, 0x02, 0x01, 0x00,
                // export: "trampoline" func 1
                0x07, 0x0E, 0x01, 0x0A, b't', b'r', b'a', b'm', b'p', b'o', b'l', b'i', b'n', b'e',
                0x00, 0x01,
                // code: global.get 0, call 0, end
                0x0A, 0x08, 0x01, 0x06, 0x00, 0x23, 0x00, 0x10, 0x00, 0x0B,
            ]
        );
    }

    #[test]
    fn suspender_follows_suspending_import() {
        let module = build_promising_module(&map_signature("dd").unwrap()).unwrap();
        let imports = module.imports().unwrap();
        let names: Vec<_> = imports.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, [SUSPENDING_IMPORT, SUSPENDER_IMPORT]);
        assert_eq!(module.export_function_index(), 1);
        assert_eq!(module.export_type(), Some(0));
    }
}
