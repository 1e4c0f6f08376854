//! Validation of generated modules with `wasmparser`.

use crate::error::{CodegenError, CodegenResult};

/// Validate a complete binary module.
pub fn validate(bytes: &[u8]) -> CodegenResult<()> {
    wasmparser::validate(bytes)
        .map(|_| ())
        .map_err(|e| CodegenError::ValidationFailed(format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_invoke_module, create_promising_module_for_signature};

    #[test]
    fn generated_modules_validate() {
        for sig in ["v", "vd", "fd", "dd", "jjjj", "eie"] {
            validate(&create_invoke_module(sig).unwrap()).unwrap();
            validate(&create_promising_module_for_signature(sig).unwrap()).unwrap();
        }
    }

    #[test]
    fn truncated_module_fails() {
        let bytes = create_invoke_module("v").unwrap();
        assert!(matches!(
            validate(&bytes[..bytes.len() - 1]),
            Err(CodegenError::ValidationFailed(_))
        ));
    }
}
