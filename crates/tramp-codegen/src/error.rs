//! Codegen error types.

use thiserror::Error;
use tramp_types::TypeError;

use crate::types::SectionId;

/// Errors that can occur while assembling a module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// A signature or value type was rejected before any bytes were emitted.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Sections were registered out of the required binary order.
    #[error("section order violation: {section} section after {previous} section")]
    SectionOrderViolation {
        section: SectionId,
        previous: SectionId,
    },

    /// A code section was registered but no export type was set.
    #[error("module has a code section but no export type")]
    MissingExportType,

    /// An export type was set but no code section was registered.
    #[error("module has an export type but no code section")]
    MissingCodeSection,

    /// The generated module failed validation.
    #[error("WASM validation failed: {0}")]
    ValidationFailed(String),
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
