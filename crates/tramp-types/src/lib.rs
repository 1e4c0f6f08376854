//! Shared types for the trampoline assembler.
//!
//! This crate defines the value-type set, function types, the compact
//! signature mapper, and the error type shared by every assembler stage.

mod error;
mod signature;
mod value;

pub use error::TypeError;
pub use signature::{map_signature, FuncType};
pub use value::ValueType;

/// Result type used by the type layer.
pub type Result<T> = std::result::Result<T, TypeError>;
