use thiserror::Error;

/// Errors raised while interpreting signatures and value types.
///
/// All of these are construction-time failures: they are reported before a
/// single byte of a module is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A compact signature contained a character outside `{v,i,j,f,d,e}`.
    #[error("invalid signature `{signature}`: unrecognized character `{found}` at position {position}")]
    InvalidSignature {
        signature: String,
        found: char,
        position: usize,
    },

    /// A compact signature had no return-type character.
    #[error("invalid signature: empty string")]
    EmptySignature,

    /// An operation was given a value type it cannot represent.
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),
}
