use thiserror::Error;
use tramp_codegen::CodegenError;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// A configuration document could not be read.
    #[error("invalid trampoline config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unknown trampoline kind `{0}` (expected `invoke` or `promising`)")]
    UnknownKind(String),
}

pub type CompileResult<T> = std::result::Result<T, CompileError>;
