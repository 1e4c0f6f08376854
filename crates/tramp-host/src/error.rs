//! Host-side error types.

use thiserror::Error;
use tramp_codegen::CodegenError;

/// Errors raised while loading trampolines or driving promising calls.
#[derive(Debug, Error)]
pub enum HostError {
    /// The suspender is held by a call that has not completed yet.
    #[error("suspender {id} is already in use by a pending call")]
    SuspenderBusy { id: u64 },

    /// The call paused but the suspending import parked nothing to await.
    #[error("call paused without a parked host future")]
    NothingParked,

    /// The instantiated module lacks the expected export.
    #[error("module has no `{0}` export")]
    MissingExport(String),

    /// A suspending import's future completed with an error.
    #[error("suspending import rejected: {0}")]
    Rejected(String),

    /// Defining imports, populating a table or binding the suspender global failed.
    #[error("link error: {0}")]
    Link(String),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// Compilation, instantiation or execution failed inside wasmi.
    #[error(transparent)]
    Wasm(#[from] wasmi::Error),
}

/// Host result type alias.
pub type HostResult<T> = Result<T, HostError>;
