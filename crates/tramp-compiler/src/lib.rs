//! Trampoline generation facade.
//!
//! ```text
//! (kind, signature) ─► cache? ─► tramp-codegen generator ─► validate? ─► .wasm
//! ```
//!
//! [`Generator`] carries a [`TrampolineConfig`] and, when caching is on, a
//! [`TrampolineCache`]. [`generate_to_result`] wraps a one-off generation in
//! a serialisable [`GenerateResult`] for hosts that talk JSON.

pub mod cache;
pub mod config;
pub mod error;
pub mod kind;
pub mod result;

pub use cache::TrampolineCache;
pub use config::TrampolineConfig;
pub use error::{CompileError, CompileResult};
pub use kind::TrampolineKind;
pub use result::{sha256_hex, GenerateResult};

use tracing::debug;
use tramp_codegen::{create_invoke_module, create_promising_module_for_signature, validate};

/// Generate the trampoline of `kind` for `signature`, uncached.
pub fn generate(
    kind: TrampolineKind,
    signature: &str,
    config: &TrampolineConfig,
) -> CompileResult<Vec<u8>> {
    let wasm = match kind {
        TrampolineKind::Invoke => create_invoke_module(signature)?,
        TrampolineKind::Promising => create_promising_module_for_signature(signature)?,
    };
    if config.validate {
        validate(&wasm)?;
    }
    debug!(%kind, signature, bytes = wasm.len(), "generated trampoline");
    Ok(wasm)
}

/// Generate and package the outcome, success or failure, as a [`GenerateResult`].
pub fn generate_to_result(
    kind: TrampolineKind,
    signature: &str,
    config: &TrampolineConfig,
) -> GenerateResult {
    GenerateResult::from_outcome(generate(kind, signature, config))
}

/// Configured trampoline generator.
#[derive(Debug)]
pub struct Generator {
    config: TrampolineConfig,
    cache: Option<TrampolineCache>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(TrampolineConfig::default())
    }
}

impl Generator {
    pub fn new(config: TrampolineConfig) -> Self {
        let cache = config.cache.then(TrampolineCache::new);
        Self { config, cache }
    }

    pub fn config(&self) -> &TrampolineConfig {
        &self.config
    }

    /// The cache, if `config.cache` is set.
    pub fn cache(&self) -> Option<&TrampolineCache> {
        self.cache.as_ref()
    }

    pub fn generate(&mut self, kind: TrampolineKind, signature: &str) -> CompileResult<Vec<u8>> {
        let config = &self.config;
        match &mut self.cache {
            Some(cache) => cache.get_or_generate(kind, signature, || generate(kind, signature, config)),
            None => generate(kind, signature, config),
        }
    }

    pub fn generate_to_result(&mut self, kind: TrampolineKind, signature: &str) -> GenerateResult {
        GenerateResult::from_outcome(self.generate(kind, signature))
    }
}
