//! Per-signature memoisation of generated modules.

use std::collections::HashMap;

use tracing::trace;

use crate::error::CompileResult;
use crate::kind::TrampolineKind;

/// Generated modules keyed by (kind, signature).
///
/// Failed generations are not cached.
#[derive(Debug, Default)]
pub struct TrampolineCache {
    entries: HashMap<(TrampolineKind, String), Vec<u8>>,
    hits: u64,
    misses: u64,
}

impl TrampolineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: TrampolineKind, signature: &str) -> Option<&[u8]> {
        self.entries
            .get(&(kind, signature.to_string()))
            .map(Vec::as_slice)
    }

    /// Return the cached module, or run `generate` and cache its output.
    pub fn get_or_generate(
        &mut self,
        kind: TrampolineKind,
        signature: &str,
        generate: impl FnOnce() -> CompileResult<Vec<u8>>,
    ) -> CompileResult<Vec<u8>> {
        let key = (kind, signature.to_string());
        if let Some(wasm) = self.entries.get(&key) {
            self.hits += 1;
            trace!(%kind, signature, "trampoline cache hit");
            return Ok(wasm.clone());
        }
        self.misses += 1;
        let wasm = generate()?;
        self.entries.insert(key, wasm.clone());
        Ok(wasm)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry; the counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use tramp_codegen::CodegenError;

    #[test]
    fn second_lookup_hits() {
        let mut cache = TrampolineCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let wasm = cache
                .get_or_generate(TrampolineKind::Invoke, "i", || {
                    calls += 1;
                    Ok(vec![1, 2, 3])
                })
                .unwrap();
            assert_eq!(wasm, [1, 2, 3]);
        }
        assert_eq!(calls, 1);
        assert_eq!((cache.hits(), cache.misses()), (2, 1));
    }

    #[test]
    fn kind_is_part_of_the_key() {
        let mut cache = TrampolineCache::new();
        cache.get_or_generate(TrampolineKind::Invoke, "i", || Ok(vec![1])).unwrap();
        cache.get_or_generate(TrampolineKind::Promising, "i", || Ok(vec![2])).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(TrampolineKind::Invoke, "i"), Some(&[1u8][..]));
        assert_eq!(cache.get(TrampolineKind::Promising, "i"), Some(&[2u8][..]));
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = TrampolineCache::new();
        let failed = cache.get_or_generate(TrampolineKind::Invoke, "v", || {
            Err(CompileError::Codegen(CodegenError::MissingCodeSection))
        });
        assert!(failed.is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn clear_keeps_counters() {
        let mut cache = TrampolineCache::new();
        cache.get_or_generate(TrampolineKind::Invoke, "v", || Ok(vec![0])).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 1);
    }
}
