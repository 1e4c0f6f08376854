//! Type section builder.

use tramp_types::{map_signature, FuncType, ValueType};

use crate::error::CodegenResult;
use crate::leb128;
use crate::section::SectionEncoder;
use crate::types::{SectionId, FUNC_TYPE};

/// Accumulates function types. Entries are never deduplicated: every add
/// call appends and returns the new entry's index.
#[derive(Debug, Clone, Default)]
pub struct TypeSection {
    entries: Vec<FuncType>,
}

impl TypeSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a function type verbatim; returns its index.
    pub fn add_wasm(&mut self, func_type: FuncType) -> u32 {
        let index = self.entries.len() as u32;
        self.entries.push(func_type);
        index
    }

    /// Map a compact signature and append it; returns its index.
    pub fn add_signature(&mut self, signature: &str) -> CodegenResult<u32> {
        let func_type = map_signature(signature)?;
        Ok(self.add_wasm(func_type))
    }

    pub fn get(&self, index: u32) -> Option<&FuncType> {
        self.entries.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn encode_types(types: &[ValueType], sink: &mut Vec<u8>) {
    leb128::encode(types.len() as u64, sink);
    sink.extend(types.iter().map(|ty| ty.byte()));
}

impl SectionEncoder for TypeSection {
    fn id(&self) -> SectionId {
        SectionId::Type
    }

    fn encode_body(&self, sink: &mut Vec<u8>) {
        leb128::encode(self.entries.len() as u64, sink);
        for entry in &self.entries {
            sink.push(FUNC_TYPE);
            encode_types(&entry.parameters, sink);
            encode_types(&entry.results, sink);
        }
    }
}
