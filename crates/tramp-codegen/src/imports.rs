//! Import section builder.
//!
//! Every entry lives under [`HOST_NAMESPACE`]. Insertion order is preserved
//! and determines each entry's index within its kind: the first function
//! import is function 0, the first global import is global 0, and so on.

use tramp_types::ValueType;

use crate::leb128;
use crate::section::SectionEncoder;
use crate::types::{
    SectionId, FUNCREF, HOST_NAMESPACE, KIND_FUNCTION, KIND_GLOBAL, KIND_TABLE, KIND_TAG,
    LIMITS_MIN_ONLY, MUTABLE, TAG_EXCEPTION,
};

/// What an import provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// A `funcref` table with no size limits.
    Table,
    /// An exception tag whose payload is described by a type index.
    Tag { type_index: u32 },
    /// A function of the given type index.
    Function { type_index: u32 },
    /// A mutable global.
    Global { value_type: ValueType },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub name: String,
    pub kind: ImportKind,
}

#[derive(Debug, Clone, Default)]
pub struct ImportSection {
    entries: Vec<Import>,
}

impl ImportSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a `funcref` table; returns its table index.
    pub fn add_table(&mut self, name: impl Into<String>) -> u32 {
        self.push(name, ImportKind::Table)
    }

    /// Import an exception tag; returns its tag index.
    pub fn add_tag(&mut self, name: impl Into<String>, type_index: u32) -> u32 {
        self.push(name, ImportKind::Tag { type_index })
    }

    /// Import a function; returns its function index.
    pub fn add_function(&mut self, name: impl Into<String>, type_index: u32) -> u32 {
        self.push(name, ImportKind::Function { type_index })
    }

    /// Import a mutable global; returns its global index.
    pub fn add_global(&mut self, value_type: ValueType, name: impl Into<String>) -> u32 {
        self.push(name, ImportKind::Global { value_type })
    }

    fn push(&mut self, name: impl Into<String>, kind: ImportKind) -> u32 {
        let index = self.count_kind(|k| same_kind(k, &kind));
        self.entries.push(Import {
            name: name.into(),
            kind,
        });
        index
    }

    fn count_kind(&self, pred: impl Fn(&ImportKind) -> bool) -> u32 {
        self.entries.iter().filter(|e| pred(&e.kind)).count() as u32
    }

    /// Number of function imports; also the index of the first locally
    /// defined function.
    pub fn function_count(&self) -> u32 {
        self.count_kind(|k| matches!(k, ImportKind::Function { .. }))
    }

    pub fn global_count(&self) -> u32 {
        self.count_kind(|k| matches!(k, ImportKind::Global { .. }))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn same_kind(a: &ImportKind, b: &ImportKind) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

impl SectionEncoder for ImportSection {
    fn id(&self) -> SectionId {
        SectionId::Import
    }

    fn encode_body(&self, sink: &mut Vec<u8>) {
        leb128::encode(self.entries.len() as u64, sink);
        for entry in &self.entries {
            leb128::encode_name(HOST_NAMESPACE, sink);
            leb128::encode_name(&entry.name, sink);
            match entry.kind {
                ImportKind::Table => {
                    sink.extend([KIND_TABLE, FUNCREF, LIMITS_MIN_ONLY]);
                    leb128::encode(0, sink);
                }
                ImportKind::Tag { type_index } => {
                    sink.extend([KIND_TAG, TAG_EXCEPTION]);
                    leb128::encode(u64::from(type_index), sink);
                }
                ImportKind::Function { type_index } => {
                    sink.push(KIND_FUNCTION);
                    leb128::encode(u64::from(type_index), sink);
                }
                ImportKind::Global { value_type } => {
                    sink.extend([KIND_GLOBAL, value_type.byte(), MUTABLE]);
                }
            }
        }
    }
}
