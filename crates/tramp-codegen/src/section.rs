//! Section framing and the closed set of section builders.

use crate::code::CodeSection;
use crate::imports::ImportSection;
use crate::leb128;
use crate::type_section::TypeSection;
use crate::types::SectionId;

/// A builder that serializes itself into one framed section.
pub trait SectionEncoder {
    /// The id written in front of the section.
    fn id(&self) -> SectionId;

    /// Append the unframed section body.
    fn encode_body(&self, sink: &mut Vec<u8>);

    /// Serialize as `[id][varint length][body]`.
    fn generate(&self) -> Vec<u8> {
        let mut body = Vec::new();
        self.encode_body(&mut body);
        frame(self.id(), &body)
    }
}

/// Frame `body` as `[id][varint len(body)][body]`.
pub fn frame(id: SectionId, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 1 + leb128::encoded_len(body.len() as u64));
    out.push(id.byte());
    leb128::encode(body.len() as u64, &mut out);
    out.extend_from_slice(body);
    out
}

/// One of the sections a module can be assembled from.
///
/// Function and export sections are not listed: [`crate::WasmModule`]
/// synthesizes them from the registered imports and export type.
#[derive(Debug, Clone)]
pub enum Section {
    Type(TypeSection),
    Import(ImportSection),
    Code(CodeSection),
}

impl SectionEncoder for Section {
    fn id(&self) -> SectionId {
        match self {
            Section::Type(s) => s.id(),
            Section::Import(s) => s.id(),
            Section::Code(s) => s.id(),
        }
    }

    fn encode_body(&self, sink: &mut Vec<u8>) {
        match self {
            Section::Type(s) => s.encode_body(sink),
            Section::Import(s) => s.encode_body(sink),
            Section::Code(s) => s.encode_body(sink),
        }
    }
}

impl From<TypeSection> for Section {
    fn from(section: TypeSection) -> Self {
        Section::Type(section)
    }
}

impl From<ImportSection> for Section {
    fn from(section: ImportSection) -> Self {
        Section::Import(section)
    }
}

impl From<CodeSection> for Section {
    fn from(section: CodeSection) -> Self {
        Section::Code(section)
    }
}
