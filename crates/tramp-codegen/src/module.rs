//! Module assembler.
//!
//! Concatenates the binary header with the registered sections. The function
//! and export sections are never registered directly: they are synthesized
//! immediately before the code section from the export type and the number
//! of function imports.
//!
//! ```text
//! header │ type │ import │ function* │ export* │ code
//!                          (* synthesized)
//! ```

use tracing::debug;

use crate::error::{CodegenError, CodegenResult};
use crate::imports::ImportSection;
use crate::leb128;
use crate::section::{frame, Section, SectionEncoder};
use crate::types::{SectionId, EXPORT_NAME, KIND_FUNCTION, MAGIC, VERSION};

/// A module exporting exactly one function under [`EXPORT_NAME`].
#[derive(Debug, Clone, Default)]
pub struct WasmModule {
    sections: Vec<Section>,
    /// Position of the import section in `sections`, if one was registered.
    import_section: Option<usize>,
    export_type: Option<u32>,
}

impl WasmModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section. Sections must be added in binary order.
    pub fn add_section(&mut self, section: impl Into<Section>) -> &mut Self {
        let section = section.into();
        if matches!(section, Section::Import(_)) && self.import_section.is_none() {
            self.import_section = Some(self.sections.len());
        }
        self.sections.push(section);
        self
    }

    /// Register the import section so later code can keep extending it
    /// through [`WasmModule::imports_mut`].
    pub fn add_import_section(&mut self, imports: ImportSection) -> &mut Self {
        self.add_section(imports)
    }

    pub fn imports(&self) -> Option<&ImportSection> {
        match self.sections.get(self.import_section?) {
            Some(Section::Import(imports)) => Some(imports),
            _ => None,
        }
    }

    pub fn imports_mut(&mut self) -> Option<&mut ImportSection> {
        match self.sections.get_mut(self.import_section?) {
            Some(Section::Import(imports)) => Some(imports),
            _ => None,
        }
    }

    /// Record which type index describes the exported function.
    pub fn set_export_type(&mut self, type_index: u32) -> &mut Self {
        self.export_type = Some(type_index);
        self
    }

    pub fn export_type(&self) -> Option<u32> {
        self.export_type
    }

    /// Index of the exported function: locally defined functions are
    /// numbered after every imported function.
    pub fn export_function_index(&self) -> u32 {
        self.imports().map_or(0, ImportSection::function_count)
    }

    /// Serialize the module.
    pub fn generate(&self) -> CodegenResult<Vec<u8>> {
        let mut out = Vec::with_capacity(64);
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION);

        let mut order = SectionOrder::default();
        let mut emitted_export = false;

        for section in &self.sections {
            let id = section.id();
            if id == SectionId::Code {
                let type_index = self.export_type.ok_or(CodegenError::MissingExportType)?;
                order.advance(SectionId::Function)?;
                out.extend(self.function_section(type_index));
                order.advance(SectionId::Export)?;
                out.extend(self.export_section());
                emitted_export = true;
            }
            order.advance(id)?;
            out.extend(section.generate());
        }

        if self.export_type.is_some() && !emitted_export {
            return Err(CodegenError::MissingCodeSection);
        }

        debug!(
            bytes = out.len(),
            sections = self.sections.len(),
            export_type = ?self.export_type,
            "generated module"
        );
        Ok(out)
    }

    fn function_section(&self, type_index: u32) -> Vec<u8> {
        let mut body = Vec::new();
        leb128::encode(1, &mut body);
        leb128::encode(u64::from(type_index), &mut body);
        frame(SectionId::Function, &body)
    }

    fn export_section(&self) -> Vec<u8> {
        let mut body = Vec::new();
        leb128::encode(1, &mut body);
        leb128::encode_name(EXPORT_NAME, &mut body);
        body.push(KIND_FUNCTION);
        leb128::encode(u64::from(self.export_function_index()), &mut body);
        frame(SectionId::Export, &body)
    }
}

/// Tracks the last emitted section id; ids must strictly increase.
#[derive(Default)]
struct SectionOrder {
    previous: Option<SectionId>,
}

impl SectionOrder {
    fn advance(&mut self, section: SectionId) -> CodegenResult<()> {
        if let Some(previous) = self.previous {
            if section <= previous {
                return Err(CodegenError::SectionOrderViolation { section, previous });
            }
        }
        self.previous = Some(section);
        Ok(())
    }
}
