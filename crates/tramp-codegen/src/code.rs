//! Code section builder: a single function body and its instruction stream.
//!
//! Only the instruction subset trampolines need is supported: local and
//! global access, typed constants, direct calls and indirect calls through
//! table 0.

use tramp_types::{FuncType, TypeError, ValueType};

use crate::leb128;
use crate::section::SectionEncoder;
use crate::types::*;

/// A typed constant for `*.const`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Const {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Const {
    pub fn value_type(self) -> ValueType {
        match self {
            Const::I32(_) => ValueType::I32,
            Const::I64(_) => ValueType::I64,
            Const::F32(_) => ValueType::F32,
            Const::F64(_) => ValueType::F64,
        }
    }

    /// Reinterpret the low bits of `bits` as a constant of type `ty`.
    pub fn from_bits(ty: ValueType, bits: u64) -> Result<Self, TypeError> {
        match ty {
            ValueType::I32 => Ok(Const::I32(bits as u32 as i32)),
            ValueType::I64 => Ok(Const::I64(bits as i64)),
            ValueType::F32 => Ok(Const::F32(f32::from_bits(bits as u32))),
            ValueType::F64 => Ok(Const::F64(f64::from_bits(bits))),
            ValueType::ExternRef => Err(TypeError::UnsupportedValueType(format!(
                "{ty} has no constant form"
            ))),
        }
    }
}

/// Builds the one function body of a generated module.
///
/// Locals beyond the parameters are declared with [`CodeSection::add_local`];
/// consecutive locals of the same type share one declaration group.
#[derive(Debug, Clone)]
pub struct CodeSection {
    func_type: FuncType,
    locals: Vec<(u32, ValueType)>,
    instructions: Vec<u8>,
}

impl CodeSection {
    pub fn new(func_type: FuncType) -> Self {
        Self {
            func_type,
            locals: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn func_type(&self) -> &FuncType {
        &self.func_type
    }

    /// Declare a new local; returns its local index.
    pub fn add_local(&mut self, ty: ValueType) -> u32 {
        let declared: u32 = self.locals.iter().map(|(count, _)| count).sum();
        let index = self.func_type.parameters.len() as u32 + declared;
        if let Some((count, last)) = self.locals.last_mut() {
            if *last == ty {
                *count += 1;
                return index;
            }
        }
        self.locals.push((1, ty));
        index
    }

    /// The encoded instruction stream, without the body terminator.
    pub fn instructions(&self) -> &[u8] {
        &self.instructions
    }

    fn op_index(&mut self, opcode: u8, index: u32) -> &mut Self {
        self.instructions.push(opcode);
        leb128::encode(u64::from(index), &mut self.instructions);
        self
    }

    pub fn local_get(&mut self, index: u32) -> &mut Self {
        self.op_index(OP_LOCAL_GET, index)
    }

    pub fn local_set(&mut self, index: u32) -> &mut Self {
        self.op_index(OP_LOCAL_SET, index)
    }

    pub fn local_tee(&mut self, index: u32) -> &mut Self {
        self.op_index(OP_LOCAL_TEE, index)
    }

    pub fn global_get(&mut self, index: u32) -> &mut Self {
        self.op_index(OP_GLOBAL_GET, index)
    }

    pub fn global_set(&mut self, index: u32) -> &mut Self {
        self.op_index(OP_GLOBAL_SET, index)
    }

    /// Push a typed constant. Float immediates are fixed-width little-endian.
    pub fn constant(&mut self, value: Const) -> &mut Self {
        let code = &mut self.instructions;
        match value {
            Const::I32(v) => {
                code.push(OP_I32_CONST);
                leb128::encode_signed(i64::from(v), code);
            }
            Const::I64(v) => {
                code.push(OP_I64_CONST);
                leb128::encode_signed(v, code);
            }
            Const::F32(v) => {
                code.push(OP_F32_CONST);
                code.extend_from_slice(&v.to_le_bytes());
            }
            Const::F64(v) => {
                code.push(OP_F64_CONST);
                code.extend_from_slice(&v.to_le_bytes());
            }
        }
        self
    }

    pub fn call(&mut self, function_index: u32) -> &mut Self {
        self.op_index(OP_CALL, function_index)
    }

    /// `call_indirect` through table 0.
    pub fn call_indirect(&mut self, type_index: u32) -> &mut Self {
        self.op_index(OP_CALL_INDIRECT, type_index);
        leb128::encode(0, &mut self.instructions);
        self
    }

    fn encode_function(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.instructions.len() + 8);
        leb128::encode(self.locals.len() as u64, &mut body);
        for (count, ty) in &self.locals {
            leb128::encode(u64::from(*count), &mut body);
            body.push(ty.byte());
        }
        body.extend_from_slice(&self.instructions);
        body.push(OP_END);
        body
    }
}

impl SectionEncoder for CodeSection {
    fn id(&self) -> SectionId {
        SectionId::Code
    }

    fn encode_body(&self, sink: &mut Vec<u8>) {
        let function = self.encode_function();
        leb128::encode(1, sink);
        leb128::encode(function.len() as u64, sink);
        sink.extend_from_slice(&function);
    }
}
