use tramp_types::{FuncType, ValueType};
use wasmi::core::ValType;

/// The wasmi value type for a [`ValueType`].
pub fn val_type(ty: ValueType) -> ValType {
    match ty {
        ValueType::I32 => ValType::I32,
        ValueType::I64 => ValType::I64,
        ValueType::F32 => ValType::F32,
        ValueType::F64 => ValType::F64,
        ValueType::ExternRef => ValType::ExternRef,
    }
}

/// The wasmi function type for a [`FuncType`].
pub fn wasmi_func_type(ty: &FuncType) -> wasmi::FuncType {
    wasmi::FuncType::new(
        ty.parameters.iter().copied().map(val_type),
        ty.results.iter().copied().map(val_type),
    )
}
