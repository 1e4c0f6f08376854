//! Instantiating generated trampolines against their host imports.
//!
//! | Trampoline | Imports under `env`                                         |
//! |------------|-------------------------------------------------------------|
//! | invoke     | `table`: funcref table of call targets                      |
//! | promising  | `suspending` function, `suspender` global (`mut externref`) |

use std::sync::Arc;

use tracing::debug;
use tramp_codegen::types::{
    EXPORT_NAME, HOST_NAMESPACE, SUSPENDER_IMPORT, SUSPENDING_IMPORT, TABLE_IMPORT,
};
use tramp_codegen::{create_invoke_module, create_promising_module};
use tramp_types::FuncType;
use wasmi::core::ValType;
use wasmi::{
    ExternRef, Func, FuncRef, Global, Instance, Linker, Module, Mutability, Store, Table,
    TableType, Val,
};

use crate::error::{HostError, HostResult};
use crate::promising::{create_promising, Promising, PromisingExport};
use crate::suspender::{Pending, Suspender};
use crate::suspending::suspending_import;

fn instantiate<T: 'static>(
    store: &mut Store<T>,
    bytes: &[u8],
    define: impl FnOnce(&mut Linker<T>) -> HostResult<()>,
) -> HostResult<Func> {
    let engine = store.engine().clone();
    let module = Module::new(&engine, bytes)?;
    let mut linker = Linker::<T>::new(&engine);
    define(&mut linker)?;
    let instance: Instance = linker.instantiate(&mut *store, &module)?.start(&mut *store)?;
    instance
        .get_func(&*store, EXPORT_NAME)
        .ok_or_else(|| HostError::MissingExport(EXPORT_NAME.to_string()))
}

/// Build a funcref table holding `funcs` at indices `0..funcs.len()`.
pub fn function_table<T>(store: &mut Store<T>, funcs: &[Func]) -> HostResult<Table> {
    let table = Table::new(
        &mut *store,
        TableType::new(ValType::FuncRef, funcs.len() as u32, None),
        Val::FuncRef(FuncRef::null()),
    )
    .map_err(|e| HostError::Link(e.to_string()))?;
    for (index, func) in funcs.iter().enumerate() {
        table
            .set(&mut *store, index as u64, Val::FuncRef(FuncRef::new(*func)))
            .map_err(|e| HostError::Link(e.to_string()))?;
    }
    Ok(table)
}

/// A loaded invoke trampoline.
#[derive(Debug, Clone, Copy)]
pub struct Invoker {
    func: Func,
}

impl Invoker {
    pub fn func(&self) -> Func {
        self.func
    }

    /// Call the table entry at `index` with `params`.
    pub fn call<T>(&self, store: &mut Store<T>, index: u32, params: &[Val]) -> HostResult<Vec<Val>> {
        let mut args = params.to_vec();
        args.push(Val::I32(index as i32));
        let mut results: Vec<Val> = self
            .func
            .ty(&*store)
            .results()
            .iter()
            .map(|ty| Val::default(*ty))
            .collect();
        self.func.call(&mut *store, &args, &mut results)?;
        Ok(results)
    }
}

/// Generate and instantiate the invoke trampoline for `signature`.
pub fn instantiate_invoke<T: 'static>(
    store: &mut Store<T>,
    signature: &str,
    table: Table,
) -> HostResult<Invoker> {
    let bytes = create_invoke_module(signature)?;
    let func = instantiate(store, &bytes, |linker| {
        linker
            .define(HOST_NAMESPACE, TABLE_IMPORT, table)
            .map_err(|e| HostError::Link(e.to_string()))?;
        Ok(())
    })?;
    debug!(signature, "instantiated invoke trampoline");
    Ok(Invoker { func })
}

/// Generate and instantiate the promising trampoline for `func_type`
/// without binding a suspender.
///
/// `host` backs the suspending import: it receives the export's arguments
/// and returns the future whose values the export eventually returns. The
/// `env.suspender` global starts out null; [`create_promising`] binds it.
pub fn load_promising<T, F>(
    store: &mut Store<T>,
    func_type: &FuncType,
    host: F,
) -> HostResult<PromisingExport>
where
    T: 'static,
    F: Fn(Vec<Val>) -> Pending + Send + Sync + 'static,
{
    let bytes = create_promising_module(func_type)?;
    let suspending = suspending_import(&mut *store, func_type, host);
    let suspender_global = Global::new(
        &mut *store,
        Val::ExternRef(ExternRef::null()),
        Mutability::Var,
    );

    let func = instantiate(store, &bytes, |linker| {
        linker
            .define(HOST_NAMESPACE, SUSPENDING_IMPORT, suspending)
            .map_err(|e| HostError::Link(e.to_string()))?;
        linker
            .define(HOST_NAMESPACE, SUSPENDER_IMPORT, suspender_global)
            .map_err(|e| HostError::Link(e.to_string()))?;
        Ok(())
    })?;
    debug!(%func_type, "instantiated promising trampoline");
    Ok(PromisingExport {
        func,
        suspender_global,
    })
}

/// [`load_promising`], then wrap the export with `suspender`.
pub fn instantiate_promising<T, F>(
    store: &mut Store<T>,
    func_type: &FuncType,
    suspender: &Arc<Suspender>,
    host: F,
) -> HostResult<Promising>
where
    T: 'static,
    F: Fn(Vec<Val>) -> Pending + Send + Sync + 'static,
{
    let export = load_promising(store, func_type, host)?;
    Ok(create_promising(export, Arc::clone(suspender)))
}
