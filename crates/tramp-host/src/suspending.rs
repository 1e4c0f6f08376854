//! Suspending imports: host functions that pause the calling wasm stack.

use std::sync::Arc;

use thiserror::Error;
use tramp_types::{FuncType, ValueType};
use wasmi::{AsContext, Caller, ExternRef, Func, Store, Val};

use crate::convert::wasmi_func_type;
use crate::suspender::{Pending, Suspender};

/// Host error a suspending import returns to pause the wasm stack.
#[derive(Debug, Error)]
#[error("call suspended on a pending host future")]
pub struct Suspended;

impl wasmi::core::HostError for Suspended {}

/// The leading `externref` did not hold a [`Suspender`].
#[derive(Debug, Error)]
#[error("suspender argument does not hold a suspender handle")]
pub struct NoSuspender;

impl wasmi::core::HostError for NoSuspender {}

/// The suspender stored in `handle`, if any.
pub(crate) fn suspender_from_ref(ctx: impl AsContext, handle: &ExternRef) -> Option<Arc<Suspender>> {
    handle
        .data(ctx.as_context())?
        .downcast_ref::<Arc<Suspender>>()
        .cloned()
}

/// Build the `env.suspending` import for a promising trampoline of type
/// `func_type`.
///
/// The import's type is `func_type` with a leading `externref`, the
/// suspender the trampoline read from its global. Each invocation hands the
/// remaining arguments to `host`, parks the returned future on that
/// suspender and pauses the stack until [`crate::Promising::call`] resumes
/// it with the future's values.
pub fn suspending_import<T, F>(store: &mut Store<T>, func_type: &FuncType, host: F) -> Func
where
    T: 'static,
    F: Fn(Vec<Val>) -> Pending + Send + Sync + 'static,
{
    let mut ty = FuncType::new([ValueType::ExternRef], []);
    ty.parameters.extend_from_slice(&func_type.parameters);
    ty.results.clone_from(&func_type.results);

    Func::new(
        store,
        wasmi_func_type(&ty),
        move |caller: Caller<'_, T>, params: &[Val], _results: &mut [Val]| {
            let suspender = match params.first() {
                Some(Val::ExternRef(handle)) => suspender_from_ref(&caller, handle),
                _ => None,
            };
            let Some(suspender) = suspender else {
                return Err(wasmi::Error::host(NoSuspender));
            };
            let args = params.get(1..).unwrap_or_default().to_vec();
            suspender.park(host(args));
            Err(wasmi::Error::host(Suspended))
        },
    )
}
