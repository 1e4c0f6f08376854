//! The promising wrapper around a trampoline export.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, trace};
use wasmi::{ExternRef, Func, Global, ResumableCall, Store, Val};

use crate::error::{HostError, HostResult};
use crate::suspender::Suspender;
use crate::suspending::suspender_from_ref;

/// A loaded promising trampoline: its export and the instance's
/// `env.suspender` global.
#[derive(Debug, Clone, Copy)]
pub struct PromisingExport {
    pub func: Func,
    pub suspender_global: Global,
}

/// A trampoline export that completes asynchronously.
#[derive(Debug, Clone)]
pub struct Promising {
    export: PromisingExport,
    suspender: Arc<Suspender>,
}

/// Wrap `raw_export` so each call runs against `suspender` and yields a
/// future of the export's results.
pub fn create_promising(raw_export: PromisingExport, suspender: Arc<Suspender>) -> Promising {
    Promising {
        export: raw_export,
        suspender,
    }
}

impl Promising {
    pub fn func(&self) -> Func {
        self.export.func
    }

    pub fn export(&self) -> PromisingExport {
        self.export
    }

    pub fn suspender(&self) -> &Arc<Suspender> {
        &self.suspender
    }

    /// Start a call.
    ///
    /// The suspender is claimed immediately and held until the returned
    /// future completes or is dropped; claiming a suspender that another
    /// call still holds fails with [`HostError::SuspenderBusy`]. On the first
    /// poll the instance's suspender global is pointed at this wrapper's
    /// suspender and the wasm code runs; it runs again after every parked
    /// host future resolves.
    pub fn call<'a, T>(
        &'a self,
        store: &'a mut Store<T>,
        params: &'a [Val],
    ) -> HostResult<impl Future<Output = HostResult<Vec<Val>>> + 'a> {
        let guard = self.suspender.acquire()?;
        Ok(async move {
            let _guard = guard;
            self.bind_suspender(store)?;
            let mut results: Vec<Val> = self
                .export
                .func
                .ty(&*store)
                .results()
                .iter()
                .map(|ty| Val::default(*ty))
                .collect();

            let mut call = self
                .export
                .func
                .call_resumable(&mut *store, params, &mut results)?;
            let mut suspensions = 0usize;
            while let ResumableCall::Resumable(invocation) = call {
                let pending = self.suspender.take_parked().ok_or(HostError::NothingParked)?;
                suspensions += 1;
                trace!(suspender = self.suspender.id(), suspensions, "suspended");
                let resolved = pending.await?;
                trace!(suspender = self.suspender.id(), "resuming");
                call = invocation.resume(&mut *store, &resolved, &mut results)?;
            }

            debug!(suspender = self.suspender.id(), suspensions, "promising call completed");
            Ok(results)
        })
    }

    /// Store this wrapper's suspender in the instance's global unless it
    /// already holds it.
    fn bind_suspender<T>(&self, store: &mut Store<T>) -> HostResult<()> {
        let global = self.export.suspender_global;
        if let Val::ExternRef(current) = global.get(&*store) {
            if let Some(bound) = suspender_from_ref(&*store, &current) {
                if Arc::ptr_eq(&bound, &self.suspender) {
                    return Ok(());
                }
            }
        }
        let handle = ExternRef::new(&mut *store, Arc::clone(&self.suspender));
        global
            .set(&mut *store, Val::ExternRef(handle))
            .map_err(|e| HostError::Link(e.to_string()))?;
        trace!(suspender = self.suspender.id(), "bound suspender global");
        Ok(())
    }
}
