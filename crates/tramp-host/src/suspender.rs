//! The suspender handle.
//!
//! A suspender stands for one suspension context. While a promising call
//! holds it (from the first poll until the call resumes and returns) no other
//! call may use it; [`Suspender::acquire`] enforces that with a
//! [`SuspenderGuard`].

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use futures::future::BoxFuture;
use tracing::trace;
use wasmi::Val;

use crate::error::{HostError, HostResult};

/// A host future a suspending import hands back; its values become the
/// import's results when the wasm stack resumes.
pub type Pending = BoxFuture<'static, HostResult<Vec<Val>>>;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);
static GLOBAL: OnceLock<Arc<Suspender>> = OnceLock::new();

pub struct Suspender {
    id: u64,
    in_flight: AtomicBool,
    parked: Mutex<Option<Pending>>,
}

impl Suspender {
    /// A fresh handle, distinct from every other.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            in_flight: AtomicBool::new(false),
            parked: Mutex::new(None),
        })
    }

    /// The process-wide shared handle.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(Suspender::new))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether a call currently holds this handle.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the handle for one call.
    pub fn acquire(self: &Arc<Self>) -> HostResult<SuspenderGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| HostError::SuspenderBusy { id: self.id })?;
        trace!(suspender = self.id, "acquired");
        Ok(SuspenderGuard {
            suspender: Arc::clone(self),
        })
    }

    pub(crate) fn park(&self, pending: Pending) {
        trace!(suspender = self.id, "parked host future");
        *self.slot() = Some(pending);
    }

    pub(crate) fn take_parked(&self) -> Option<Pending> {
        self.slot().take()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Pending>> {
        self.parked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Suspender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suspender")
            .field("id", &self.id)
            .field("in_flight", &self.is_in_flight())
            .finish_non_exhaustive()
    }
}

/// Exclusive use of a [`Suspender`]; released on drop.
#[derive(Debug)]
pub struct SuspenderGuard {
    suspender: Arc<Suspender>,
}

impl SuspenderGuard {
    pub fn suspender(&self) -> &Arc<Suspender> {
        &self.suspender
    }
}

impl Drop for SuspenderGuard {
    fn drop(&mut self) {
        // A call dropped mid-suspension abandons its stack; its future goes too.
        self.suspender.take_parked();
        self.suspender.in_flight.store(false, Ordering::Release);
        trace!(suspender = self.suspender.id, "released");
    }
}
