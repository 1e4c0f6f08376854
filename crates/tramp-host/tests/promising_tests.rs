//! End-to-end tests for promising trampolines driven through wasmi.
//!
//! Tests validate:
//! - a call is pending right after it starts and completes with the value the
//!   suspending import resolves to
//! - arguments reach the host future
//! - one suspender admits one in-flight call; distinct suspenders run concurrently
//! - dropping or failing a call releases its suspender
//! - a wrapper runs the export against its own suspender, whatever handle the
//!   export was first wrapped with

use std::pin::pin;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures::channel::oneshot;
use futures::executor::block_on;
use futures::{poll, FutureExt};
use tramp_host::{
    create_promising, instantiate_promising, load_promising, HostError, Pending, Promising,
    Suspender,
};
use tramp_types::map_signature;
use wasmi::{Engine, Store, Val};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Resolve to `values` after `ms` milliseconds, on another thread.
fn delayed(values: Vec<Val>, ms: u64) -> Pending {
    let (tx, rx) = oneshot::channel();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(ms));
        let _ = tx.send(values);
    });
    rx.map(|res| res.map_err(|_| HostError::Rejected("timer dropped".into())))
        .boxed()
}

/// Resolve once the returned sender fires.
fn manual() -> (oneshot::Sender<Vec<Val>>, Pending) {
    let (tx, rx) = oneshot::channel();
    let pending = rx
        .map(|res| res.map_err(|_| HostError::Rejected("sender dropped".into())))
        .boxed();
    (tx, pending)
}

fn promising(
    store: &mut Store<()>,
    signature: &str,
    suspender: &Arc<Suspender>,
    host: impl Fn(Vec<Val>) -> Pending + Send + Sync + 'static,
) -> Promising {
    instantiate_promising(store, &map_signature(signature).unwrap(), suspender, host)
        .expect("failed to instantiate promising trampoline")
}

// ══════════════════════════════════════════════════════════════════════════════
// Completion
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn resolves_to_delayed_value() {
    init_tracing();
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let suspender = Suspender::new();
    let seven = promising(&mut store, "i", &suspender, |_| delayed(vec![Val::I32(7)], 20));

    block_on(async {
        let mut call = pin!(seven.call(&mut store, &[]).unwrap());
        assert!(poll!(call.as_mut()).is_pending());
        assert!(suspender.is_in_flight());

        let results = call.await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].i32(), Some(7));
    });
    assert!(!suspender.is_in_flight());
}

#[test]
fn arguments_reach_the_host() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let suspender = Suspender::new();
    let sum = promising(&mut store, "jjj", &suspender, |args| {
        let a = args[0].i64().unwrap();
        let b = args[1].i64().unwrap();
        delayed(vec![Val::I64(a + b)], 5)
    });

    let results = block_on(sum.call(&mut store, &[Val::I64(40), Val::I64(2)]).unwrap()).unwrap();
    assert_eq!(results[0].i64(), Some(42));
}

#[test]
fn void_call_completes() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let suspender = Suspender::new();
    let void = promising(&mut store, "vi", &suspender, |_| delayed(Vec::new(), 1));

    let results = block_on(void.call(&mut store, &[Val::I32(1)]).unwrap()).unwrap();
    assert!(results.is_empty());
}

#[test]
fn wrapper_can_be_called_again_after_completion() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let suspender = Suspender::new();
    let echo = promising(&mut store, "ii", &suspender, |args| delayed(args, 1));

    for n in 0..3 {
        let results = block_on(echo.call(&mut store, &[Val::I32(n)]).unwrap()).unwrap();
        assert_eq!(results[0].i32(), Some(n));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Suspender discipline
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn shared_suspender_rejects_second_call() {
    let engine = Engine::default();
    let mut first_store = Store::new(&engine, ());
    let mut second_store = Store::new(&engine, ());
    let suspender = Suspender::new();

    let (tx, pending) = manual();
    let pending = std::sync::Mutex::new(Some(pending));
    let first = promising(&mut first_store, "i", &suspender, move |_| {
        pending.lock().unwrap().take().expect("called once")
    });
    let second = promising(&mut second_store, "i", &suspender, |_| delayed(vec![Val::I32(2)], 1));

    block_on(async {
        let mut call = pin!(first.call(&mut first_store, &[]).unwrap());
        assert!(poll!(call.as_mut()).is_pending());

        match second.call(&mut second_store, &[]) {
            Err(HostError::SuspenderBusy { id }) => assert_eq!(id, suspender.id()),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("second call acquired a busy suspender"),
        }

        tx.send(vec![Val::I32(1)]).unwrap();
        assert_eq!(call.await.unwrap()[0].i32(), Some(1));
    });

    let results = block_on(second.call(&mut second_store, &[]).unwrap()).unwrap();
    assert_eq!(results[0].i32(), Some(2));
}

#[test]
fn distinct_suspenders_run_concurrently() {
    let engine = Engine::default();
    let mut first_store = Store::new(&engine, ());
    let mut second_store = Store::new(&engine, ());
    let first = promising(&mut first_store, "i", &Suspender::new(), |_| {
        delayed(vec![Val::I32(1)], 20)
    });
    let second = promising(&mut second_store, "i", &Suspender::new(), |_| {
        delayed(vec![Val::I32(2)], 10)
    });

    let (a, b) = block_on(async {
        futures::join!(
            first.call(&mut first_store, &[]).unwrap(),
            second.call(&mut second_store, &[]).unwrap()
        )
    });
    assert_eq!(a.unwrap()[0].i32(), Some(1));
    assert_eq!(b.unwrap()[0].i32(), Some(2));
}

#[test]
fn dropping_a_pending_call_releases_the_suspender() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let suspender = Suspender::new();
    let (_tx, pending) = manual();
    let pending = std::sync::Mutex::new(Some(pending));
    let never = promising(&mut store, "i", &suspender, move |_| {
        pending.lock().unwrap().take().expect("called once")
    });

    block_on(async {
        let mut call = Box::pin(never.call(&mut store, &[]).unwrap());
        assert!(poll!(call.as_mut()).is_pending());
        assert!(suspender.is_in_flight());
        drop(call);
    });
    assert!(!suspender.is_in_flight());
}

#[test]
fn rejected_host_future_surfaces_and_releases() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let suspender = Suspender::new();
    let failing = promising(&mut store, "i", &suspender, |_| {
        async { Err::<Vec<Val>, _>(HostError::Rejected("no such file".into())) }.boxed()
    });

    let err = block_on(failing.call(&mut store, &[]).unwrap()).unwrap_err();
    assert!(matches!(err, HostError::Rejected(msg) if msg == "no such file"));
    assert!(!suspender.is_in_flight());
}

#[test]
fn global_suspender_drives_a_call() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let suspender = Suspender::global();
    let answer = promising(&mut store, "j", &suspender, |_| delayed(vec![Val::I64(9)], 1));
    assert_eq!(answer.suspender().id(), Suspender::global().id());

    let results = block_on(answer.call(&mut store, &[]).unwrap()).unwrap();
    assert_eq!(results[0].i64(), Some(9));
}

// ══════════════════════════════════════════════════════════════════════════════
// Suspender binding
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn rewrapping_with_another_suspender_uses_that_handle() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let linked = Suspender::new();
    let (tx, pending) = manual();
    let pending = std::sync::Mutex::new(Some(pending));
    let original = promising(&mut store, "i", &linked, move |_| {
        pending.lock().unwrap().take().expect("called once")
    });

    let other = Suspender::new();
    let rewrapped = create_promising(original.export(), Arc::clone(&other));

    block_on(async {
        let mut call = pin!(rewrapped.call(&mut store, &[]).unwrap());
        assert!(poll!(call.as_mut()).is_pending());
        assert!(other.is_in_flight());
        assert!(!linked.is_in_flight());

        tx.send(vec![Val::I32(7)]).unwrap();
        assert_eq!(call.await.unwrap()[0].i32(), Some(7));
    });
    assert!(!other.is_in_flight());
}

#[test]
fn wrappers_over_one_export_alternate() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let export = load_promising(&mut store, &map_signature("ii").unwrap(), |args| delayed(args, 1))
        .unwrap();
    let first = create_promising(export, Suspender::new());
    let second = create_promising(export, Suspender::new());

    for (n, wrapper) in [&first, &second, &first].into_iter().enumerate() {
        let results = block_on(wrapper.call(&mut store, &[Val::I32(n as i32)]).unwrap()).unwrap();
        assert_eq!(results[0].i32(), Some(n as i32));
        assert!(!wrapper.suspender().is_in_flight());
    }
}

#[test]
fn unwrapped_export_has_no_suspender() {
    let engine = Engine::default();
    let mut store = Store::new(&engine, ());
    let export = load_promising(&mut store, &map_signature("i").unwrap(), |_| {
        delayed(vec![Val::I32(1)], 1)
    })
    .unwrap();

    let mut results = [Val::I32(0)];
    assert!(export.func.call(&mut store, &[], &mut results).is_err());
}
