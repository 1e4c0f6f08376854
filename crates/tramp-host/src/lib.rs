//! Host side of the trampoline assembler.
//!
//! Generated modules are loaded with `wasmi`. Promising trampolines are
//! driven with resumable calls: the suspending import parks a host future on
//! the [`Suspender`] and returns a host error, which pauses the wasm stack;
//! [`Promising::call`] awaits the parked future and resumes the stack with
//! its values.
//!
//! ```text
//! Promising::call ─► trampoline ─► env.suspending ─► park future, pause
//!        ▲                                                   │
//!        └──────────── resume with resolved values ◄── await ┘
//! ```
//!
//! A suspender admits one in-flight call at a time. Concurrent promising
//! calls each need their own [`Suspender`]. The trampoline instance does not
//! own a suspender: each [`Promising`] stores its own handle in the
//! instance's `env.suspender` global before running, and the suspending
//! import parks on whichever handle it is passed.

mod convert;
pub mod error;
pub mod loader;
pub mod promising;
pub mod suspender;
pub mod suspending;

pub use convert::{val_type, wasmi_func_type};
pub use error::{HostError, HostResult};
pub use loader::{
    function_table, instantiate_invoke, instantiate_promising, load_promising, Invoker,
};
pub use promising::{create_promising, Promising, PromisingExport};
pub use suspender::{Pending, Suspender, SuspenderGuard};
pub use suspending::{suspending_import, NoSuspender, Suspended};
