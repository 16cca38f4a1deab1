//! Satur Reactive - component state and update scheduling.
//!
//! # Architecture
//!
//! - `state`: [`ReactiveState`], one instance's observable data, and the
//!   [`Signal`] handle components read and write it through
//! - `scheduler`: [`UpdateQueue`], the per-frame set of instances waiting to
//!   re-render, armed through a host [`FrameRequester`]
//! - `hooks`: the [`Hooks`] setup API a component's setup function runs
//!   against, on the server (collecting) and on the client (live)
//!
//! Everything here is single-threaded: state is `Rc`/`RefCell` and the only
//! suspension point is the next frame.

mod hooks;
mod scheduler;
mod state;

pub use hooks::{
    check_props, typeof_name, ErrorHook, EventHandler, EventPayload, Hooks, Lifecycle,
    LifecycleHook, PropType, PropWarning, SetupFn,
};
pub use scheduler::{Deferred, Frame, FrameRequester, InstanceRef, ManualFrames, UpdateQueue};
pub use state::{watcher, ReactiveState, Signal, Watcher};
