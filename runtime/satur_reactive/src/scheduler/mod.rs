//! Frame-batched update scheduling.
//!
//! Writes to reactive state mark their instance dirty here. The first
//! insertion into an empty, unarmed queue asks the host for a frame; every
//! later insertion before the frame fires only joins the set. When the frame
//! fires the host calls [`UpdateQueue::take_frame`], which clears and disarms
//! the queue before anything re-renders, so work scheduled during the frame
//! lands in the next one.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Host hook for "call me back on the next frame".
pub trait FrameRequester {
    fn request_frame(&self);
}

/// One component instance: its component name and instance key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceRef {
    pub component: String,
    pub key: String,
}

impl InstanceRef {
    pub fn new(component: impl Into<String>, key: impl Into<String>) -> Self {
        InstanceRef {
            component: component.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.key)
    }
}

/// Callback deferred to the next frame (`mounted`, `unmounted`).
pub type Deferred = Box<dyn FnOnce()>;

/// Work taken out of the queue when a frame fires.
pub struct Frame {
    /// Instances to re-render, in first-dirtied order.
    pub updates: Vec<InstanceRef>,
    pub deferred: Vec<Deferred>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.deferred.is_empty()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("updates", &self.updates)
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

#[derive(Default)]
struct QueueState {
    /// Keyed by instance key.
    pending: IndexMap<String, InstanceRef>,
    deferred: Vec<Deferred>,
    armed: bool,
}

/// Shared handle to the pending-update set.
#[derive(Clone)]
pub struct UpdateQueue {
    state: Rc<RefCell<QueueState>>,
    frames: Rc<dyn FrameRequester>,
}

impl UpdateQueue {
    pub fn new(frames: Rc<dyn FrameRequester>) -> Self {
        UpdateQueue {
            state: Rc::new(RefCell::new(QueueState::default())),
            frames,
        }
    }

    /// Mark an instance dirty. Returns `false` when it was already pending.
    pub fn schedule(&self, instance: InstanceRef) -> bool {
        let arm = {
            let mut state = self.state.borrow_mut();
            if state.pending.contains_key(&instance.key) {
                return false;
            }
            tracing::trace!(%instance, "update scheduled");
            state.pending.insert(instance.key.clone(), instance);
            !std::mem::replace(&mut state.armed, true)
        };
        if arm {
            self.frames.request_frame();
        }
        true
    }

    /// Run `callback` when the next frame fires.
    pub fn defer(&self, callback: Deferred) {
        let arm = {
            let mut state = self.state.borrow_mut();
            state.deferred.push(callback);
            !std::mem::replace(&mut state.armed, true)
        };
        if arm {
            self.frames.request_frame();
        }
    }

    /// Drain the queue for the firing frame and disarm it.
    pub fn take_frame(&self) -> Frame {
        let mut state = self.state.borrow_mut();
        state.armed = false;
        Frame {
            updates: std::mem::take(&mut state.pending).into_values().collect(),
            deferred: std::mem::take(&mut state.deferred),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state.borrow().armed
    }

    pub fn pending_len(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.state.borrow().pending.contains_key(key)
    }
}

impl fmt::Debug for UpdateQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("UpdateQueue")
            .field("pending", &state.pending.keys().collect::<Vec<_>>())
            .field("deferred", &state.deferred.len())
            .field("armed", &state.armed)
            .finish()
    }
}

/// A frame requester that only counts requests; the caller fires frames by
/// hand. Used by tests and headless hosts.
#[derive(Debug, Default)]
pub struct ManualFrames {
    requests: Cell<usize>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl FrameRequester for ManualFrames {
    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}
