//! Observable per-instance state.
//!
//! [`ReactiveState`] holds one component instance's data object and its
//! watcher table. Every write runs the watcher for the written key with the
//! old and new value; a watcher may return a replacement that is stored
//! instead. A write that asks for a refresh marks the instance dirty in the
//! [`UpdateQueue`]; the render itself always happens on a later frame.
//!
//! No `RefCell` borrow is held while a watcher runs, so watchers may read
//! and write the same state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use satur_eval::{EvalError, Object, Value};

use crate::{InstanceRef, UpdateQueue};

/// `(old, new) -> replacement`.
pub type Watcher = Rc<dyn Fn(&Value, &Value) -> Result<Option<Value>, EvalError>>;

/// Wrap a closure as a [`Watcher`].
pub fn watcher<F>(f: F) -> Watcher
where
    F: Fn(&Value, &Value) -> Result<Option<Value>, EvalError> + 'static,
{
    Rc::new(f)
}

pub struct ReactiveState {
    instance: InstanceRef,
    data: RefCell<Object>,
    watchers: RefCell<FxHashMap<String, Watcher>>,
    /// `None` for server-side collection, where nothing re-renders.
    queue: Option<UpdateQueue>,
}

impl ReactiveState {
    fn write(&self, key: &str, new: Value) -> Result<(), EvalError> {
        let old = self.data.borrow().get(key).cloned().unwrap_or_default();
        self.data.borrow_mut().insert(key.to_owned(), new.clone());

        let watcher = self.watchers.borrow().get(key).cloned();
        let Some(watcher) = watcher else {
            return Ok(());
        };
        match watcher(&old, &new) {
            Ok(Some(replacement)) => {
                self.data.borrow_mut().insert(key.to_owned(), replacement);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(error) => {
                tracing::debug!(instance = %self.instance, key, %error, "watcher failed, write undone");
                self.data.borrow_mut().insert(key.to_owned(), old);
                Err(error)
            }
        }
    }
}

/// Handle to one instance's [`ReactiveState`].
///
/// Cloning shares the state. Reads never schedule; writes schedule a
/// re-render unless made through [`Signal::update`] with
/// `should_render == false`.
#[derive(Clone)]
pub struct Signal(Rc<ReactiveState>);

impl Signal {
    pub fn new(instance: InstanceRef, initial: Object, queue: Option<UpdateQueue>) -> Self {
        Signal(Rc::new(ReactiveState {
            instance,
            data: RefCell::new(initial),
            watchers: RefCell::new(FxHashMap::default()),
            queue,
        }))
    }

    /// State that never schedules renders (server-side collection).
    pub fn detached(instance: InstanceRef, initial: Object) -> Self {
        Self::new(instance, initial, None)
    }

    pub fn instance(&self) -> &InstanceRef {
        &self.0.instance
    }

    /// Current value of `key`; `Null` when unset.
    pub fn get(&self, key: &str) -> Value {
        self.0.data.borrow().get(key).cloned().unwrap_or_default()
    }

    pub fn snapshot(&self) -> Object {
        self.0.data.borrow().clone()
    }

    pub fn to_value(&self) -> Value {
        Value::from(self.snapshot())
    }

    /// Write one key and schedule a re-render.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), EvalError> {
        self.0.write(key, value.into())?;
        self.schedule();
        Ok(())
    }

    /// Write several keys. Each changed key runs its watcher. A failing
    /// watcher undoes its own key and stops the batch; keys written before
    /// it stay written and still schedule the refresh.
    pub fn update<I>(&self, partial: I, should_render: bool) -> Result<(), EvalError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut written = 0_usize;
        let mut outcome = Ok(());
        for (key, value) in partial {
            if let Err(error) = self.0.write(&key, value) {
                outcome = Err(error);
                break;
            }
            written += 1;
        }
        if should_render && (outcome.is_ok() || written > 0) {
            self.schedule();
        }
        outcome
    }

    /// [`Signal::update`] with a refresh.
    pub fn update_all<I>(&self, partial: I) -> Result<(), EvalError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.update(partial, true)
    }

    /// Install the watcher for `key`, replacing any previous one.
    pub fn watch(&self, key: &str, watcher: Watcher) {
        self.0.watchers.borrow_mut().insert(key.to_owned(), watcher);
    }

    pub fn ptr_eq(&self, other: &Signal) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn schedule(&self) {
        if let Some(queue) = &self.0.queue {
            queue.schedule(self.0.instance.clone());
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("instance", &self.0.instance)
            .field("data", &self.0.data.borrow())
            .finish_non_exhaustive()
    }
}
