//! One live component instance and its lifecycle state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use satur_eval::{NativeFn, Value};
use satur_reactive::{
    ErrorHook, EventHandler, InstanceRef, Lifecycle, LifecycleHook, SetupFn, Signal, UpdateQueue,
};
use saturc::CompiledTemplate;

use crate::dom::NodeId;

/// A registered component: its compiled template and setup.
pub(crate) struct ComponentSpec {
    pub(crate) name: String,
    pub(crate) template: Arc<CompiledTemplate>,
    pub(crate) setup: Option<SetupFn>,
}

/// Which lifecycle callbacks may fire next. All start armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Armed {
    before_mount: bool,
    mounted: bool,
    before_unmount: bool,
    unmounted: bool,
}

impl Default for Armed {
    fn default() -> Self {
        Armed {
            before_mount: true,
            mounted: true,
            before_unmount: true,
            unmounted: true,
        }
    }
}

pub(crate) struct Instance {
    pub(crate) spec: Rc<ComponentSpec>,
    pub(crate) key: String,
    pub(crate) props: RefCell<Value>,
    pub(crate) signal: RefCell<Option<Signal>>,
    pub(crate) methods: RefCell<Vec<NativeFn>>,
    pub(crate) events: RefCell<FxHashMap<String, EventHandler>>,
    pub(crate) error_hook: RefCell<Option<ErrorHook>>,
    hooks: RefCell<FxHashMap<Lifecycle, Vec<LifecycleHook>>>,
    armed: Cell<Armed>,
    /// Cached mounted root; revalidated before use.
    pub(crate) root: Cell<Option<NodeId>>,
}

impl Instance {
    pub(crate) fn new(spec: Rc<ComponentSpec>, key: String, props: Value) -> Self {
        Instance {
            spec,
            key,
            props: RefCell::new(props),
            signal: RefCell::new(None),
            methods: RefCell::new(Vec::new()),
            events: RefCell::new(FxHashMap::default()),
            error_hook: RefCell::new(None),
            hooks: RefCell::new(FxHashMap::default()),
            armed: Cell::new(Armed::default()),
            root: Cell::new(None),
        }
    }

    pub(crate) fn instance_ref(&self) -> InstanceRef {
        InstanceRef::new(self.spec.name.as_str(), self.key.as_str())
    }

    pub(crate) fn signal(&self) -> Option<Signal> {
        self.signal.borrow().clone()
    }

    /// The template data record: props, then proxy state, then methods.
    pub(crate) fn data(&self) -> Value {
        let mut data = self.props.borrow().as_object().cloned().unwrap_or_default();
        if let Some(signal) = self.signal() {
            data.extend(signal.snapshot());
        }
        for method in self.methods.borrow().iter() {
            data.insert(method.name().to_owned(), Value::Function(method.clone()));
        }
        Value::from(data)
    }

    pub(crate) fn add_hook(&self, stage: Lifecycle, hook: LifecycleHook) {
        self.hooks.borrow_mut().entry(stage).or_default().push(hook);
    }

    fn hooks_for(&self, stage: Lifecycle) -> Vec<LifecycleHook> {
        self.hooks.borrow().get(&stage).cloned().unwrap_or_default()
    }

    /// Run the callbacks of `stage` now. The hook table is not borrowed
    /// while they run.
    pub(crate) fn fire(&self, stage: Lifecycle) {
        for hook in self.hooks_for(stage) {
            hook();
        }
    }

    /// Run the callbacks of `stage` when the next frame fires.
    fn fire_later(&self, stage: Lifecycle, queue: &UpdateQueue) {
        let hooks = self.hooks_for(stage);
        if hooks.is_empty() {
            return;
        }
        queue.defer(Box::new(move || {
            for hook in hooks {
                hook();
            }
        }));
    }

    /// Advance the mount state for a render with visibility `shown`.
    ///
    /// Showing fires `before_mount` once and defers `mounted`, then re-arms
    /// the unmount pair. Hiding a mounted instance fires `before_unmount`
    /// once and defers `unmounted`, then re-arms the mount pair. Hiding an
    /// instance that never mounted does nothing.
    pub(crate) fn transition(&self, shown: bool, queue: &UpdateQueue) {
        let mut armed = self.armed.get();
        if shown {
            if armed.before_mount {
                armed.before_mount = false;
                self.armed.set(armed);
                self.fire(Lifecycle::BeforeMount);
                armed = self.armed.get();
            }
            if armed.mounted {
                armed.mounted = false;
                self.fire_later(Lifecycle::Mounted, queue);
            }
            armed.before_unmount = true;
            armed.unmounted = true;
            self.armed.set(armed);
        } else if !armed.mounted {
            if armed.before_unmount {
                armed.before_unmount = false;
                self.armed.set(armed);
                self.fire(Lifecycle::BeforeUnmount);
                armed = self.armed.get();
            }
            if armed.unmounted {
                armed.unmounted = false;
                self.fire_later(Lifecycle::Unmounted, queue);
            }
            armed.before_mount = true;
            armed.mounted = true;
            self.armed.set(armed);
        }
    }

    pub(crate) fn is_mounted(&self) -> bool {
        !self.armed.get().mounted
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("component", &self.spec.name)
            .field("key", &self.key)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}
