//! The live setup API.

use std::rc::Rc;

use satur_eval::{NativeFn, Object, Value};
use satur_reactive::{
    check_props, ErrorHook, EventHandler, Hooks, Lifecycle, LifecycleHook, PropType, Signal,
    Watcher,
};

use super::instance::Instance;
use super::Inner;

/// Hooks a component's setup runs against on the client. Declarations land
/// directly on the instance.
pub(crate) struct ClientHooks<'r> {
    runtime: &'r Inner,
    instance: Rc<Instance>,
    /// Watchers declared before the state exists.
    pending_watchers: Vec<(String, Watcher)>,
}

impl<'r> ClientHooks<'r> {
    pub(crate) fn new(runtime: &'r Inner, instance: Rc<Instance>) -> Self {
        ClientHooks {
            runtime,
            instance,
            pending_watchers: Vec::new(),
        }
    }

    /// Run `setup` once for the instance.
    pub(crate) fn run(mut self) {
        let Some(setup) = self.instance.spec.setup.clone() else {
            return;
        };
        setup(&mut self);
        if !self.pending_watchers.is_empty() {
            tracing::warn!(
                instance = %self.instance.instance_ref(),
                count = self.pending_watchers.len(),
                "watchers declared without state, dropped"
            );
        }
    }
}

impl Hooks for ClientHooks<'_> {
    fn def_props(&mut self) -> Value {
        self.instance.props.borrow().clone()
    }

    fn def_prop_types(&mut self, types: &[(&str, PropType)]) -> Value {
        let mut props = self
            .instance
            .props
            .borrow()
            .as_object()
            .cloned()
            .unwrap_or_default();
        for warning in check_props(types, &mut props) {
            tracing::warn!(component = %self.instance.spec.name, %warning, "prop check failed");
        }
        let props = Value::from(props);
        self.instance.props.replace(props.clone());
        props
    }

    fn def_proxy(&mut self, initial: Object) -> Signal {
        let signal = Signal::new(
            self.instance.instance_ref(),
            initial,
            Some(self.runtime.queue.clone()),
        );
        for (key, watcher) in self.pending_watchers.drain(..) {
            signal.watch(&key, watcher);
        }
        self.instance.signal.replace(Some(signal.clone()));
        signal
    }

    fn def_methods(&mut self, methods: Vec<NativeFn>) {
        self.instance.methods.borrow_mut().extend(methods);
    }

    fn def_events(&mut self, events: Vec<(String, EventHandler)>) {
        self.instance.events.borrow_mut().extend(events);
    }

    fn def_watch(&mut self, key: &str, watcher: Watcher) {
        match self.instance.signal() {
            Some(signal) => signal.watch(key, watcher),
            None => self.pending_watchers.push((key.to_owned(), watcher)),
        }
    }

    fn def_error(&mut self, handler: ErrorHook) {
        self.instance.error_hook.replace(Some(handler));
    }

    fn def_load(&mut self, load: Box<dyn FnOnce()>) {
        load();
    }

    fn use_signal(&self, instance_key: &str) -> Option<Signal> {
        self.runtime.instance(instance_key).and_then(|i| i.signal())
    }

    fn on(&mut self, stage: Lifecycle, hook: LifecycleHook) {
        self.instance.add_hook(stage, hook);
    }
}
