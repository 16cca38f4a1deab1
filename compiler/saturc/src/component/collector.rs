//! Server-side setup collector.
//!
//! Runs a component's setup function to learn the data its template renders
//! with: the props, then the proxy's initial state, then the methods, each
//! layer overriding the previous one. Client-only hooks are accepted and
//! dropped.

use satur_eval::{NativeFn, Object, Value};
use satur_reactive::{
    check_props, ErrorHook, EventHandler, Hooks, InstanceRef, Lifecycle, LifecycleHook, PropType,
    Signal, Watcher,
};

pub(crate) struct CollectingHooks {
    instance: InstanceRef,
    props: Object,
    proxy: Option<Signal>,
    methods: Vec<NativeFn>,
}

impl CollectingHooks {
    pub(crate) fn new(instance: InstanceRef, props: &Value) -> Self {
        CollectingHooks {
            instance,
            props: props.as_object().cloned().unwrap_or_default(),
            proxy: None,
            methods: Vec::new(),
        }
    }

    /// The template data record.
    pub(crate) fn into_data(self) -> Value {
        let mut data = self.props;
        if let Some(proxy) = &self.proxy {
            data.extend(proxy.snapshot());
        }
        for method in self.methods {
            data.insert(method.name().to_owned(), Value::Function(method));
        }
        Value::from(data)
    }
}

impl Hooks for CollectingHooks {
    fn def_props(&mut self) -> Value {
        Value::from(self.props.clone())
    }

    fn def_prop_types(&mut self, types: &[(&str, PropType)]) -> Value {
        for warning in check_props(types, &mut self.props) {
            tracing::warn!(component = %self.instance.component, %warning, "prop check failed");
        }
        Value::from(self.props.clone())
    }

    fn def_proxy(&mut self, initial: Object) -> Signal {
        let signal = Signal::detached(self.instance.clone(), initial);
        self.proxy = Some(signal.clone());
        signal
    }

    fn def_methods(&mut self, methods: Vec<NativeFn>) {
        self.methods.extend(methods);
    }

    fn def_events(&mut self, _events: Vec<(String, EventHandler)>) {}

    fn def_watch(&mut self, _key: &str, _watcher: Watcher) {}

    fn def_error(&mut self, _handler: ErrorHook) {}

    fn def_load(&mut self, _load: Box<dyn FnOnce()>) {}

    fn use_signal(&self, _instance_key: &str) -> Option<Signal> {
        None
    }

    fn on(&mut self, _stage: Lifecycle, _hook: LifecycleHook) {}
}
