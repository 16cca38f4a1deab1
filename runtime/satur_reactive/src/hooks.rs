//! The component setup API.
//!
//! A component's setup function receives a `&mut dyn Hooks` and declares
//! its props, reactive state, methods, events, watchers, error fallback and
//! lifecycle callbacks through it. The same setup runs on the server against
//! a collecting implementation (only initial state and methods matter there)
//! and on the client against the live runtime.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use satur_eval::{EvalError, NativeFn, Object, Value};

use crate::{Signal, Watcher};

/// A component's setup function.
pub type SetupFn = Arc<dyn Fn(&mut dyn Hooks) + Send + Sync>;

/// Handler for a DOM event, called with the event and the arguments parsed
/// from the `on<event>` attribute.
pub type EventHandler = Rc<dyn Fn(&EventPayload, &[Value]) -> Result<(), EvalError>>;

/// Turns a render failure into fallback markup.
pub type ErrorHook = Rc<dyn Fn(&EvalError) -> String>;

pub type LifecycleHook = Rc<dyn Fn()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    BeforeMount,
    Mounted,
    BeforeUnmount,
    Unmounted,
    BeforeUpdate,
    Updated,
}

impl Lifecycle {
    pub const ALL: [Lifecycle; 6] = [
        Lifecycle::BeforeMount,
        Lifecycle::Mounted,
        Lifecycle::BeforeUnmount,
        Lifecycle::Unmounted,
        Lifecycle::BeforeUpdate,
        Lifecycle::Updated,
    ];
}

/// A dispatched DOM event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventPayload {
    /// Event name without the `on` prefix (`click`, `input`).
    pub event: String,
    /// Live value of the target, for form controls.
    pub value: Option<String>,
}

impl EventPayload {
    pub fn new(event: impl Into<String>) -> Self {
        EventPayload {
            event: event.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Declared type of a prop. Checked with script `typeof` semantics, so
/// arrays and null count as objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Function,
}

impl PropType {
    fn expected(self) -> &'static str {
        match self {
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Boolean => "boolean",
            PropType::Array | PropType::Object => "object",
            PropType::Function => "function",
        }
    }
}

/// `typeof` of a value.
pub fn typeof_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Int(_) | Value::Float(_) => "number",
        Value::Str(_) => "string",
        Value::Function(_) => "function",
        Value::Null | Value::Array(_) | Value::Object(_) | Value::Markup(_) => "object",
    }
}

/// A prop that did not match its declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropWarning {
    Missing {
        key: String,
    },
    Mismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl fmt::Display for PropWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropWarning::Missing { key } => write!(
                f,
                "the property '{key}' is not defined; ensure it is passed as a prop"
            ),
            PropWarning::Mismatch {
                key,
                expected,
                actual,
            } => write!(
                f,
                "property '{key}' expects type '{expected}', but received type '{actual}'"
            ),
        }
    }
}

/// Check `props` against declared types. Missing props are filled with an
/// empty string; mismatches are only reported.
pub fn check_props(types: &[(&str, PropType)], props: &mut Object) -> Vec<PropWarning> {
    let mut warnings = Vec::new();
    for (key, ty) in types {
        let Some(value) = props.get(*key) else {
            warnings.push(PropWarning::Missing {
                key: (*key).to_owned(),
            });
            props.insert((*key).to_owned(), Value::from(""));
            continue;
        };
        let actual = typeof_name(value);
        if actual != ty.expected() {
            warnings.push(PropWarning::Mismatch {
                key: (*key).to_owned(),
                expected: ty.expected(),
                actual,
            });
        }
    }
    warnings
}

/// What a setup function can declare.
pub trait Hooks {
    /// Props passed by the parent.
    fn def_props(&mut self) -> Value;

    /// Props after checking them against declared types.
    fn def_prop_types(&mut self, types: &[(&str, PropType)]) -> Value;

    /// Create the instance's reactive state.
    fn def_proxy(&mut self, initial: Object) -> Signal;

    /// Functions callable from the template by name.
    fn def_methods(&mut self, methods: Vec<NativeFn>);

    fn def_events(&mut self, events: Vec<(String, EventHandler)>);

    /// Watch one key of the state created by [`Hooks::def_proxy`].
    fn def_watch(&mut self, key: &str, watcher: Watcher);

    /// Fallback markup for a failed render of this instance.
    fn def_error(&mut self, handler: ErrorHook);

    /// Code that runs once on the client only.
    fn def_load(&mut self, load: Box<dyn FnOnce()>);

    /// Another instance's state.
    fn use_signal(&self, instance_key: &str) -> Option<Signal>;

    fn on(&mut self, stage: Lifecycle, hook: LifecycleHook);

    fn before_mount(&mut self, hook: LifecycleHook) {
        self.on(Lifecycle::BeforeMount, hook);
    }

    fn mounted(&mut self, hook: LifecycleHook) {
        self.on(Lifecycle::Mounted, hook);
    }

    fn before_unmount(&mut self, hook: LifecycleHook) {
        self.on(Lifecycle::BeforeUnmount, hook);
    }

    fn unmounted(&mut self, hook: LifecycleHook) {
        self.on(Lifecycle::Unmounted, hook);
    }

    fn before_update(&mut self, hook: LifecycleHook) {
        self.on(Lifecycle::BeforeUpdate, hook);
    }

    fn updated(&mut self, hook: LifecycleHook) {
        self.on(Lifecycle::Updated, hook);
    }
}
