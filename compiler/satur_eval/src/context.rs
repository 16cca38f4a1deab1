//! The render calling convention.
//!
//! A compiled template is invoked as
//! `render(ctx, data, children, instance_key, host_props, is_server)`.
//! `ctx` supplies escaping, display, loop normalization and block
//! invocation; `children` resolves nested components. Compiled programs and
//! hand-written fragments both implement [`RenderFunction`].

use std::cell::RefCell;
use std::fmt;

use indexmap::IndexMap;

use crate::display;
use crate::{component_not_found, EvalError, EvalResult, Value};

/// Services a render function calls back into.
///
/// Only block invocation has no sensible default; the rest delegate to the
/// functions in this crate.
pub trait CallContext {
    fn escape_html(&self, text: &str) -> String {
        display::escape_html(text).into_owned()
    }

    /// Unescaped interpolation.
    fn display(&self, value: &Value) -> String {
        display::display_raw(value)
    }

    /// Escaped interpolation.
    fn display_safe(&self, value: &Value) -> String {
        display::display_safe(value)
    }

    fn format_loop(&self, value: &Value) -> Result<Vec<(Value, Value)>, EvalError> {
        display::format_loop(value)
    }

    /// Visibility of the component being rendered.
    fn visible(&self) -> bool {
        true
    }

    /// Render the named block with an argument object.
    fn render_block(&self, name: &str, args: &Value) -> Result<String, EvalError>;

    /// Render a nested component through the child renderers.
    fn render_component(
        &self,
        children: &dyn ChildRenderers,
        reference: &str,
        props: &Value,
        visible: bool,
    ) -> EvalResult {
        children.render_child(reference, props, visible)
    }
}

/// Resolves and renders nested components.
pub trait ChildRenderers {
    /// Render `reference` with `props`. The result is normally
    /// [`Value::Markup`], which passes through escaping untouched.
    fn render_child(&self, reference: &str, props: &Value, visible: bool) -> EvalResult;
}

/// Child renderers for templates that have no components.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoChildren;

impl ChildRenderers for NoChildren {
    fn render_child(&self, reference: &str, _props: &Value, _visible: bool) -> EvalResult {
        Err(component_not_found(reference))
    }
}

/// Call context with the default conversions and no blocks registered.
/// Unknown blocks render as nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainContext;

impl CallContext for PlainContext {
    fn render_block(&self, name: &str, _args: &Value) -> Result<String, EvalError> {
        tracing::debug!(block = name, "block not registered, rendering empty");
        Ok(String::new())
    }
}

/// Props of every component instance rendered during one page render,
/// grouped by component name and instance key.
#[derive(Debug, Default)]
pub struct HostProps {
    entries: RefCell<IndexMap<String, IndexMap<String, Value>>>,
}

impl HostProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a serialized `{name: {key: props}}` object.
    pub fn from_value(value: &Value) -> Self {
        let host = Self::new();
        if let Some(components) = value.as_object() {
            for (name, instances) in components {
                if let Some(instances) = instances.as_object() {
                    for (key, props) in instances {
                        host.record(name, key, props.clone());
                    }
                }
            }
        }
        host
    }

    /// Key the next positional instance of `name` would get: `name` for the
    /// first, `name_<count>` afterwards. Instances recorded under an explicit
    /// `$key` are not counted, and a key already taken is skipped.
    pub fn next_key(&self, name: &str) -> String {
        let entries = self.entries.borrow();
        let Some(instances) = entries.get(name) else {
            return name.to_owned();
        };
        let mut count = instances
            .values()
            .filter(|props| explicit_key(props).is_none())
            .count();
        loop {
            let key = if count == 0 {
                name.to_owned()
            } else {
                format!("{name}_{count}")
            };
            if !instances.contains_key(&key) {
                return key;
            }
            count += 1;
        }
    }

    pub fn record(&self, name: &str, key: &str, props: Value) {
        self.entries
            .borrow_mut()
            .entry(name.to_owned())
            .or_default()
            .insert(key.to_owned(), props);
    }

    /// Allocate a key for a new instance of `name` and record its props.
    /// A string `$key` prop gives the key `name:<key>`.
    pub fn register(&self, name: &str, props: Value) -> String {
        let key = match explicit_key(&props) {
            Some(key) => explicit_instance_key(name, key),
            None => self.next_key(name),
        };
        self.record(name, &key, props);
        key
    }

    pub fn get(&self, name: &str, key: &str) -> Option<Value> {
        self.entries
            .borrow()
            .get(name)
            .and_then(|instances| instances.get(key))
            .cloned()
    }

    /// Instance keys of `name`, in creation order.
    pub fn keys(&self, name: &str) -> Vec<String> {
        self.entries
            .borrow()
            .get(name)
            .map(|instances| instances.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn component_names(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::object(self.entries.borrow().iter().map(|(name, instances)| {
            let instances = Value::object(
                instances
                    .iter()
                    .map(|(key, props)| (key.clone(), props.clone())),
            );
            (name.clone(), instances)
        }))
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.to_value().to_json()
    }
}

/// Reserved prop that gives a component instance an explicit key.
pub const EXPLICIT_KEY_PROP: &str = "$key";

/// The explicit instance key carried by a props object, if any.
pub fn explicit_key(props: &Value) -> Option<&str> {
    match props.get(EXPLICIT_KEY_PROP) {
        Some(Value::Str(key)) if !key.is_empty() => Some(key.as_ref()),
        _ => None,
    }
}

/// Instance key of an occurrence of `name` carrying the explicit key `key`.
///
/// Explicit keys are only unique per component, and positional keys never
/// contain `:`.
pub fn explicit_instance_key(name: &str, key: &str) -> String {
    format!("{name}:{key}")
}

/// A failed render: the error plus the line of the directive being executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderFailure {
    pub error: EvalError,
    pub line: u32,
}

impl RenderFailure {
    pub fn new(error: EvalError, line: u32) -> Self {
        RenderFailure { error, line }
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.error, self.line)
    }
}

impl std::error::Error for RenderFailure {}

/// The arguments of one render invocation.
#[derive(Clone, Copy)]
pub struct RenderCall<'a> {
    pub ctx: &'a dyn CallContext,
    pub data: &'a Value,
    pub children: &'a dyn ChildRenderers,
    pub instance_key: Option<&'a str>,
    pub host_props: Option<&'a HostProps>,
    pub is_server: bool,
}

impl<'a> RenderCall<'a> {
    /// A call with the plain context and no children.
    pub fn plain(data: &'a Value) -> Self {
        RenderCall {
            ctx: &PlainContext,
            data,
            children: &NoChildren,
            instance_key: None,
            host_props: None,
            is_server: true,
        }
    }
}

/// A compiled or hand-written template.
pub trait RenderFunction {
    fn render(
        &self,
        ctx: &dyn CallContext,
        data: &Value,
        children: &dyn ChildRenderers,
        instance_key: Option<&str>,
        host_props: Option<&HostProps>,
        is_server: bool,
    ) -> Result<String, RenderFailure>;

    /// Render with bundled arguments.
    fn render_call(&self, call: RenderCall<'_>) -> Result<String, RenderFailure> {
        self.render(
            call.ctx,
            call.data,
            call.children,
            call.instance_key,
            call.host_props,
            call.is_server,
        )
    }
}

impl<F> RenderFunction for F
where
    F: Fn(RenderCall<'_>) -> Result<String, RenderFailure>,
{
    fn render(
        &self,
        ctx: &dyn CallContext,
        data: &Value,
        children: &dyn ChildRenderers,
        instance_key: Option<&str>,
        host_props: Option<&HostProps>,
        is_server: bool,
    ) -> Result<String, RenderFailure> {
        self(RenderCall {
            ctx,
            data,
            children,
            instance_key,
            host_props,
            is_server,
        })
    }
}
