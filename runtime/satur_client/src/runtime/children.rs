//! Nested component rendering on the client.

use std::cell::Cell;

use satur_eval::{
    component_not_found, explicit_key, CallContext, ChildRenderers, EvalError, EvalResult, Value,
};
use saturc::component_name;

use super::Inner;

const MAX_DEPTH: u32 = 128;

/// Call context of a client render.
pub(crate) struct ClientContext<'r> {
    runtime: &'r Inner,
    visible: bool,
}

impl<'r> ClientContext<'r> {
    pub(crate) fn new(runtime: &'r Inner, visible: bool) -> Self {
        ClientContext { runtime, visible }
    }
}

impl CallContext for ClientContext<'_> {
    fn visible(&self) -> bool {
        self.visible
    }

    fn render_block(&self, name: &str, args: &Value) -> Result<String, EvalError> {
        self.runtime.blocks.render(name, args, self)
    }
}

/// Child renderers of a client render: occurrences resolve to instances
/// through the context registry, new instances get their setup run.
pub(crate) struct ClientChildren<'r> {
    runtime: &'r Inner,
    depth: Cell<u32>,
}

impl<'r> ClientChildren<'r> {
    pub(crate) fn new(runtime: &'r Inner) -> Self {
        ClientChildren {
            runtime,
            depth: Cell::new(0),
        }
    }
}

impl ChildRenderers for ClientChildren<'_> {
    fn render_child(&self, reference: &str, props: &Value, visible: bool) -> EvalResult {
        let name = component_name(reference);
        let Some(spec) = self.runtime.component(name) else {
            return Err(component_not_found(reference));
        };

        let resolution = {
            let mut registry = self.runtime.registry.borrow_mut();
            match explicit_key(props) {
                Some(key) => registry.resolve_explicit(name, key),
                None => registry.resolve(name),
            }
        };
        let instance = self
            .runtime
            .ensure_instance(&spec, &resolution.key, props.clone());
        instance.props.replace(props.clone());
        self.runtime.host.record(name, &resolution.key, props.clone());

        instance.transition(visible, &self.runtime.queue);
        if !visible {
            return Ok(Value::markup(""));
        }

        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            return Err(EvalError::new(format!(
                "component nesting deeper than {MAX_DEPTH} levels at {name}"
            )));
        }
        self.depth.set(depth + 1);
        let result = self.runtime.render_instance(&instance, self);
        self.depth.set(depth);

        result
            .map(Value::markup)
            .map_err(|e| EvalError::new(e.to_string()))
    }
}
