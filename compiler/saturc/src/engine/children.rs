use std::cell::Cell;

use satur_eval::{ChildRenderers, EvalError, EvalResult, HostProps, RenderFunction, Value};
use satur_reactive::InstanceRef;

use super::{Engine, ServerContext};
use crate::component::{component_name, CollectingHooks};

/// Nesting limit for components rendering components.
const MAX_DEPTH: u32 = 128;

/// Child renderers of a server render.
///
/// Every occurrence of a component gets an instance key from the host props
/// (`name`, then `name_1`, `name_2`, ...) and records its props there, so the
/// client can rebuild the same instances.
pub(crate) struct ServerChildren<'e> {
    engine: &'e Engine,
    host: &'e HostProps,
    depth: Cell<u32>,
}

impl<'e> ServerChildren<'e> {
    pub(crate) fn new(engine: &'e Engine, host: &'e HostProps) -> Self {
        ServerChildren {
            engine,
            host,
            depth: Cell::new(0),
        }
    }
}

impl ChildRenderers for ServerChildren<'_> {
    fn render_child(&self, reference: &str, props: &Value, visible: bool) -> EvalResult {
        let name = component_name(reference);
        let key = self.host.register(name, props.clone());
        tracing::trace!(component = name, key = %key, visible, "rendering component");
        if !visible {
            return Ok(Value::markup(""));
        }

        let template = self
            .engine
            .component_template(reference)
            .map_err(|e| EvalError::new(e.to_string()))?;

        let mut hooks = CollectingHooks::new(InstanceRef::new(name, key.as_str()), props);
        if let Some(setup) = self.engine.component(name).and_then(|def| def.setup.clone()) {
            setup(&mut hooks);
        }
        let data = hooks.into_data();

        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            return Err(EvalError::new(format!(
                "component nesting deeper than {MAX_DEPTH} levels at {name}"
            )));
        }
        self.depth.set(depth + 1);
        let ctx = ServerContext::new(self.engine, visible);
        let result = template.render(&ctx, &data, self, Some(&key), None, true);
        self.depth.set(depth);

        match result {
            Ok(html) => Ok(Value::markup(html)),
            Err(failure) => Err(EvalError::new(
                template
                    .render_error(&failure, self.engine.config().is_dev())
                    .to_string(),
            )),
        }
    }
}
