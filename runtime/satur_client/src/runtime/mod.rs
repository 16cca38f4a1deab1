//! The client runtime.
//!
//! A [`Runtime`] owns the live [`Document`], the registered components and
//! blocks, every component instance, and the update queue. Writes to an
//! instance's state schedule it; the host fires frames through
//! [`Runtime::run_frame`], which re-renders each dirty instance once and
//! reconciles its mounted root in place.
//!
//! No `RefCell` borrow is held while user code runs (setup, watchers,
//! lifecycle hooks, event handlers, template methods).

mod children;
mod events;
mod hooks;
mod instance;

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use satur_eval::{HostProps, RenderFunction, Value};
use satur_lexer::Delimiters;
use satur_reactive::{EventPayload, FrameRequester, Lifecycle, Signal, UpdateQueue};
use saturc::{BlockRegistry, CompiledTemplate, ComponentDef, Config, ROOT_ATTRIBUTE};

use crate::dom::{Document, NodeId};
use crate::reconcile::{reconcile, sync_boolean_properties};
use crate::registry::ContextRegistry;
use crate::ClientError;

use children::{ClientChildren, ClientContext};
use hooks::ClientHooks;
use instance::{ComponentSpec, Instance};

pub(crate) struct Inner {
    document: RefCell<Document>,
    delimiters: Delimiters,
    components: RefCell<FxHashMap<String, Rc<ComponentSpec>>>,
    blocks: BlockRegistry,
    registry: RefCell<ContextRegistry>,
    /// Keyed by instance key.
    instances: RefCell<FxHashMap<String, Rc<Instance>>>,
    host: HostProps,
    queue: UpdateQueue,
}

impl Inner {
    fn component(&self, name: &str) -> Option<Rc<ComponentSpec>> {
        self.components.borrow().get(name).cloned()
    }

    fn instance(&self, key: &str) -> Option<Rc<Instance>> {
        self.instances.borrow().get(key).cloned()
    }

    /// The instance under `key`, created with `props` and set up on first
    /// sight.
    fn ensure_instance(&self, spec: &Rc<ComponentSpec>, key: &str, props: Value) -> Rc<Instance> {
        if let Some(existing) = self.instance(key) {
            return existing;
        }
        let instance = Rc::new(Instance::new(Rc::clone(spec), key.to_owned(), props));
        self.instances
            .borrow_mut()
            .insert(key.to_owned(), Rc::clone(&instance));
        tracing::debug!(instance = %instance.instance_ref(), "running setup");
        ClientHooks::new(self, Rc::clone(&instance)).run();
        instance
    }

    /// Render one instance to markup. A failure goes through the instance's
    /// error hook when it has one.
    fn render_instance(
        &self,
        instance: &Instance,
        children: &ClientChildren<'_>,
    ) -> Result<String, ClientError> {
        let data = instance.data();
        let ctx = ClientContext::new(self, true);
        let result = instance.spec.template.render(
            &ctx,
            &data,
            children,
            Some(instance.key.as_str()),
            Some(&self.host),
            false,
        );
        match result {
            Ok(html) => Ok(html),
            Err(failure) => {
                let hook = instance.error_hook.borrow().clone();
                match hook {
                    Some(hook) => {
                        tracing::debug!(instance = %instance.instance_ref(), error = %failure, "render failed, using error hook");
                        Ok(hook(&failure.error))
                    }
                    None => Err(ClientError::Render {
                        component: instance.spec.name.clone(),
                        key: instance.key.clone(),
                        message: failure.error.message,
                        line: failure.line,
                    }),
                }
            }
        }
    }

    /// The element currently mounted for `instance`, if it is in the
    /// document.
    fn mounted_root(&self, instance: &Instance) -> Option<NodeId> {
        let doc = self.document.borrow();
        if let Some(root) = instance.root.get() {
            let key = doc.attribute(root, ROOT_ATTRIBUTE);
            if doc.contains(root) && key == Some(instance.key.as_str()) {
                return Some(root);
            }
        }
        let found = doc.find_by_attribute(doc.root(), ROOT_ATTRIBUTE, &instance.key);
        instance.root.set(found);
        found
    }
}

/// Handle to a client runtime. Clones share the runtime.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<Inner>,
}

impl Runtime {
    /// A runtime over `document` with the default delimiters.
    pub fn new(document: Document, frames: Rc<dyn FrameRequester>) -> Self {
        Self::with_delimiters(document, frames, Delimiters::default())
    }

    /// A runtime using the delimiters of an engine configuration.
    pub fn with_config(document: Document, frames: Rc<dyn FrameRequester>, config: &Config) -> Self {
        Self::with_delimiters(document, frames, config.delimiters())
    }

    pub fn with_delimiters(
        document: Document,
        frames: Rc<dyn FrameRequester>,
        delimiters: Delimiters,
    ) -> Self {
        Runtime {
            inner: Rc::new(Inner {
                document: RefCell::new(document),
                delimiters,
                components: RefCell::new(FxHashMap::default()),
                blocks: BlockRegistry::new(),
                registry: RefCell::new(ContextRegistry::new()),
                instances: RefCell::new(FxHashMap::default()),
                host: HostProps::new(),
                queue: UpdateQueue::new(frames),
            }),
        }
    }

    /// Compile and register a component.
    pub fn register_component(&self, def: ComponentDef) -> Result<(), ClientError> {
        let template = CompiledTemplate::component(&def.name, &def.source, &self.inner.delimiters)?;
        let spec = ComponentSpec {
            name: def.name.clone(),
            template: Arc::new(template),
            setup: def.setup,
        };
        self.inner
            .components
            .borrow_mut()
            .insert(def.name, Rc::new(spec));
        Ok(())
    }

    /// Compile and register the blocks of one block file.
    pub fn register_block(&self, file: &str, source: &str) -> Result<Vec<String>, ClientError> {
        Ok(self
            .inner
            .blocks
            .load_file(file, source, &self.inner.delimiters)?)
    }

    /// Rebuild the instances the server rendered from the page props
    /// (`{component: {key: props}}`) and run each one's setup. Instances
    /// whose root is in the document count as mounted: their boolean
    /// properties are synced, `before_mount` fires now and `mounted` on the
    /// next frame.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn hydrate(&self, page_props: &Value) -> Result<(), ClientError> {
        let inner = &self.inner;
        let seeded = HostProps::from_value(page_props);
        for name in seeded.component_names() {
            let Some(spec) = inner.component(&name) else {
                return Err(ClientError::UnknownComponent { name });
            };
            for key in seeded.keys(&name) {
                let props = seeded.get(&name, &key).unwrap_or_default();
                inner.host.record(&name, &key, props.clone());
                let instance = inner.ensure_instance(&spec, &key, props);
                if let Some(root) = inner.mounted_root(&instance) {
                    sync_boolean_properties(&mut inner.document.borrow_mut(), root);
                    instance.transition(true, &inner.queue);
                }
            }
        }
        inner.registry.borrow_mut().seed(&inner.host);
        tracing::debug!(instances = inner.instances.borrow().len(), "hydrated");
        Ok(())
    }

    /// [`Runtime::hydrate`] from the JSON the page bootstrap carries.
    pub fn hydrate_json(&self, json: &str) -> Result<(), ClientError> {
        let props: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ClientError::PageProps(e.to_string()))?;
        self.hydrate(&Value::from(props))
    }

    /// Re-render one instance and patch its mounted root. An instance that
    /// is unknown or not in the document is skipped.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn update_component(&self, key: &str) -> Result<(), ClientError> {
        let inner = &self.inner;
        let Some(instance) = inner.instance(key) else {
            tracing::debug!("no such instance");
            return Ok(());
        };
        let Some(root) = inner.mounted_root(&instance) else {
            tracing::debug!("instance not mounted, update skipped");
            return Ok(());
        };

        inner.registry.borrow_mut().reset_cursors();
        let children = ClientChildren::new(inner);
        let html = inner
            .render_instance(&instance, &children)
            .inspect_err(|e| tracing::error!(error = %e, "component render failed"))?;

        let fresh = Document::parse(&html);
        let new_root = fresh.first_element_child(fresh.root());

        instance.fire(Lifecycle::BeforeUpdate);
        let placed = {
            let mut doc = inner.document.borrow_mut();
            let placed = reconcile(&mut doc, Some(root), &fresh, new_root);
            if let Some(node) = placed {
                sync_boolean_properties(&mut doc, node);
            }
            placed
        };
        instance.root.set(placed);
        instance.fire(Lifecycle::Updated);
        Ok(())
    }

    /// Fire one frame: re-render every pending instance once, then run the
    /// callbacks deferred to this frame. Work scheduled meanwhile waits for
    /// the next frame. Returns the first render error after processing the
    /// whole frame.
    pub fn run_frame(&self) -> Result<(), ClientError> {
        let frame = self.inner.queue.take_frame();
        tracing::trace!(?frame, "frame");
        let mut first_error = None;
        for update in frame.updates {
            if let Err(e) = self.update_component(&update.key) {
                first_error.get_or_insert(e);
            }
        }
        for callback in frame.deferred {
            callback();
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Deliver a DOM event at `target`.
    ///
    /// The nearest `on<event>` attribute at or above the target names the
    /// handler; the nearest component root above that names the instance.
    /// Form events carrying a value update the target's live value first.
    /// Returns `false` when no binding applies.
    pub fn dispatch(&self, target: NodeId, payload: &EventPayload) -> Result<bool, ClientError> {
        let attribute = format!("on{}", payload.event);
        let located = {
            let mut doc = self.inner.document.borrow_mut();
            if let Some(value) = &payload.value {
                if doc.value(target).is_some() {
                    doc.set_value(target, value);
                }
            }
            doc.closest_with_attribute(target, &attribute)
                .and_then(|bound| {
                    let binding = doc.attribute(bound, &attribute)?.to_owned();
                    let root = doc.closest_with_attribute(bound, ROOT_ATTRIBUTE)?;
                    let key = doc.attribute(root, ROOT_ATTRIBUTE)?.to_owned();
                    Some((binding, key))
                })
        };
        let Some((binding, key)) = located else {
            return Ok(false);
        };
        let Some(instance) = self.inner.instance(&key) else {
            tracing::debug!(key, "event on an unknown instance");
            return Ok(false);
        };

        let parsed = events::parse_binding(&binding)?;
        let handler = instance.events.borrow().get(parsed.handler).cloned();
        let Some(handler) = handler else {
            let reason = format!("no event handler named {}", parsed.handler);
            return Err(ClientError::EventBinding { binding, reason });
        };
        let args = events::evaluate_args(&parsed, &instance.data())?;
        tracing::trace!(instance = %instance.instance_ref(), event = %payload.event, handler = parsed.handler, "dispatch");
        handler(payload, &args).map_err(|error| ClientError::Callback {
            context: format!("{} {attribute}", instance.instance_ref()),
            error,
        })?;
        Ok(true)
    }

    /// State of the instance under `key`.
    pub fn signal(&self, key: &str) -> Option<Signal> {
        self.inner.instance(key).and_then(|i| i.signal())
    }

    /// Whether an instance exists under `key`.
    pub fn has_instance(&self, key: &str) -> bool {
        self.inner.instances.borrow().contains_key(key)
    }

    /// Props last rendered for every instance, as the server records them.
    pub fn page_props(&self) -> Value {
        self.inner.host.to_value()
    }

    pub fn queue(&self) -> &UpdateQueue {
        &self.inner.queue
    }

    /// The live document. Release the borrow before firing a frame.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    /// Mutable access to the live document, for host-side edits.
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    /// Root element of the instance under `key`, if mounted.
    pub fn root_of(&self, key: &str) -> Option<NodeId> {
        let instance = self.inner.instance(key)?;
        self.inner.mounted_root(&instance)
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<String> = self.inner.instances.borrow().keys().cloned().collect();
        keys.sort();
        f.debug_struct("Runtime")
            .field("instances", &keys)
            .field("queue", &self.inner.queue)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
