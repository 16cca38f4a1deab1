//! The rendering engine.
//!
//! An [`Engine`] owns the configuration, the template loader, the compiled
//! template cache, the block registry and the component table. It is `Sync`:
//! one engine serves every request, and each render builds its own
//! single-threaded call context.

mod children;

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use satur_eval::{CallContext, EvalError, HostProps, RenderFunction, Value};
use satur_lexer::Delimiters;

use crate::component::component_name;
use crate::page::finalize;
use crate::{
    cache_key, BlockRegistry, CompiledTemplate, ComponentDef, Config, SaturError, TemplateCache,
    TemplateLoader,
};

pub(crate) use children::ServerChildren;

/// A rendered page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageOutput {
    /// Final markup with the bootstrap (and, in development, reload) script.
    pub html: String,
    /// Props of every component instance, by component name then instance
    /// key. The same data the bootstrap script carries.
    pub page_props: serde_json::Value,
}

pub struct Engine {
    config: Config,
    delimiters: Delimiters,
    loader: Arc<dyn TemplateLoader>,
    cache: TemplateCache,
    blocks: BlockRegistry,
    components: RwLock<FxHashMap<String, Arc<ComponentDef>>>,
}

impl Engine {
    /// Create an engine. Fails when the configuration is invalid.
    pub fn new(config: Config, loader: Arc<dyn TemplateLoader>) -> Result<Self, SaturError> {
        config.validate()?;
        tracing::debug!(mode = ?config.mode, views = %config.views, "engine ready");
        Ok(Engine {
            delimiters: config.delimiters(),
            config,
            loader,
            cache: TemplateCache::new(),
            blocks: BlockRegistry::new(),
            components: RwLock::new(FxHashMap::default()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    pub fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }

    /// Compile and register every block of a block file.
    pub fn register_block(&self, file: &str, source: &str) -> Result<Vec<String>, SaturError> {
        self.blocks.load_file(file, source, &self.delimiters)
    }

    /// Register a component. Its template is checked right away.
    pub fn register_component(&self, def: ComponentDef) -> Result<(), SaturError> {
        let template = CompiledTemplate::component(&def.name, &def.source, &self.delimiters)?;
        self.cache.insert(component_cache_key(&def.name), template);
        self.components
            .write()
            .insert(def.name.clone(), Arc::new(def));
        Ok(())
    }

    pub fn component(&self, name: &str) -> Option<Arc<ComponentDef>> {
        self.components.read().get(name).cloned()
    }

    /// Compile a page and check that every component it uses, directly or
    /// through other components, resolves.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn compile(&self, name: &str) -> Result<Arc<CompiledTemplate>, SaturError> {
        let key = cache_key(name, &self.config.views);
        let page = self.cache.get_or_compile(&key, self.config.mode, || {
            let source = self.loader.load(name)?;
            CompiledTemplate::build(name, &source, &self.delimiters)
        })?;
        let mut seen = FxHashSet::default();
        self.check_components(&page, &mut seen)?;
        Ok(page)
    }

    fn check_components(
        &self,
        template: &CompiledTemplate,
        seen: &mut FxHashSet<String>,
    ) -> Result<(), SaturError> {
        for (reference, line) in template.program().component_references() {
            let name = component_name(reference);
            if !seen.insert(name.to_owned()) {
                continue;
            }
            let child = self.component_template(reference).map_err(|e| match e {
                SaturError::TemplateNotFound { .. } => SaturError::ComponentNotFound {
                    reference: reference.to_owned(),
                    file: template.name().to_owned(),
                    line,
                },
                other => other,
            })?;
            self.check_components(&child, seen)?;
        }
        Ok(())
    }

    /// Compiled template of a component reference. Registered components
    /// win; anything else is loaded by reference.
    pub(crate) fn component_template(
        &self,
        reference: &str,
    ) -> Result<Arc<CompiledTemplate>, SaturError> {
        let name = component_name(reference);
        let key = component_cache_key(name);
        if let Some(def) = self.component(name) {
            if let Some(template) = self.cache.get(&key) {
                return Ok(template);
            }
            return self.cache.get_or_compile(&key, self.config.mode, || {
                CompiledTemplate::component(name, &def.source, &self.delimiters)
            });
        }
        self.cache.get_or_compile(&key, self.config.mode, || {
            let source = self.loader.load(reference)?;
            CompiledTemplate::component(name, &source, &self.delimiters)
        })
    }

    /// Render a page template to markup, without page finalization.
    pub fn render(&self, name: &str, data: &Value) -> Result<String, SaturError> {
        let host = HostProps::new();
        self.render_with_host(name, data, &host)
    }

    /// Render a page and finalize it for the browser.
    #[tracing::instrument(level = "debug", skip(self, data))]
    pub fn render_page(&self, name: &str, data: &Value) -> Result<PageOutput, SaturError> {
        let host = HostProps::new();
        let html = self.render_with_host(name, data, &host)?;
        let page_props = host.to_value();
        let dev_port = self.config.is_dev().then_some(self.config.ws_port);
        Ok(PageOutput {
            html: finalize(&html, &page_props, dev_port),
            page_props: page_props.to_json(),
        })
    }

    fn render_with_host(
        &self,
        name: &str,
        data: &Value,
        host: &HostProps,
    ) -> Result<String, SaturError> {
        let page = self.compile(name)?;
        let ctx = ServerContext::new(self, true);
        let children = ServerChildren::new(self, host);
        page.render(&ctx, data, &children, None, Some(host), true)
            .map_err(|failure| page.render_error(&failure, self.config.is_dev()))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("blocks", &self.blocks.len())
            .finish_non_exhaustive()
    }
}

fn component_cache_key(name: &str) -> String {
    format!("@{name}")
}

/// Call context of a server render: blocks resolve through the engine's
/// registry, visibility is carried down from the parent.
pub(crate) struct ServerContext<'e> {
    engine: &'e Engine,
    visible: bool,
}

impl<'e> ServerContext<'e> {
    pub(crate) fn new(engine: &'e Engine, visible: bool) -> Self {
        ServerContext { engine, visible }
    }
}

impl CallContext for ServerContext<'_> {
    fn visible(&self) -> bool {
        self.visible
    }

    fn render_block(&self, name: &str, args: &Value) -> Result<String, EvalError> {
        self.engine.blocks.render(name, args, self)
    }
}
