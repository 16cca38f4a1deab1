//! Satur - the template engine.
//!
//! Ties the compiler phases together: templates are loaded through a
//! [`TemplateLoader`], compiled once into [`CompiledTemplate`]s, kept in a
//! [`TemplateCache`], and rendered by the [`Engine`] with component and block
//! support.
//!
//! # Architecture
//!
//! - `config`: [`Config`] and [`Mode`]
//! - `error`: [`SaturError`], the engine's error type
//! - `builder`: compiles markup into [`CompiledTemplate`], maps failures
//!   back to the source with a line-windowed snippet
//! - `cache`: the shared compiled-template cache
//! - `blocks`: reusable stateless fragments keyed `file.name`
//! - `component`: component definitions, root marking and the server-side
//!   setup collector
//! - `engine`: page and component rendering
//! - `page`: page bootstrap and the development reload script
//! - `logging`: tracing subscriber setup

mod blocks;
mod builder;
mod cache;
mod component;
mod config;
mod engine;
mod error;
mod loader;
mod logging;
mod page;

pub use blocks::BlockRegistry;
pub use builder::CompiledTemplate;
pub use cache::{cache_key, TemplateCache};
pub use component::{component_name, mark_root, ComponentDef, ROOT_ATTRIBUTE};
pub use config::{Config, Mode, DEFAULT_WS_PORT};
pub use engine::{Engine, PageOutput};
pub use error::SaturError;
pub use loader::{InMemoryLoader, TemplateLoader};
pub use logging::init_tracing;
pub use page::{bootstrap_script, dev_reload_script, inject_before_body_end};

pub use satur_eval::{HostProps, Value};
