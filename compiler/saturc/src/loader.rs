//! Template sources.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::SaturError;

/// Supplies template markup by name.
///
/// Page names are paths relative to the views root (`pages/home`);
/// component references resolve through the same loader.
pub trait TemplateLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<String, SaturError>;
}

/// Loader over an in-process map. Used by tests and embedders that ship
/// templates inside the binary.
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    templates: RwLock<FxHashMap<String, String>>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    pub fn insert(&self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.write().insert(name.into(), source.into());
    }

    #[must_use]
    pub fn with(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }
}

impl TemplateLoader for InMemoryLoader {
    fn load(&self, name: &str) -> Result<String, SaturError> {
        self.templates
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SaturError::TemplateNotFound {
                name: name.to_owned(),
            })
    }
}
