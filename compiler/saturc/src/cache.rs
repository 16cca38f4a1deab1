//! Compiled-template cache.
//!
//! Shared between request threads; entries are `Arc`s so readers never hold
//! the lock while rendering.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{CompiledTemplate, Mode, SaturError};

/// Cache key of a template path: relative to `views`, with path separators
/// turned into `-`.
///
/// ```
/// use saturc::cache_key;
///
/// assert_eq!(cache_key("views/pages/home.html", "views"), "pages-home.html");
/// assert_eq!(cache_key(r"views\pages\home.html", "views"), "pages-home.html");
/// ```
pub fn cache_key(path: &str, views: &str) -> String {
    let relative = if views.is_empty() {
        path
    } else {
        path.strip_prefix(views).unwrap_or(path)
    };
    relative
        .trim_start_matches(['/', '\\'])
        .replace(['/', '\\'], "-")
}

/// Template identity to compiled function.
#[derive(Default)]
pub struct TemplateCache(Arc<RwLock<FxHashMap<String, Arc<CompiledTemplate>>>>);

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<CompiledTemplate>> {
        self.0.read().get(key).cloned()
    }

    /// Insert or replace an entry. Readers holding the old `Arc` keep it.
    pub fn insert(&self, key: impl Into<String>, template: CompiledTemplate) -> Arc<CompiledTemplate> {
        let template = Arc::new(template);
        self.0.write().insert(key.into(), Arc::clone(&template));
        template
    }

    /// Look up `key`, compiling on a miss.
    ///
    /// In development mode entries are provisional: `compile` runs on every
    /// call and the fresh result replaces the cached one. In production mode
    /// a hit skips compilation, and when two threads race on a miss the
    /// first insertion wins.
    pub fn get_or_compile(
        &self,
        key: &str,
        mode: Mode,
        compile: impl FnOnce() -> Result<CompiledTemplate, SaturError>,
    ) -> Result<Arc<CompiledTemplate>, SaturError> {
        if mode == Mode::Production {
            if let Some(hit) = self.get(key) {
                tracing::trace!(key, "template cache hit");
                return Ok(hit);
            }
        }

        tracing::debug!(key, ?mode, "compiling template");
        let template = compile()?;
        match mode {
            Mode::Development => Ok(self.insert(key, template)),
            Mode::Production => {
                let mut entries = self.0.write();
                let entry = entries
                    .entry(key.to_owned())
                    .or_insert_with(|| Arc::new(template));
                Ok(Arc::clone(entry))
            }
        }
    }

    pub fn remove(&self, key: &str) -> Option<Arc<CompiledTemplate>> {
        self.0.write().remove(key)
    }

    pub fn clear(&self) {
        self.0.write().clear();
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}

impl Clone for TemplateCache {
    fn clone(&self) -> Self {
        TemplateCache(Arc::clone(&self.0))
    }
}

impl fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.0.read();
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        f.debug_tuple("TemplateCache").field(&keys).finish()
    }
}
