//! Instance identity for client renders.
//!
//! Each component name owns an ordered key list and a cursor. A parent
//! render resolves its children by walking the cursor, so the n-th
//! occurrence of a component in a render pass is always the same instance.
//! Cursors rewind at the start of every pass. Instances with an explicit
//! `$key` live outside the list and never move the cursor.

use rustc_hash::{FxHashMap, FxHashSet};
use satur_eval::{explicit_instance_key, explicit_key, HostProps};

#[derive(Debug, Default)]
struct ContextCache {
    keys: Vec<String>,
    explicit: FxHashSet<String>,
    cursor: usize,
}

/// An instance key resolved for one child occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub key: String,
    /// The key did not exist before; the instance needs its setup run.
    pub created: bool,
}

#[derive(Debug, Default)]
pub struct ContextRegistry {
    caches: FxHashMap<String, ContextCache>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the instances the server rendered, in render order.
    pub fn seed(&mut self, host: &HostProps) {
        for name in host.component_names() {
            let cache = self.caches.entry(name.clone()).or_default();
            for key in host.keys(&name) {
                let explicit = host
                    .get(&name, &key)
                    .is_some_and(|props| explicit_key(&props).is_some());
                if explicit {
                    cache.explicit.insert(key);
                } else if !cache.keys.contains(&key) {
                    cache.keys.push(key);
                }
            }
        }
    }

    /// Rewind every cursor for a new render pass.
    pub fn reset_cursors(&mut self) {
        for cache in self.caches.values_mut() {
            cache.cursor = 0;
        }
    }

    /// Key of the next positional occurrence of `name`. Past the end of the
    /// list a new key is created: `name` for the first, `name_<n>` after.
    pub fn resolve(&mut self, name: &str) -> Resolution {
        let cache = self.caches.entry(name.to_owned()).or_default();
        let position = cache.cursor;
        cache.cursor += 1;
        if let Some(key) = cache.keys.get(position) {
            return Resolution {
                key: key.clone(),
                created: false,
            };
        }
        let key = if cache.keys.is_empty() {
            name.to_owned()
        } else {
            format!("{name}_{}", cache.keys.len())
        };
        tracing::trace!(component = name, key = %key, "instance created");
        cache.keys.push(key.clone());
        Resolution { key, created: true }
    }

    /// Record an occurrence of `name` carrying the explicit key `key`. The
    /// resolved key is scoped by component, as on the server.
    pub fn resolve_explicit(&mut self, name: &str, key: &str) -> Resolution {
        let key = explicit_instance_key(name, key);
        let cache = self.caches.entry(name.to_owned()).or_default();
        let created = cache.explicit.insert(key.clone());
        Resolution { key, created }
    }

    /// Positional keys of `name`, in creation order.
    pub fn keys(&self, name: &str) -> &[String] {
        self.caches.get(name).map_or(&[], |c| c.keys.as_slice())
    }

    pub fn cursor(&self, name: &str) -> usize {
        self.caches.get(name).map_or(0, |c| c.cursor)
    }
}
