//! Blocks: stateless fragments invoked with `{{$ name(args)}}`.
//!
//! A block file holds any number of `<template name="...">` elements. Each
//! one compiles into its own function registered as `fileStem.name`.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use satur_diagnostic::{error_snippet, line_from_offset};
use satur_eval::{CallContext, EvalError, NoChildren, RenderFunction, Value};
use satur_lexer::Delimiters;

use crate::component::component_name;
use crate::{CompiledTemplate, SaturError};

const TEMPLATE_OPEN: &str = "<template";
const TEMPLATE_CLOSE: &str = "</template>";

#[derive(Debug, Default)]
pub struct BlockRegistry {
    blocks: RwLock<FxHashMap<String, Arc<CompiledTemplate>>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every named `<template>` in a block file and register it.
    /// Returns the registered names in file order.
    ///
    /// Compile errors point into the whole file, not the fragment.
    #[tracing::instrument(level = "debug", skip(self, source, delimiters))]
    pub fn load_file(
        &self,
        file: &str,
        source: &str,
        delimiters: &Delimiters,
    ) -> Result<Vec<String>, SaturError> {
        let stem = component_name(file);
        let mut names = Vec::new();

        for fragment in fragments(source) {
            let Some(name) = fragment.name else {
                tracing::warn!(file, "block <template> without a name attribute, skipped");
                continue;
            };
            let body = &source[fragment.body_start..fragment.body_end];
            let first_line = line_from_offset(source, offset_u32(fragment.body_start));

            let key = format!("{stem}.{name}");
            let template = CompiledTemplate::build(&key, body, delimiters).map_err(|e| match e {
                SaturError::Compile { message, line, .. } => {
                    let line = first_line + line.saturating_sub(1);
                    SaturError::Compile {
                        message,
                        file: file.to_owned(),
                        line,
                        snippet: error_snippet(source, line),
                    }
                }
                other => other,
            })?;
            self.blocks.write().insert(key.clone(), Arc::new(template));
            names.push(key);
        }

        tracing::debug!(count = names.len(), "blocks registered");
        Ok(names)
    }

    pub fn get(&self, name: &str) -> Option<Arc<CompiledTemplate>> {
        self.blocks.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.blocks.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Render a block with `args` as its data record. Unknown blocks render
    /// as nothing.
    pub fn render(
        &self,
        name: &str,
        args: &Value,
        ctx: &dyn CallContext,
    ) -> Result<String, EvalError> {
        let Some(block) = self.get(name) else {
            tracing::debug!(block = name, "block not registered, rendering empty");
            return Ok(String::new());
        };
        block
            .render(ctx, args, &NoChildren, None, None, true)
            .map_err(|failure| {
                EvalError::new(format!(
                    "{} (block {name}, line {})",
                    failure.error, failure.line
                ))
            })
    }
}

struct Fragment<'src> {
    name: Option<&'src str>,
    body_start: usize,
    body_end: usize,
}

/// Top-level `<template>` elements of a block file. Nested templates are
/// not supported; an unclosed one runs to the end of the file.
fn fragments(source: &str) -> Vec<Fragment<'_>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(found) = source[pos..].find(TEMPLATE_OPEN) {
        let tag_start = pos + found;
        let after_name = tag_start + TEMPLATE_OPEN.len();
        // `<templates>` or `<template-x>` are other elements
        if !source[after_name..].starts_with(|c: char| c == '>' || c.is_whitespace()) {
            pos = after_name;
            continue;
        }
        let Some(tag_len) = source[after_name..].find('>') else {
            break;
        };
        let tag = &source[after_name..after_name + tag_len];
        let body_start = after_name + tag_len + 1;
        let body_end = source[body_start..]
            .find(TEMPLATE_CLOSE)
            .map_or(source.len(), |end| body_start + end);

        out.push(Fragment {
            name: attribute_value(tag, "name"),
            body_start,
            body_end,
        });
        pos = (body_end + TEMPLATE_CLOSE.len()).min(source.len());
    }
    out
}

/// Value of a quoted attribute inside a start tag's attribute text.
fn attribute_value<'a>(attributes: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = attributes;
    while let Some(found) = rest.find(name) {
        let before = rest[..found].chars().next_back();
        let after = rest[found + name.len()..].trim_start();
        let is_attribute = before.map_or(true, char::is_whitespace);
        if let (true, Some(value)) = (is_attribute, after.strip_prefix('=')) {
            let value = value.trim_start();
            let quote = value.chars().next()?;
            if quote == '"' || quote == '\'' {
                let inner = &value[1..];
                return inner.find(quote).map(|end| &inner[..end]);
            }
            let end = value
                .find(|c: char| c.is_whitespace() || c == '/')
                .unwrap_or(value.len());
            return Some(&value[..end]);
        }
        rest = &rest[found + name.len()..];
    }
    None
}

fn offset_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}
