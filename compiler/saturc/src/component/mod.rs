//! Components: a template plus an optional setup function.
//!
//! On the server a component renders once per occurrence in a page. Its
//! template's first element is marked with `element="{{$ctxKey}}"` so the
//! client runtime can find the mounted root of each instance.

mod collector;

use std::fmt;

use satur_lexer::{scan, Delimiters, SegmentKind};
use satur_parse::{ParseError, ParseErrorKind};
use satur_reactive::SetupFn;

use crate::builder::compile_error;
use crate::SaturError;

pub(crate) use collector::CollectingHooks;

/// Name of the attribute that carries an instance key.
pub const ROOT_ATTRIBUTE: &str = "element";

/// A registered component.
#[derive(Clone)]
pub struct ComponentDef {
    pub name: String,
    pub source: String,
    pub setup: Option<SetupFn>,
}

impl ComponentDef {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        ComponentDef {
            name: name.into(),
            source: source.into(),
            setup: None,
        }
    }

    #[must_use]
    pub fn with_setup(mut self, setup: SetupFn) -> Self {
        self.setup = Some(setup);
        self
    }
}

impl fmt::Debug for ComponentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDef")
            .field("name", &self.name)
            .field("setup", &self.setup.is_some())
            .finish_non_exhaustive()
    }
}

/// Component name of a reference: its last path segment up to the first
/// `.`.
///
/// ```
/// use saturc::component_name;
///
/// assert_eq!(component_name("./components/user-card.html"), "user-card");
/// assert_eq!(component_name("nav"), "nav");
/// ```
pub fn component_name(reference: &str) -> &str {
    let segment = reference.rsplit(['/', '\\']).next().unwrap_or(reference);
    segment.split('.').next().unwrap_or(segment)
}

/// Mark the first element of a component template with the instance key
/// attribute. An enclosing `<template>` element is unwrapped first.
///
/// Only literal markup is searched: tags produced by directives don't count.
pub fn mark_root(name: &str, source: &str, delimiters: &Delimiters) -> Result<String, SaturError> {
    let body = unwrap_template(source);
    let segments = scan(body, delimiters).map_err(|e| {
        let line = satur_diagnostic::line_from_offset(body, e.span().start);
        let span = e.span();
        compile_error(name, body, &ParseError::new(ParseErrorKind::Lex(e), span, line))
    })?;

    for segment in segments.iter().filter(|s| s.kind == SegmentKind::Text) {
        if let Some(at) = first_tag_name_end(segment.content) {
            let insert_at = segment.span.start as usize + at;
            let attribute = format!(
                " {ROOT_ATTRIBUTE}=\"{}$ctxKey{}\"",
                delimiters.open, delimiters.close
            );
            let mut marked = String::with_capacity(body.len() + attribute.len());
            marked.push_str(&body[..insert_at]);
            marked.push_str(&attribute);
            marked.push_str(&body[insert_at..]);
            return Ok(marked);
        }
    }

    Err(SaturError::EmptyComponentTemplate {
        name: name.to_owned(),
    })
}

fn unwrap_template(source: &str) -> &str {
    let trimmed = source.trim_start();
    let Some(rest) = trimmed.strip_prefix("<template") else {
        return source;
    };
    if !rest.starts_with(|c: char| c == '>' || c.is_whitespace()) {
        return source;
    }
    let Some(open_end) = rest.find('>') else {
        return source;
    };
    let inner = &rest[open_end + 1..];
    match inner.rfind("</template>") {
        Some(close) => &inner[..close],
        None => inner,
    }
}

/// Byte offset just past the tag name of the first start tag in `text`,
/// skipping HTML comments.
fn first_tag_name_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(found) = bytes[pos..].iter().position(|b| *b == b'<') {
        let lt = pos + found;
        if text[lt..].starts_with("<!--") {
            pos = text[lt + 4..].find("-->").map_or(bytes.len(), |end| lt + 4 + end + 3);
            continue;
        }
        if bytes.get(lt + 1).is_some_and(u8::is_ascii_alphabetic) {
            let name_len = bytes[lt + 1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-' || **b == b':')
                .count();
            return Some(lt + 1 + name_len);
        }
        pos = lt + 1;
    }
    None
}
