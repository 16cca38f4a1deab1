//! Value-to-markup conversions used by interpolation and loops.

use std::borrow::Cow;

use crate::{loop_requires_iterable, EvalError, Value};

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Unescaped output for `{{- expr }}`.
///
/// Arrays and objects render as JSON; everything else as its display string.
pub fn display_raw(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => to_json_string(value),
        other => other.to_display_string(),
    }
}

/// Escaped output for `{{ expr }}`.
///
/// `null` and `false` render as nothing, rendered component markup passes
/// through, containers render as escaped JSON.
pub fn display_safe(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Markup(markup) => markup.to_string(),
        Value::Array(_) | Value::Object(_) => escape_html(&to_json_string(value)).into_owned(),
        other => escape_html(&other.to_display_string()).into_owned(),
    }
}

/// Normalize a loop subject into `(key, value)` pairs.
///
/// Arrays yield integer indices, objects yield their keys in insertion order.
pub fn format_loop(value: &Value) -> Result<Vec<(Value, Value)>, EvalError> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let index = i64::try_from(index).unwrap_or(i64::MAX);
                (Value::Int(index), item.clone())
            })
            .collect()),
        Value::Object(map) => Ok(map
            .iter()
            .map(|(key, item)| (Value::from(key.as_str()), item.clone()))
            .collect()),
        other => Err(loop_requires_iterable(other.type_name())),
    }
}

pub fn to_json_string(value: &Value) -> String {
    value.to_json().to_string()
}

/// JSON safe to embed inside a `<script>` element.
pub fn esc2uni(value: &Value) -> String {
    let json = to_json_string(value);
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '/' => out.push_str("\\u002f"),
            c => out.push(c),
        }
    }
    out
}
