//! `on<event>` attribute bindings.

use satur_eval::{evaluate, Value};
use satur_parse::parse_expression;

use crate::ClientError;

/// A parsed `handler` or `handler(args)` binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Binding<'a> {
    pub(crate) handler: &'a str,
    /// Source of the argument list, without the parentheses.
    pub(crate) args: &'a str,
}

pub(crate) fn parse_binding(binding: &str) -> Result<Binding<'_>, ClientError> {
    let malformed = |reason: &str| ClientError::EventBinding {
        binding: binding.to_owned(),
        reason: reason.to_owned(),
    };
    let text = binding.trim();
    let (handler, args) = match text.find('(') {
        Some(open) => {
            let Some(inner) = text[open + 1..].strip_suffix(')') else {
                return Err(malformed("missing closing parenthesis"));
            };
            (text[..open].trim_end(), inner)
        }
        None => (text, ""),
    };
    let valid = handler
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && handler
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if !valid {
        return Err(malformed("handler must be a name"));
    }
    Ok(Binding { handler, args })
}

/// Evaluate a binding's argument list against the instance data.
pub(crate) fn evaluate_args(binding: &Binding<'_>, data: &Value) -> Result<Vec<Value>, ClientError> {
    if binding.args.trim().is_empty() {
        return Ok(Vec::new());
    }
    let expr = parse_expression(&format!("[{}]", binding.args)).map_err(|e| {
        ClientError::EventBinding {
            binding: format!("{}({})", binding.handler, binding.args),
            reason: e.to_string(),
        }
    })?;
    let value = evaluate(&expr, data).map_err(|error| ClientError::Callback {
        context: format!("arguments of {}", binding.handler),
        error,
    })?;
    Ok(match value {
        Value::Array(items) => items.to_vec(),
        other => vec![other],
    })
}
