//! Engine errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaturError {
    /// Malformed directive, unbalanced scope or bad expression.
    #[error("{message}\nFILE: {file}\n{snippet}")]
    Compile {
        message: String,
        file: String,
        line: u32,
        snippet: String,
    },

    /// A compiled template failed while rendering.
    #[error("{}", render_message(.message, .file, .line, .snippet))]
    Render {
        message: String,
        file: String,
        line: u32,
        /// Development mode only.
        snippet: Option<String>,
    },

    #[error("component not found: {reference} (FILE: {file}, line {line})")]
    ComponentNotFound {
        reference: String,
        file: String,
        line: u32,
    },

    #[error("the '{name}' component's template must include at least one child element")]
    EmptyComponentTemplate { name: String },

    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("a valid app version is required; set one in the configuration")]
    MissingVersion,

    #[error("invalid delimiters: {reason}")]
    InvalidDelimiters { reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn render_message(message: &str, file: &str, line: &u32, snippet: &Option<String>) -> String {
    match snippet {
        Some(snippet) => format!("{message}\nFILE: {file}\n{snippet}"),
        None => format!("{message} (FILE: {file}, line {line})"),
    }
}

impl SaturError {
    /// Line the error points at, when it has one.
    pub fn line(&self) -> Option<u32> {
        match self {
            SaturError::Compile { line, .. }
            | SaturError::Render { line, .. }
            | SaturError::ComponentNotFound { line, .. } => Some(*line),
            _ => None,
        }
    }
}
