//! Client runtime errors.

use satur_eval::EvalError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// A component failed to render and has no error hook.
    #[error("render of {component}:{key} failed: {message} (line {line})")]
    Render {
        component: String,
        key: String,
        message: String,
        line: u32,
    },

    #[error("unknown component: {name}")]
    UnknownComponent { name: String },

    /// An event handler or watcher failed.
    #[error("{context}: {error}")]
    Callback { context: String, error: EvalError },

    /// An `on<event>` attribute that is not `handler` or `handler(args)`.
    #[error("malformed event binding `{binding}`: {reason}")]
    EventBinding { binding: String, reason: String },

    /// The serialized page props could not be read.
    #[error("malformed page props: {0}")]
    PageProps(String),

    #[error(transparent)]
    Template(#[from] saturc::SaturError),
}
