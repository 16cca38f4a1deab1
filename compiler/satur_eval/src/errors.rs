//! Render-time error types.
//!
//! `EvalErrorKind` gives typed categories; the factory functions below
//! (e.g. `undefined_variable()`) are the public way to build errors and fill
//! both `kind` and `message`.

use std::fmt;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Access
    UndefinedVariable {
        name: String,
    },
    CannotReadProperty {
        field: String,
        type_name: String,
    },
    AssignToUndeclared {
        name: String,
    },

    // Calls
    NotCallable {
        callee: String,
    },
    InvalidArguments {
        directive: String,
        type_name: String,
    },

    // Loops
    LoopRequiresIterable {
        type_name: String,
    },

    // Components
    ComponentNotFound {
        reference: String,
    },

    /// Errors raised by native code (component methods, watchers).
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "{name} is not defined"),
            Self::CannotReadProperty { field, type_name } => {
                write!(f, "cannot read properties of {type_name} (reading '{field}')")
            }
            Self::AssignToUndeclared { name } => {
                write!(f, "assignment to undeclared variable {name}")
            }
            Self::NotCallable { callee } => write!(f, "{callee} is not a function"),
            Self::InvalidArguments {
                directive,
                type_name,
            } => write!(f, "{directive} arguments must be an object, got {type_name}"),
            Self::LoopRequiresIterable { .. } => write!(f, "array or object required."),
            Self::ComponentNotFound { reference } => {
                write!(f, "component not found: {reference}")
            }
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
}

impl EvalError {
    /// Uncategorized error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        EvalError {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
        }
    }

    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError { kind, message }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Factory functions

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

#[cold]
pub fn cannot_read_property(field: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotReadProperty {
        field: field.to_owned(),
        type_name: type_name.to_owned(),
    })
}

#[cold]
pub fn assign_to_undeclared(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssignToUndeclared {
        name: name.to_owned(),
    })
}

#[cold]
pub fn not_callable(callee: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        callee: callee.to_owned(),
    })
}

#[cold]
pub fn invalid_arguments(directive: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArguments {
        directive: directive.to_owned(),
        type_name: type_name.to_owned(),
    })
}

#[cold]
pub fn loop_requires_iterable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::LoopRequiresIterable {
        type_name: type_name.to_owned(),
    })
}

#[cold]
pub fn component_not_found(reference: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ComponentNotFound {
        reference: reference.to_owned(),
    })
}
