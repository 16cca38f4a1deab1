//! Satur Eval - executes compiled template programs.
//!
//! # Architecture
//!
//! - `value`: the runtime [`Value`] model flowing through templates
//! - `errors`: [`EvalError`] with a typed [`EvalErrorKind`] and factories
//! - `environment`: scope stack for loop variables and spliced declarations
//! - `operators`: unary and binary operator semantics
//! - `display`: escaping and value-to-markup conversions
//! - `context`: the render calling convention ([`RenderFunction`],
//!   [`CallContext`], [`ChildRenderers`], [`HostProps`])
//! - `interpreter`: the tree walker that turns a program into markup
//!
//! The evaluator never treats template text as code: every directive was
//! parsed into an AST up front, and names resolve against the scope chain
//! and then the single data record.

mod context;
mod display;
mod environment;
mod errors;
mod interpreter;
mod operators;
mod value;

pub use context::{
    explicit_instance_key, explicit_key, CallContext, ChildRenderers, HostProps, NoChildren,
    PlainContext, RenderCall, RenderFailure, RenderFunction, EXPLICIT_KEY_PROP,
};
pub use display::{display_raw, display_safe, esc2uni, escape_html, format_loop, to_json_string};
pub use environment::{AssignError, Environment};
pub use errors::{
    assign_to_undeclared, cannot_read_property, component_not_found, invalid_arguments,
    loop_requires_iterable, not_callable, undefined_variable, EvalError, EvalErrorKind,
    EvalResult,
};
pub use interpreter::{evaluate, execute};
pub use operators::{evaluate_binary, evaluate_unary};
pub use value::{NativeFn, Object, Value};
