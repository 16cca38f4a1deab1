//! Satur Parse - from segments to a template program.
//!
//! # Architecture
//!
//! - `cursor`: token navigation over one directive's tokens
//! - `expr`: the expression precedence chain (conditional down to primary)
//! - `header`: the small grammars of `if`, `else`, `for`, call and code
//!   directives, built on the expression parser
//! - `template`: the directive compiler, a scope stack that folds segments
//!   into a [`satur_ir::Program`] and checks `if`/`for`/close balance
//!
//! Every error carries the 1-based line of the directive it came from.

mod cursor;
mod error;
mod expr;
mod header;
mod template;

pub use error::{ParseError, ParseErrorKind};
pub use header::{parse_expression, parse_statements};
pub use template::compile;
