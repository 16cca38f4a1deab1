//! Satur Lexer - two tokenizers for one template.
//!
//! # Architecture
//!
//! Templates are lexed in two layers:
//!
//! 1. [`scan`] splits raw markup into literal text runs and delimiter-bounded
//!    directives. It only looks for the open and close delimiters (with
//!    `memchr::memmem`) and classifies each directive by its prefix marker.
//! 2. [`tokenize`] turns the content of a single directive into expression
//!    tokens using a `logos`-derived lexer.
//!
//! Keeping the layers apart means markup is never fed through the expression
//! lexer, so arbitrary HTML between directives never needs to tokenize.

mod directive;
mod error;
mod token;

pub use directive::{scan, Delimiters, DirectiveKind, Segment, SegmentKind};
pub use error::LexError;
pub use token::{tokenize, SpannedToken, Token};
