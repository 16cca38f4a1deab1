//! Parse errors.

use satur_ir::Span;
use satur_lexer::LexError;
use std::fmt;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { expected: String, found: String },

    #[error("unexpected end of directive, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("unclosed `{directive}` directive")]
    UnclosedScope { directive: &'static str },

    #[error("close directive without an open `if` or `for`")]
    UnexpectedClose,

    #[error("malformed {directive} directive: {reason}")]
    Malformed {
        directive: &'static str,
        reason: String,
    },
}

/// A parse error located at a directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// 1-based line of the offending directive.
    pub line: u32,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, line: u32) -> Self {
        ParseError { kind, span, line }
    }

    pub(crate) fn lex(error: LexError, line: u32) -> Self {
        let span = error.span();
        ParseError::new(ParseErrorKind::Lex(error), span, line)
    }

    pub(crate) fn malformed(
        directive: &'static str,
        reason: impl Into<String>,
        span: Span,
        line: u32,
    ) -> Self {
        ParseError::new(
            ParseErrorKind::Malformed {
                directive,
                reason: reason.into(),
            },
            span,
            line,
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.kind, self.line)
    }
}

impl std::error::Error for ParseError {}
