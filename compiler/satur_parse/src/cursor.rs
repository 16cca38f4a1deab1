//! Token cursor over one directive's expression tokens.

use satur_ir::Span;
use satur_lexer::{SpannedToken, Token};

use crate::{ParseError, ParseErrorKind};

/// Cursor for navigating tokens.
///
/// A directive's tokens end without an EOF token; `end` is the span reported
/// when the parser runs out of input.
pub(crate) struct Cursor<'t> {
    tokens: &'t [SpannedToken],
    pos: usize,
    line: u32,
    end: Span,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [SpannedToken], line: u32, end: Span) -> Self {
        Cursor {
            tokens,
            pos: 0,
            line,
            end,
        }
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Span of the current token, or the end span when exhausted.
    pub fn current_span(&self) -> Span {
        self.tokens.get(self.pos).map_or(self.end, |t| t.span)
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(self.end, |t| t.span)
    }

    pub fn advance(&mut self) -> Option<&'t SpannedToken> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    /// Consume the token if it matches.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, expected: &Token) -> Result<Span, ParseError> {
        if self.check(expected) {
            let span = self.current_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.unexpected(&expected.describe()))
        }
    }

    pub fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let span = self.current_span();
                self.pos += 1;
                Ok((name.clone(), span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    pub fn expect_end(&self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of directive"))
        }
    }

    /// Error describing the current token (or the end) as unexpected.
    pub fn unexpected(&self, expected: &str) -> ParseError {
        let kind = match self.peek() {
            Some(found) => ParseErrorKind::UnexpectedToken {
                expected: expected.to_owned(),
                found: found.describe(),
            },
            None => ParseErrorKind::UnexpectedEnd {
                expected: expected.to_owned(),
            },
        };
        ParseError::new(kind, self.current_span(), self.line)
    }
}
