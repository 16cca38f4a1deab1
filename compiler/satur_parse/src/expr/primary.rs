//! Primary expressions: literals, names, grouping, array and object literals.

use satur_ir::{Expr, ExprKind, Span};
use satur_lexer::Token;

use super::Parser;
use crate::{ParseError, ParseErrorKind};

/// Lower reserved `$` names to their dedicated nodes.
fn name_expr(name: &str) -> ExprKind {
    match name {
        "$" => ExprKind::Data,
        "$ctxKey" => ExprKind::InstanceKey,
        "$pageProps" => ExprKind::HostProps,
        "$isServer" => ExprKind::IsServer,
        _ => ExprKind::Ident(name.to_owned()),
    }
}

/// Keywords that may still appear as property names (`obj.in`, `{ null: 1 }`).
pub(super) fn keyword_as_name(token: &Token) -> Option<&'static str> {
    match token {
        Token::Null => Some("null"),
        Token::Undefined => Some("undefined"),
        Token::True => Some("true"),
        Token::False => Some("false"),
        Token::In => Some("in"),
        Token::Let => Some("let"),
        Token::Const => Some("const"),
        Token::Var => Some("var"),
        _ => None,
    }
}

impl Parser<'_> {
    pub(super) fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(spanned) = self.cursor.advance() else {
            return Err(self.cursor.unexpected("expression"));
        };
        let span = spanned.span;
        let kind = match &spanned.token {
            Token::Null | Token::Undefined => ExprKind::Null,
            Token::True => ExprKind::Bool(true),
            Token::False => ExprKind::Bool(false),
            Token::Int(n) => ExprKind::Int(*n),
            Token::Float(n) => ExprKind::Float(*n),
            Token::Str(s) => ExprKind::Str(s.clone()),
            Token::Ident(name) => name_expr(name),
            Token::LParen => {
                let inner = self.parse_expr()?;
                let end = self.cursor.expect(&Token::RParen)?;
                return Ok(Expr::new(inner.kind, span.merge(end)));
            }
            Token::LBracket => return self.parse_array(span),
            Token::LBrace => return self.parse_object(span),
            other => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        expected: "expression".to_owned(),
                        found: other.describe(),
                    },
                    span,
                    self.cursor.line(),
                ))
            }
        };
        Ok(Expr::new(kind, span))
    }

    /// `[a, b, c]`, trailing comma allowed. The `[` is already consumed.
    fn parse_array(&mut self, start: Span) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        while !self.cursor.check(&Token::RBracket) {
            items.push(self.parse_expr()?);
            if !self.cursor.eat(&Token::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&Token::RBracket)?;
        Ok(Expr::new(ExprKind::Array(items), start.merge(end)))
    }

    /// `{a: 1, "b": 2, c}`, trailing comma allowed. The `{` is already consumed.
    fn parse_object(&mut self, start: Span) -> Result<Expr, ParseError> {
        let mut entries = Vec::new();
        while !self.cursor.check(&Token::RBrace) {
            let key_span = self.cursor.current_span();
            let (key, shorthand) = match self.cursor.peek() {
                Some(Token::Ident(name)) => (name.clone(), true),
                Some(Token::Str(s)) => (s.clone(), false),
                Some(Token::Int(n)) => (n.to_string(), false),
                Some(other) => match keyword_as_name(other) {
                    Some(name) => (name.to_owned(), false),
                    None => return Err(self.cursor.unexpected("property name")),
                },
                None => return Err(self.cursor.unexpected("property name")),
            };
            self.cursor.advance();

            let value = if self.cursor.eat(&Token::Colon) {
                self.parse_expr()?
            } else if shorthand {
                Expr::new(name_expr(&key), key_span)
            } else {
                return Err(self.cursor.unexpected("`:`"));
            };
            entries.push((key, value));

            if !self.cursor.eat(&Token::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&Token::RBrace)?;
        Ok(Expr::new(ExprKind::Object(entries), start.merge(end)))
    }
}
