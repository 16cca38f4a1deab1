//! Postfix operations: `.field`, `[index]`, `(args)`.

use satur_ir::{Expr, ExprKind};
use satur_lexer::Token;

use super::primary::keyword_as_name;
use super::Parser;
use crate::ParseError;

impl Parser<'_> {
    pub(super) fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.cursor.eat(&Token::Dot) {
                let field = self.member_name()?;
                let span = expr.span.merge(self.cursor.previous_span());
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        field,
                    },
                    span,
                );
            } else if self.cursor.eat(&Token::LBracket) {
                let index = self.parse_expr()?;
                let end = self.cursor.expect(&Token::RBracket)?;
                let span = expr.span.merge(end);
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.cursor.eat(&Token::LParen) {
                let args = self.parse_call_args()?;
                let span = expr.span.merge(self.cursor.previous_span());
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn member_name(&mut self) -> Result<String, ParseError> {
        let name = match self.cursor.peek() {
            Some(Token::Ident(name)) => name.clone(),
            Some(other) => match keyword_as_name(other) {
                Some(name) => name.to_owned(),
                None => return Err(self.cursor.unexpected("property name")),
            },
            None => return Err(self.cursor.unexpected("property name")),
        };
        self.cursor.advance();
        Ok(name)
    }

    /// Arguments up to and including the closing `)`; `(` already consumed.
    pub(crate) fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        while !self.cursor.check(&Token::RParen) {
            args.push(self.parse_expr()?);
            if !self.cursor.eat(&Token::Comma) {
                break;
            }
        }
        self.cursor.expect(&Token::RParen)?;
        Ok(args)
    }
}
