//! Expression parsing.
//!
//! # Module Structure
//!
//! - `mod.rs`: entry point (`parse_expr`) and the binary precedence chain
//! - `operators.rs`: token to operator matching
//! - `primary.rs`: literals, identifiers, array and object literals
//! - `postfix.rs`: member access, indexing and calls
//!
//! Precedence, lowest first: `?:`, `??`, `||`, `&&`, equality, comparison,
//! additive, multiplicative, unary, postfix.

mod operators;
mod postfix;
mod primary;

use satur_ir::{ensure_sufficient_stack, BinaryOp, Expr, ExprKind};
use satur_lexer::Token;

use crate::cursor::Cursor;
use crate::ParseError;

/// Recursive-descent parser over one directive's tokens.
pub(crate) struct Parser<'t> {
    pub cursor: Cursor<'t>,
}

type Level<'t> = fn(&mut Parser<'t>) -> Result<Expr, ParseError>;

impl<'t> Parser<'t> {
    pub fn new(cursor: Cursor<'t>) -> Self {
        Parser { cursor }
    }

    /// Parse an expression.
    ///
    /// Uses `ensure_sufficient_stack` so deeply nested parentheses and long
    /// operator chains cannot overflow.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_conditional())
    }

    /// `cond ? a : b` (right associative).
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_coalesce()?;
        if !self.cursor.eat(&Token::Question) {
            return Ok(condition);
        }
        let then = self.parse_expr()?;
        self.cursor.expect(&Token::Colon)?;
        let otherwise = self.parse_expr()?;
        let span = condition.span.merge(otherwise.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            span,
        ))
    }

    fn parse_coalesce(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_or, operators::match_coalesce)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_and, operators::match_or)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_equality, operators::match_and)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_comparison, operators::match_equality)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_additive, operators::match_comparison)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_multiplicative, operators::match_additive)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_unary, operators::match_multiplicative)
    }

    /// Left-associative fold of one precedence level.
    fn fold_binary(
        &mut self,
        operand: Level<'t>,
        matcher: fn(&Token) -> Option<BinaryOp>,
    ) -> Result<Expr, ParseError> {
        let mut left = operand(self)?;
        while let Some(op) = self.cursor.peek().and_then(matcher) {
            self.cursor.advance();
            let right = operand(self)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let Some(op) = self.cursor.peek().and_then(operators::match_unary) else {
            return self.parse_postfix();
        };
        let start = self.cursor.current_span();
        self.cursor.advance();
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }
}

#[cfg(test)]
mod tests;
