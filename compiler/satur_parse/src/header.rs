//! Grammars of individual directives.
//!
//! Each function receives the directive content produced by the scanner, the
//! content's span in the template and the directive's line.

use satur_ir::{Expr, LoopBinding, Span, Stmt};
use satur_lexer::{tokenize, SpannedToken, Token};

use crate::cursor::Cursor;
use crate::expr::Parser;
use crate::ParseError;

fn lex(content: &str, span: Span, line: u32) -> Result<Vec<SpannedToken>, ParseError> {
    tokenize(content, span.start).map_err(|e| ParseError::lex(e, line))
}

fn end_of(span: Span) -> Span {
    Span::new(span.end, span.end)
}

/// Parse a standalone expression (used outside templates, e.g. event
/// handler arguments).
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let span = Span::clamped(0..source.len());
    expression(source, span, 1)
}

/// An interpolation body: one expression and nothing else.
pub(crate) fn expression(content: &str, span: Span, line: u32) -> Result<Expr, ParseError> {
    let tokens = lex(content, span, line)?;
    let mut parser = Parser::new(Cursor::new(&tokens, line, end_of(span)));
    let expr = parser.parse_expr()?;
    parser.cursor.expect_end()?;
    Ok(expr)
}

/// `cond)`: the remainder of `if (` or `else if (`.
pub(crate) fn condition(content: &str, span: Span, line: u32) -> Result<Expr, ParseError> {
    let tokens = lex(content, span, line)?;
    let mut parser = Parser::new(Cursor::new(&tokens, line, end_of(span)));
    let expr = parser.parse_expr()?;
    parser.cursor.expect(&Token::RParen)?;
    parser.cursor.expect_end()?;
    Ok(expr)
}

/// `else` content: empty, or `if (cond)`.
pub(crate) fn else_condition(
    content: &str,
    span: Span,
    line: u32,
) -> Result<Option<Expr>, ParseError> {
    if content.is_empty() {
        return Ok(None);
    }
    let tokens = lex(content, span, line)?;
    let mut parser = Parser::new(Cursor::new(&tokens, line, end_of(span)));
    let is_else_if = matches!(parser.cursor.peek(), Some(Token::Ident(kw)) if kw == "if")
        && parser.cursor.peek_nth(1) == Some(&Token::LParen);
    if !is_else_if {
        return Err(ParseError::malformed(
            "else",
            "expected nothing or `if (condition)` after `else`",
            span,
            line,
        ));
    }
    parser.cursor.advance();
    parser.cursor.advance();
    let expr = parser.parse_expr()?;
    parser.cursor.expect(&Token::RParen)?;
    parser.cursor.expect_end()?;
    Ok(Some(expr))
}

/// `k, v in expr)` or `v in expr)`: the remainder of `for (`.
pub(crate) fn loop_header(
    content: &str,
    span: Span,
    line: u32,
) -> Result<(LoopBinding, Expr), ParseError> {
    let tokens = lex(content, span, line)?;
    let mut parser = Parser::new(Cursor::new(&tokens, line, end_of(span)));
    let (first, _) = parser.cursor.expect_ident()?;
    let second = if parser.cursor.eat(&Token::Comma) {
        Some(parser.cursor.expect_ident()?.0)
    } else {
        None
    };
    parser.cursor.expect(&Token::In)?;
    let iterable = parser.parse_expr()?;
    parser.cursor.expect(&Token::RParen)?;
    parser.cursor.expect_end()?;

    let binding = match second {
        Some(value) => LoopBinding {
            key: Some(first),
            value,
        },
        None => LoopBinding {
            key: None,
            value: first,
        },
    };
    Ok((binding, iterable))
}

/// `name(args)` of a block or component call.
pub(crate) struct CallHeader {
    pub target: String,
    pub args: Expr,
}

/// Parse `target(args)`. The target is everything before the first `(` and
/// may be a path (`./components/Counter`); args default to `{}`.
pub(crate) fn call_header(
    directive: &'static str,
    content: &str,
    span: Span,
    line: u32,
) -> Result<CallHeader, ParseError> {
    let paren = content.find('(');
    let target = paren.map_or(content, |i| &content[..i]).trim();
    if target.is_empty() || target.contains(char::is_whitespace) {
        return Err(ParseError::malformed(
            directive,
            "expected a name followed by `(args)`",
            span,
            line,
        ));
    }

    let Some(open) = paren else {
        return Ok(CallHeader {
            target: target.to_owned(),
            args: Expr::empty_object(span),
        });
    };

    let rest = &content[open + 1..];
    let rest_start = span.start + u32::try_from(open + 1).unwrap_or(u32::MAX);
    let rest_span = Span::new(rest_start, span.end);
    let tokens = lex(rest, rest_span, line)?;
    let mut parser = Parser::new(Cursor::new(&tokens, line, end_of(span)));

    let args = if parser.cursor.check(&Token::RParen) {
        Expr::empty_object(rest_span)
    } else {
        parser.parse_expr()?
    };
    parser.cursor.expect(&Token::RParen)?;
    parser.cursor.expect_end()?;

    Ok(CallHeader {
        target: target.to_owned(),
        args,
    })
}

/// Statements of a code splice: `let x = 1; y = x + 1`.
pub(crate) fn statements(content: &str, span: Span, line: u32) -> Result<Vec<Stmt>, ParseError> {
    let tokens = lex(content, span, line)?;
    let mut parser = Parser::new(Cursor::new(&tokens, line, end_of(span)));
    let mut stmts = Vec::new();

    loop {
        while parser.cursor.eat(&Token::Semicolon) {}
        if parser.cursor.is_at_end() {
            break;
        }

        let declare = matches!(
            parser.cursor.peek(),
            Some(Token::Let | Token::Const | Token::Var)
        );
        if declare {
            parser.cursor.advance();
        }
        let (name, _) = parser.cursor.expect_ident()?;
        parser.cursor.expect(&Token::Eq)?;
        let value = parser.parse_expr()?;
        stmts.push(if declare {
            Stmt::Declare { name, value }
        } else {
            Stmt::Assign { name, value }
        });

        if !parser.cursor.is_at_end() {
            parser.cursor.expect(&Token::Semicolon)?;
        }
    }
    Ok(stmts)
}

/// Parse code-splice statements outside a template.
pub fn parse_statements(source: &str) -> Result<Vec<Stmt>, ParseError> {
    statements(source, Span::clamped(0..source.len()), 1)
}
