//! Operator matching helpers for the precedence chain.

use satur_ir::{BinaryOp, UnaryOp};
use satur_lexer::Token;

pub(super) fn match_coalesce(token: &Token) -> Option<BinaryOp> {
    matches!(token, Token::QuestionQuestion).then_some(BinaryOp::Coalesce)
}

pub(super) fn match_or(token: &Token) -> Option<BinaryOp> {
    matches!(token, Token::PipePipe).then_some(BinaryOp::Or)
}

pub(super) fn match_and(token: &Token) -> Option<BinaryOp> {
    matches!(token, Token::AmpAmp).then_some(BinaryOp::And)
}

pub(super) fn match_equality(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::EqEq => Some(BinaryOp::Eq),
        Token::NotEq => Some(BinaryOp::NotEq),
        Token::EqEqEq => Some(BinaryOp::StrictEq),
        Token::NotEqEq => Some(BinaryOp::StrictNotEq),
        _ => None,
    }
}

pub(super) fn match_comparison(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::Lt => Some(BinaryOp::Lt),
        Token::LtEq => Some(BinaryOp::LtEq),
        Token::Gt => Some(BinaryOp::Gt),
        Token::GtEq => Some(BinaryOp::GtEq),
        _ => None,
    }
}

pub(super) fn match_additive(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::Plus => Some(BinaryOp::Add),
        Token::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

pub(super) fn match_multiplicative(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::Star => Some(BinaryOp::Mul),
        Token::Slash => Some(BinaryOp::Div),
        Token::Percent => Some(BinaryOp::Mod),
        _ => None,
    }
}

pub(super) fn match_unary(token: &Token) -> Option<UnaryOp> {
    match token {
        Token::Bang => Some(UnaryOp::Not),
        Token::Minus => Some(UnaryOp::Neg),
        Token::Plus => Some(UnaryOp::Plus),
        _ => None,
    }
}
