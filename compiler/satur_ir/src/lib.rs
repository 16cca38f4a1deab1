//! Satur IR - shared types for the template compiler.
//!
//! This crate contains the data structures every compiler phase agrees on:
//! - Spans for byte locations inside a template source
//! - The expression AST used inside directives
//! - The template program (node tree) produced by the directive compiler
//! - Stack-growth helper for the recursive phases
//!
//! # Design Philosophy
//!
//! - **Tree, not text**: templates compile to a node tree that the evaluator
//!   walks; nothing is ever turned back into source code.
//! - **Lines travel with nodes**: every directive node records the 1-based
//!   source line it came from so a render failure can be mapped back.

mod ast;
mod program;
mod span;
mod stack;

pub use ast::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use program::{Branch, LoopBinding, Node, Program, Stmt};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
