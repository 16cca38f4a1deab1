//! Directive compiler.
//!
//! Folds the scanner's segments into a [`Program`] with a scope stack: `if`
//! and `for` push a frame, `else` switches the top `if` frame to its next
//! branch, a close directive pops. The root frame never pops.

use satur_diagnostic::line_from_offset;
use satur_ir::{Branch, Expr, LoopBinding, Node, Program, Span};
use satur_lexer::{scan, Delimiters, DirectiveKind, Segment, SegmentKind};

use crate::header;
use crate::{ParseError, ParseErrorKind};

enum FrameKind {
    Root,
    If {
        done: Vec<Branch>,
        /// Condition of the branch being filled; `None` once in `else`.
        pending: Option<(Expr, u32)>,
        span: Span,
        line: u32,
    },
    For {
        binding: LoopBinding,
        iterable: Expr,
        span: Span,
        line: u32,
    },
}

struct Frame {
    kind: FrameKind,
    nodes: Vec<Node>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Frame {
            kind,
            nodes: Vec::new(),
        }
    }
}

/// Compile template markup into a program.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn compile(source: &str, delimiters: &Delimiters) -> Result<Program, ParseError> {
    let segments = scan(source, delimiters).map_err(|e| {
        let line = line_from_offset(source, e.span().start);
        ParseError::lex(e, line)
    })?;

    let mut stack = vec![Frame::new(FrameKind::Root)];
    for segment in &segments {
        step(&mut stack, segment)?;
    }

    if stack.len() > 1 {
        let (directive, span, line) = match stack.last().map(|f| &f.kind) {
            Some(FrameKind::If { span, line, .. }) => ("if", *span, *line),
            Some(FrameKind::For { span, line, .. }) => ("for", *span, *line),
            _ => ("scope", Span::DUMMY, 0),
        };
        return Err(ParseError::new(
            ParseErrorKind::UnclosedScope { directive },
            span,
            line,
        ));
    }

    let nodes = stack.pop().map(|root| root.nodes).unwrap_or_default();
    tracing::debug!(nodes = nodes.len(), "compiled template");
    Ok(Program::new(nodes))
}

fn step(stack: &mut Vec<Frame>, segment: &Segment<'_>) -> Result<(), ParseError> {
    let Segment {
        kind,
        content,
        span,
        line,
    } = *segment;

    let directive = match kind {
        SegmentKind::Text => {
            push(stack, Node::Text(content.to_owned()));
            return Ok(());
        }
        SegmentKind::Directive(directive) => directive,
    };

    match directive {
        DirectiveKind::Comment => {}
        DirectiveKind::Escaped | DirectiveKind::Raw => {
            let expr = header::expression(content, span, line)?;
            push(
                stack,
                Node::Interpolate {
                    expr,
                    escape: directive == DirectiveKind::Escaped,
                    line,
                },
            );
        }
        DirectiveKind::If => {
            let condition = header::condition(content, span, line)?;
            stack.push(Frame::new(FrameKind::If {
                done: Vec::new(),
                pending: Some((condition, line)),
                span,
                line,
            }));
        }
        DirectiveKind::Else => {
            let condition = header::else_condition(content, span, line)?;
            switch_branch(stack, condition, line);
        }
        DirectiveKind::For => {
            let (binding, iterable) = header::loop_header(content, span, line)?;
            stack.push(Frame::new(FrameKind::For {
                binding,
                iterable,
                span,
                line,
            }));
        }
        DirectiveKind::Close => close(stack, span, line)?,
        DirectiveKind::Block => {
            let call = header::call_header("block", content, span, line)?;
            push(
                stack,
                Node::Block {
                    name: call.target,
                    args: call.args,
                    line,
                },
            );
        }
        DirectiveKind::Component => {
            let call = header::call_header("component", content, span, line)?;
            push(
                stack,
                Node::Component {
                    reference: call.target,
                    args: call.args,
                    line,
                },
            );
        }
        DirectiveKind::Code => {
            let stmts = header::statements(content, span, line)?;
            push(stack, Node::Code { stmts, line });
        }
    }
    Ok(())
}

fn push(stack: &mut [Frame], node: Node) {
    if let Some(top) = stack.last_mut() {
        top.nodes.push(node);
    }
}

/// Finish the current branch of the innermost `if` and start the next.
///
/// An `else` with no `if` branch to continue is dropped with a warning; the
/// content after it stays in the current scope.
fn switch_branch(stack: &mut [Frame], condition: Option<Expr>, line: u32) {
    let Some(top) = stack.last_mut() else {
        return;
    };
    let FrameKind::If { done, pending, .. } = &mut top.kind else {
        tracing::warn!(line, "`else` outside of an `if`; ignoring it");
        return;
    };
    let Some((current, branch_line)) = pending.take() else {
        tracing::warn!(line, "`else` after a final `else`; ignoring it");
        return;
    };

    done.push(Branch {
        condition: current,
        body: std::mem::take(&mut top.nodes),
        line: branch_line,
    });
    *pending = condition.map(|c| (c, line));
}

fn close(stack: &mut Vec<Frame>, span: Span, line: u32) -> Result<(), ParseError> {
    if stack.len() <= 1 {
        return Err(ParseError::new(ParseErrorKind::UnexpectedClose, span, line));
    }
    let Some(frame) = stack.pop() else {
        return Err(ParseError::new(ParseErrorKind::UnexpectedClose, span, line));
    };

    let node = match frame.kind {
        FrameKind::If {
            mut done, pending, ..
        } => {
            let otherwise = match pending {
                Some((condition, branch_line)) => {
                    done.push(Branch {
                        condition,
                        body: frame.nodes,
                        line: branch_line,
                    });
                    None
                }
                None => Some(frame.nodes),
            };
            Node::If {
                branches: done,
                otherwise,
            }
        }
        FrameKind::For {
            binding,
            iterable,
            line,
            ..
        } => Node::For {
            binding,
            iterable,
            body: frame.nodes,
            line,
        },
        FrameKind::Root => {
            return Err(ParseError::new(ParseErrorKind::UnexpectedClose, span, line));
        }
    };
    push(stack, node);
    Ok(())
}
