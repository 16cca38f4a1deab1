//! Compiled template programs.
//!
//! A [`Program`] is the node tree produced by the directive compiler. Text
//! runs are kept verbatim; every directive node carries its 1-based source
//! line.

use crate::Expr;

/// Bindings introduced by a `for` directive.
///
/// `for (k, v in xs)` binds `key = Some("k")`, `value = "v"`.
/// `for (v in xs)` binds only the element.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopBinding {
    pub key: Option<String>,
    pub value: String,
}

/// One conditional arm (`if` or `else if`).
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub condition: Expr,
    pub body: Vec<Node>,
    pub line: u32,
}

/// A statement from a code splice (`{{> ...}}`).
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `let x = e`, `const x = e`, `var x = e`
    Declare { name: String, value: Expr },
    /// `x = e`
    Assign { name: String, value: Expr },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Literal markup, reproduced byte-for-byte.
    Text(String),
    /// `{{ e }}` when `escape`, `{{- e }}` otherwise.
    Interpolate { expr: Expr, escape: bool, line: u32 },
    If {
        branches: Vec<Branch>,
        otherwise: Option<Vec<Node>>,
    },
    For {
        binding: LoopBinding,
        iterable: Expr,
        body: Vec<Node>,
        line: u32,
    },
    /// `{{$ name(args)}}`
    Block { name: String, args: Expr, line: u32 },
    /// `{{@ reference(args)}}`
    Component {
        reference: String,
        args: Expr,
        line: u32,
    },
    /// `{{> stmts}}`
    Code { stmts: Vec<Stmt>, line: u32 },
}

/// A compiled template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub nodes: Vec<Node>,
}

impl Program {
    pub fn new(nodes: Vec<Node>) -> Self {
        Program { nodes }
    }

    /// Every component reference in the program, in source order.
    pub fn component_references(&self) -> Vec<(&str, u32)> {
        let mut out = Vec::new();
        walk(&self.nodes, &mut |node| {
            if let Node::Component {
                reference, line, ..
            } = node
            {
                out.push((reference.as_str(), *line));
            }
        });
        out
    }

    /// Every block name invoked by the program, in source order.
    pub fn block_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        walk(&self.nodes, &mut |node| {
            if let Node::Block { name, .. } = node {
                out.push(name.as_str());
            }
        });
        out
    }
}

fn walk<'a>(nodes: &'a [Node], visit: &mut impl FnMut(&'a Node)) {
    for node in nodes {
        visit(node);
        match node {
            Node::If {
                branches,
                otherwise,
            } => {
                for branch in branches {
                    walk(&branch.body, visit);
                }
                if let Some(body) = otherwise {
                    walk(body, visit);
                }
            }
            Node::For { body, .. } => walk(body, visit),
            Node::Text(_)
            | Node::Interpolate { .. }
            | Node::Block { .. }
            | Node::Component { .. }
            | Node::Code { .. } => {}
        }
    }
}
