//! Tree-walking interpreter for template programs.
//!
//! [`execute`] renders a [`Program`] into markup. Output is accumulated in a
//! single buffer; every directive node updates the current line before it
//! runs so a failure reports the line of the directive that raised it.

mod expr;
mod scope_guard;

use satur_ir::{ensure_sufficient_stack, Expr, Node, Program, Stmt};

use crate::{
    assign_to_undeclared, invalid_arguments, Environment, EvalError, EvalResult, RenderCall,
    RenderFailure, Value,
};

/// Render a program.
pub fn execute(program: &Program, call: RenderCall<'_>) -> Result<String, RenderFailure> {
    let mut interpreter = Interpreter::new(call);
    match interpreter.exec_nodes(&program.nodes) {
        Ok(()) => Ok(interpreter.out),
        Err(error) => {
            tracing::debug!(line = interpreter.line, %error, "render failed");
            Err(RenderFailure::new(error, interpreter.line))
        }
    }
}

/// Evaluate one expression against a data record, with no scope and the
/// plain call context.
pub fn evaluate(expr: &Expr, data: &Value) -> EvalResult {
    Interpreter::new(RenderCall::plain(data)).eval(expr)
}

pub(crate) struct Interpreter<'a> {
    call: RenderCall<'a>,
    pub(crate) env: Environment,
    /// Line of the directive being executed (0 before the first one).
    line: u32,
    out: String,
}

impl<'a> Interpreter<'a> {
    fn new(call: RenderCall<'a>) -> Self {
        Interpreter {
            call,
            env: Environment::new(),
            line: 0,
            out: String::new(),
        }
    }

    fn exec_nodes(&mut self, nodes: &[Node]) -> Result<(), EvalError> {
        ensure_sufficient_stack(|| {
            for node in nodes {
                self.exec_node(node)?;
            }
            Ok(())
        })
    }

    fn exec_node(&mut self, node: &Node) -> Result<(), EvalError> {
        match node {
            Node::Text(text) => {
                self.out.push_str(text);
                Ok(())
            }
            Node::Interpolate { expr, escape, line } => {
                self.line = *line;
                let value = self.eval(expr)?;
                let text = if *escape {
                    self.call.ctx.display_safe(&value)
                } else {
                    self.call.ctx.display(&value)
                };
                self.out.push_str(&text);
                Ok(())
            }
            Node::If {
                branches,
                otherwise,
            } => {
                for branch in branches {
                    self.line = branch.line;
                    if self.eval(&branch.condition)?.is_truthy() {
                        return self.with_env_scope(|scoped| scoped.exec_nodes(&branch.body));
                    }
                }
                match otherwise {
                    Some(body) => self.with_env_scope(|scoped| scoped.exec_nodes(body)),
                    None => Ok(()),
                }
            }
            Node::For {
                binding,
                iterable,
                body,
                line,
            } => {
                self.line = *line;
                let subject = self.eval(iterable)?;
                let entries = self.call.ctx.format_loop(&subject)?;
                tracing::trace!(line, count = entries.len(), "loop");
                for (key, value) in entries {
                    self.with_env_scope(|scoped| {
                        if let Some(name) = &binding.key {
                            scoped.env.define(name.as_str(), key);
                        }
                        scoped.env.define(binding.value.as_str(), value);
                        scoped.exec_nodes(body)
                    })?;
                    self.line = *line;
                }
                Ok(())
            }
            Node::Block { name, args, line } => {
                self.line = *line;
                let args = self.eval_args("block", args)?;
                let markup = self.call.ctx.render_block(name, &args)?;
                self.out.push_str(&markup);
                Ok(())
            }
            Node::Component {
                reference,
                args,
                line,
            } => {
                self.line = *line;
                let props = self.eval_args("component", args)?;
                let shown = props.get("$show").map_or(true, Value::is_truthy);
                let visible = self.call.ctx.visible() && shown;
                let rendered =
                    self.call
                        .ctx
                        .render_component(self.call.children, reference, &props, visible)?;
                let text = self.call.ctx.display_safe(&rendered);
                self.out.push_str(&text);
                Ok(())
            }
            Node::Code { stmts, line } => {
                self.line = *line;
                for stmt in stmts {
                    self.exec_stmt(stmt)?;
                }
                Ok(())
            }
        }
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        match stmt {
            Stmt::Declare { name, value } => {
                let value = self.eval(value)?;
                self.env.define(name.as_str(), value);
                Ok(())
            }
            Stmt::Assign { name, value } => {
                let value = self.eval(value)?;
                self.env
                    .assign(name, value)
                    .map_err(|_| assign_to_undeclared(name))
            }
        }
    }

    /// Arguments of block and component calls must evaluate to an object.
    fn eval_args(&mut self, directive: &str, args: &Expr) -> EvalResult {
        let value = self.eval(args)?;
        match value {
            Value::Object(_) => Ok(value),
            other => Err(invalid_arguments(directive, other.type_name())),
        }
    }
}
