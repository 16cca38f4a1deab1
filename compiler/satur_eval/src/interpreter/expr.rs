//! Expression evaluation.

use satur_ir::{ensure_sufficient_stack, BinaryOp, Expr, ExprKind};

use super::Interpreter;
use crate::{
    cannot_read_property, evaluate_binary, evaluate_unary, not_callable, undefined_variable,
    EvalResult, Object, Value,
};

impl Interpreter<'_> {
    pub(crate) fn eval(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr))
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Float(n) => Ok(Value::Float(*n)),
            ExprKind::Str(s) => Ok(Value::from(s.as_str())),
            ExprKind::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| self.eval(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(items))
            }
            ExprKind::Object(entries) => {
                let mut map = Object::with_capacity(entries.len());
                for (key, value) in entries {
                    let value = self.eval(value)?;
                    map.insert(key.clone(), value);
                }
                Ok(Value::from(map))
            }
            ExprKind::Ident(name) => self.lookup(name),
            ExprKind::Data => Ok(self.call.data.clone()),
            ExprKind::InstanceKey => Ok(self.call.instance_key.map_or(Value::Null, Value::from)),
            ExprKind::HostProps => Ok(self
                .call
                .host_props
                .map_or(Value::Null, crate::HostProps::to_value)),
            ExprKind::IsServer => Ok(Value::Bool(self.call.is_server)),
            ExprKind::Member { object, field } => {
                let object = self.eval(object)?;
                member(&object, field)
            }
            ExprKind::Index { object, index } => {
                let object = self.eval(object)?;
                let index = self.eval(index)?;
                index_into(&object, &index)
            }
            ExprKind::Call { callee, args } => {
                let function = self.eval(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                match function {
                    Value::Function(f) => f.call(&args),
                    _ => Err(not_callable(&callee_name(callee))),
                }
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                evaluate_unary(*op, &operand)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                match op {
                    BinaryOp::And if !left.is_truthy() => Ok(left),
                    BinaryOp::Or if left.is_truthy() => Ok(left),
                    BinaryOp::Coalesce if !left.is_null() => Ok(left),
                    _ => {
                        let right = self.eval(right)?;
                        evaluate_binary(&left, &right, *op)
                    }
                }
            }
            ExprKind::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
        }
    }

    /// Scope chain first, then the data record.
    fn lookup(&self, name: &str) -> EvalResult {
        if let Some(value) = self.env.lookup(name) {
            return Ok(value.clone());
        }
        self.call
            .data
            .get(name)
            .cloned()
            .ok_or_else(|| undefined_variable(name))
    }
}

fn member(object: &Value, field: &str) -> EvalResult {
    match object {
        Value::Object(map) => Ok(map.get(field).cloned().unwrap_or_default()),
        Value::Array(items) if field == "length" => Ok(length(items.len())),
        Value::Str(s) if field == "length" => Ok(length(s.chars().count())),
        Value::Null => Err(cannot_read_property(field, "null")),
        _ => Ok(Value::Null),
    }
}

fn index_into(object: &Value, index: &Value) -> EvalResult {
    match (object, index) {
        (Value::Null, _) => Err(cannot_read_property(&index.to_display_string(), "null")),
        (Value::Array(items), Value::Int(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .unwrap_or_default()),
        (Value::Str(s), Value::Int(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| s.chars().nth(i))
            .map_or(Value::Null, |c| Value::from(c.to_string()))),
        (_, key) => member(object, &key.to_display_string()),
    }
}

fn length(len: usize) -> Value {
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

/// Name used in "is not a function" messages.
fn callee_name(callee: &Expr) -> String {
    match &callee.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Member { object, field } => format!("{}.{field}", callee_name(object)),
        _ => "expression".to_owned(),
    }
}
