//! Unary and binary operator semantics.
//!
//! Follows the loose typing of script expressions: `+` concatenates when
//! either side is textual, arithmetic coerces to numbers, integer arithmetic
//! stays integral until it overflows or divides.

use std::cmp::Ordering;

use satur_ir::{BinaryOp, UnaryOp};

use crate::value::format_number;
use crate::{EvalResult, Value};

/// Evaluate a binary operation on already-evaluated operands.
///
/// Short-circuit operators are handled by the interpreter before evaluating
/// the right side; here they fall back to their value-selecting meaning.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let value = match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic(left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => Value::Float(left.to_number() / right.to_number()),
        BinaryOp::Mod => modulo(left, right),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::LtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::GtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::Eq => Value::Bool(loose_equals(left, right)),
        BinaryOp::NotEq => Value::Bool(!loose_equals(left, right)),
        BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOp::StrictNotEq => Value::Bool(!strict_equals(left, right)),
        BinaryOp::And => {
            if left.is_truthy() {
                right.clone()
            } else {
                left.clone()
            }
        }
        BinaryOp::Or => {
            if left.is_truthy() {
                left.clone()
            } else {
                right.clone()
            }
        }
        BinaryOp::Coalesce => {
            if left.is_null() {
                right.clone()
            } else {
                left.clone()
            }
        }
    };
    Ok(value)
}

pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    let value = match (op, operand) {
        (UnaryOp::Not, v) => Value::Bool(!v.is_truthy()),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map_or_else(|| Value::Float(-operand.to_number()), Value::Int),
        (UnaryOp::Neg, v) => Value::Float(-v.to_number()),
        (UnaryOp::Plus, Value::Int(n)) => Value::Int(*n),
        (UnaryOp::Plus, v) => Value::Float(v.to_number()),
    };
    Ok(value)
}

fn is_textual(value: &Value) -> bool {
    matches!(
        value,
        Value::Str(_) | Value::Markup(_) | Value::Array(_) | Value::Object(_) | Value::Function(_)
    )
}

fn add(left: &Value, right: &Value) -> Value {
    if is_textual(left) || is_textual(right) {
        let mut out = concat_part(left);
        out.push_str(&concat_part(right));
        return Value::from(out);
    }
    arithmetic(left, right, i64::checked_add, |a, b| a + b)
}

fn concat_part(value: &Value) -> String {
    match value {
        Value::Float(n) => format_number(*n),
        other => other.to_display_string(),
    }
}

/// Integer fast path with float fallback on overflow or non-integer operands.
fn arithmetic(
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Value {
    if let (Some(a), Some(b)) = (as_int(left), as_int(right)) {
        if let Some(n) = int_op(a, b) {
            return Value::Int(n);
        }
    }
    Value::Float(float_op(left.to_number(), right.to_number()))
}

fn modulo(left: &Value, right: &Value) -> Value {
    if let (Some(a), Some(b)) = (as_int(left), as_int(right)) {
        if let Some(n) = a.checked_rem(b) {
            return Value::Int(n);
        }
    }
    Value::Float(left.to_number() % right.to_number())
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null => Some(0),
        _ => None,
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

fn is_numeric(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Float(_))
}

/// `===`: same type and value; containers and functions by identity.
pub(crate) fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (a, b) if is_numeric(a) && is_numeric(b) => {
            #[allow(clippy::float_cmp)]
            let equal = a.to_number() == b.to_number();
            equal
        }
        (Value::Str(a), Value::Str(b)) | (Value::Markup(a), Value::Markup(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => std::rc::Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => std::rc::Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// `==`: numbers, numeric strings and booleans compare numerically.
pub(crate) fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Str(_), Value::Str(_)) => strict_equals(left, right),
        (a, b) if is_loose_scalar(a) && is_loose_scalar(b) => {
            #[allow(clippy::float_cmp)]
            let equal = a.to_number() == b.to_number();
            equal
        }
        _ => strict_equals(left, right),
    }
}

fn is_loose_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::Str(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bin(left: impl Into<Value>, op: BinaryOp, right: impl Into<Value>) -> Value {
        evaluate_binary(&left.into(), &right.into(), op).unwrap()
    }

    #[test]
    fn test_add_numbers_and_strings() {
        assert_eq!(bin(2, BinaryOp::Add, 3), Value::Int(5));
        assert_eq!(bin("a", BinaryOp::Add, 1), Value::from("a1"));
        assert_eq!(bin(1.5, BinaryOp::Add, "x"), Value::from("1.5x"));
        assert_eq!(bin(true, BinaryOp::Add, 1), Value::Int(2));
    }

    #[test]
    fn test_integer_overflow_falls_back_to_float() {
        let value = bin(i64::MAX, BinaryOp::Add, 1);
        assert!(matches!(value, Value::Float(_)));
    }

    #[test]
    fn test_division_is_float() {
        assert_eq!(bin(7, BinaryOp::Div, 2), Value::Float(3.5));
        assert_eq!(bin(6, BinaryOp::Div, 3).to_display_string(), "2");
        assert_eq!(bin(1, BinaryOp::Div, 0).to_display_string(), "Infinity");
    }

    #[test]
    fn test_modulo_by_zero_is_nan() {
        assert_eq!(bin(7, BinaryOp::Mod, 3), Value::Int(1));
        assert_eq!(bin(7, BinaryOp::Mod, 0).to_display_string(), "NaN");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(bin(1, BinaryOp::Lt, 2), Value::Bool(true));
        assert_eq!(bin("b", BinaryOp::Gt, "a"), Value::Bool(true));
        assert_eq!(bin(2, BinaryOp::LtEq, 2.0), Value::Bool(true));
        assert_eq!(bin("x", BinaryOp::Lt, 1), Value::Bool(false));
    }

    #[test]
    fn test_equality_loose_and_strict() {
        assert_eq!(bin(1, BinaryOp::Eq, "1"), Value::Bool(true));
        assert_eq!(bin(1, BinaryOp::StrictEq, "1"), Value::Bool(false));
        assert_eq!(bin(1, BinaryOp::StrictEq, 1.0), Value::Bool(true));
        assert_eq!(bin(Value::Null, BinaryOp::Eq, 0), Value::Bool(false));
        assert_eq!(bin(Value::Null, BinaryOp::NotEq, Value::Null), Value::Bool(false));
    }

    #[test]
    fn test_unary() {
        assert_eq!(evaluate_unary(UnaryOp::Not, &Value::from("")).unwrap(), Value::Bool(true));
        assert_eq!(evaluate_unary(UnaryOp::Neg, &Value::Int(4)).unwrap(), Value::Int(-4));
        assert_eq!(evaluate_unary(UnaryOp::Plus, &Value::from("2.5")).unwrap(), Value::Float(2.5));
    }
}
