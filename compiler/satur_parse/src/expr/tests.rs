use crate::parse_expression;
use pretty_assertions::assert_eq;
use satur_ir::{BinaryOp, Expr, ExprKind, UnaryOp};

/// Strip spans so trees compare structurally.
fn shape(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Null => "null".into(),
        ExprKind::Bool(b) => b.to_string(),
        ExprKind::Int(n) => n.to_string(),
        ExprKind::Float(n) => format!("{n:?}"),
        ExprKind::Str(s) => format!("{s:?}"),
        ExprKind::Array(items) => {
            format!("[{}]", items.iter().map(shape).collect::<Vec<_>>().join(", "))
        }
        ExprKind::Object(entries) => format!(
            "{{{}}}",
            entries
                .iter()
                .map(|(k, v)| format!("{k}: {}", shape(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Data => "$".into(),
        ExprKind::InstanceKey => "<key>".into(),
        ExprKind::HostProps => "<host-props>".into(),
        ExprKind::IsServer => "<is-server>".into(),
        ExprKind::Member { object, field } => format!("{}.{field}", shape(object)),
        ExprKind::Index { object, index } => format!("{}[{}]", shape(object), shape(index)),
        ExprKind::Call { callee, args } => format!(
            "{}({})",
            shape(callee),
            args.iter().map(shape).collect::<Vec<_>>().join(", ")
        ),
        ExprKind::Unary { op, operand } => format!("({}{})", op.as_symbol(), shape(operand)),
        ExprKind::Binary { op, left, right } => {
            format!("({} {} {})", shape(left), op.as_symbol(), shape(right))
        }
        ExprKind::Conditional {
            condition,
            then,
            otherwise,
        } => format!(
            "({} ? {} : {})",
            shape(condition),
            shape(then),
            shape(otherwise)
        ),
    }
}

fn parse(source: &str) -> String {
    shape(&parse_expression(source).unwrap())
}

// === Precedence ===

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    assert_eq!(parse("1 + 2 * 3 - 4"), "((1 + (2 * 3)) - 4)");
}

#[test]
fn test_logical_and_comparison_levels() {
    assert_eq!(
        parse("a < b && c === d || !e"),
        "(((a < b) && (c === d)) || (!e))"
    );
}

#[test]
fn test_coalesce_below_or() {
    assert_eq!(parse("a || b ?? c"), "((a || b) ?? c)");
}

#[test]
fn test_conditional_is_right_associative() {
    assert_eq!(parse("a ? b : c ? d : e"), "(a ? b : (c ? d : e))");
}

#[test]
fn test_unary_chain() {
    assert_eq!(parse("!!-x"), "(!(!(-x)))");
}

#[test]
fn test_grouping_overrides_precedence() {
    assert_eq!(parse("(1 + 2) * 3"), "((1 + 2) * 3)");
}

// === Postfix and literals ===

#[test]
fn test_member_index_and_call_chain() {
    assert_eq!(
        parse("user.tags[0].format(locale, 2)"),
        "user.tags[0].format(locale, 2)"
    );
}

#[test]
fn test_keyword_member_name() {
    assert_eq!(parse("range.in"), "range.in");
}

#[test]
fn test_array_and_object_literals() {
    assert_eq!(
        parse("[1, 'two', {a: 1, \"b c\": null, d,}]"),
        "[1, \"two\", {a: 1, b c: null, d: d}]"
    );
}

#[test]
fn test_reserved_names_lower_to_dedicated_nodes() {
    assert_eq!(
        parse("[$, $ctxKey, $pageProps, $isServer, $other]"),
        "[$, <key>, <host-props>, <is-server>, $other]"
    );
}

#[test]
fn test_undefined_is_null() {
    assert_eq!(parse("undefined"), "null");
}

#[test]
fn test_operator_kinds() {
    let expr = parse_expression("a !== b").unwrap();
    assert!(matches!(
        expr.kind,
        ExprKind::Binary {
            op: BinaryOp::StrictNotEq,
            ..
        }
    ));
    let expr = parse_expression("+a").unwrap();
    assert!(matches!(
        expr.kind,
        ExprKind::Unary {
            op: UnaryOp::Plus,
            ..
        }
    ));
}

// === Errors ===

#[test]
fn test_trailing_tokens_rejected() {
    assert!(parse_expression("a b").is_err());
}

#[test]
fn test_missing_operand() {
    let err = parse_expression("1 +").unwrap_err();
    assert_eq!(
        err.kind.to_string(),
        "unexpected end of directive, expected expression"
    );
}

#[test]
fn test_unclosed_call() {
    assert!(parse_expression("f(a, b").is_err());
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse(&source), "1");
}
