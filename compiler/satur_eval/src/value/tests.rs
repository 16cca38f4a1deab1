use super::*;
use pretty_assertions::assert_eq;

// === Truthiness ===

#[test]
fn test_truthiness() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(!Value::Float(f64::NAN).is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(Value::from("0").is_truthy());
    assert!(Value::array(vec![]).is_truthy());
    assert!(Value::empty_object().is_truthy());
}

// === Display strings ===

#[test]
fn test_display_string_of_scalars() {
    assert_eq!(Value::Null.to_display_string(), "null");
    assert_eq!(Value::Bool(true).to_display_string(), "true");
    assert_eq!(Value::Int(-3).to_display_string(), "-3");
    assert_eq!(Value::Float(2.0).to_display_string(), "2");
    assert_eq!(Value::Float(0.25).to_display_string(), "0.25");
}

#[test]
fn test_display_string_of_containers() {
    let items = Value::array(vec![Value::Int(1), Value::Null, Value::from("x")]);
    assert_eq!(items.to_display_string(), "1,,x");
    assert_eq!(Value::empty_object().to_display_string(), "[object Object]");
}

#[test]
fn test_format_number_special_values() {
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(format_number(-0.5), "-0.5");
}

// === Numbers ===

#[test]
fn test_to_number_coercions() {
    assert_eq!(Value::from(" 12 ").to_number(), 12.0);
    assert_eq!(Value::from("").to_number(), 0.0);
    assert!(Value::from("abc").to_number().is_nan());
    assert_eq!(Value::Bool(true).to_number(), 1.0);
}

// === JSON interchange ===

#[test]
fn test_json_conversion_preserves_order() {
    let json = serde_json::json!({"b": 1, "a": [true, null, "s"], "c": 1.5});
    let value = Value::from(&json);
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    assert_eq!(value.to_json(), json);
}

#[test]
fn test_functions_are_dropped_from_json() {
    let value = Value::object([
        ("count".to_owned(), Value::Int(1)),
        ("inc".to_owned(), Value::function("inc", |_| Ok(Value::Null))),
    ]);
    assert_eq!(value.to_json(), serde_json::json!({"count": 1}));
}

#[test]
fn test_function_equality_is_identity() {
    let f = Value::function("f", |_| Ok(Value::Null));
    let g = Value::function("f", |_| Ok(Value::Null));
    assert_eq!(f.clone(), f);
    assert!(f != g);
}
