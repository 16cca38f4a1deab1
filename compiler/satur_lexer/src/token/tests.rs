use super::*;
use pretty_assertions::assert_eq;

fn lex(source: &str) -> Vec<Token> {
    tokenize(source, 0)
        .unwrap()
        .into_iter()
        .map(|t| t.token)
        .collect()
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        lex("null undefined true false in nullable $ctxKey _x"),
        vec![
            Token::Null,
            Token::Undefined,
            Token::True,
            Token::False,
            Token::In,
            Token::Ident("nullable".into()),
            Token::Ident("$ctxKey".into()),
            Token::Ident("_x".into()),
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        lex("42 3.5 1.2e3 items.0"),
        vec![
            Token::Int(42),
            Token::Float(3.5),
            Token::Float(1200.0),
            Token::Ident("items".into()),
            Token::Dot,
            Token::Int(0),
        ]
    );
}

#[test]
fn test_strings_with_escapes() {
    assert_eq!(
        lex(r#""a\"b" 'it\'s' "<" "line\n""#),
        vec![
            Token::Str("a\"b".into()),
            Token::Str("it's".into()),
            Token::Str("<".into()),
            Token::Str("line\n".into()),
        ]
    );
}

#[test]
fn test_operators_longest_match() {
    assert_eq!(
        lex("a === b !== c == d != e <= f >= g && h || i ?? j"),
        vec![
            Token::Ident("a".into()),
            Token::EqEqEq,
            Token::Ident("b".into()),
            Token::NotEqEq,
            Token::Ident("c".into()),
            Token::EqEq,
            Token::Ident("d".into()),
            Token::NotEq,
            Token::Ident("e".into()),
            Token::LtEq,
            Token::Ident("f".into()),
            Token::GtEq,
            Token::Ident("g".into()),
            Token::AmpAmp,
            Token::Ident("h".into()),
            Token::PipePipe,
            Token::Ident("i".into()),
            Token::QuestionQuestion,
            Token::Ident("j".into()),
        ]
    );
}

#[test]
fn test_spans_are_shifted_by_base() {
    let tokens = tokenize("a + b", 10).unwrap();
    assert_eq!(tokens[0].span, Span::new(10, 11));
    assert_eq!(tokens[2].span, Span::new(14, 15));
}

#[test]
fn test_invalid_character() {
    let err = tokenize("a # b", 4).unwrap_err();
    assert_eq!(
        err,
        LexError::InvalidToken {
            text: "#".into(),
            span: Span::new(6, 7),
        }
    );
}

#[test]
fn test_unterminated_string_is_invalid() {
    assert!(tokenize("'open", 0).is_err());
}

#[test]
fn test_describe() {
    assert_eq!(Token::Ident("x".into()).describe(), "identifier `x`");
    assert_eq!(Token::RParen.describe(), "`)`");
}
