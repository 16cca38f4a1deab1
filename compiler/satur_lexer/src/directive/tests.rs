use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<(SegmentKind, &str)> {
    scan(source, &Delimiters::default())
        .unwrap()
        .into_iter()
        .map(|s| (s.kind, s.content))
        .collect()
}

fn directive(kind: DirectiveKind) -> SegmentKind {
    SegmentKind::Directive(kind)
}

// === Classification ===

#[test]
fn test_plain_text_is_one_segment() {
    assert_eq!(
        kinds("<p>hello</p>"),
        vec![(SegmentKind::Text, "<p>hello</p>")]
    );
}

#[test]
fn test_every_directive_marker() {
    let source = "{{ a }}{{- b }}{{# note }}{{if (c)}}{{else if(d)}}{{else}}{{/}}\
                  {{for (k, v in e)}}{{/}}{{$ cards.item({x: 1})}}{{@ Counter({n: 2})}}{{> let z = 1}}";
    assert_eq!(
        kinds(source),
        vec![
            (directive(DirectiveKind::Escaped), "a"),
            (directive(DirectiveKind::Raw), "b"),
            (directive(DirectiveKind::Comment), "note"),
            (directive(DirectiveKind::If), "c)"),
            (directive(DirectiveKind::Else), "if(d)"),
            (directive(DirectiveKind::Else), ""),
            (directive(DirectiveKind::Close), ""),
            (directive(DirectiveKind::For), "k, v in e)"),
            (directive(DirectiveKind::Close), ""),
            (directive(DirectiveKind::Block), "cards.item({x: 1})"),
            (directive(DirectiveKind::Component), "Counter({n: 2})"),
            (directive(DirectiveKind::Code), "let z = 1"),
        ]
    );
}

#[test]
fn test_keywords_need_word_boundary() {
    assert_eq!(
        kinds("{{ elsewhere }}{{ format(x) }}{{ iffy }}"),
        vec![
            (directive(DirectiveKind::Escaped), "elsewhere"),
            (directive(DirectiveKind::Escaped), "format(x)"),
            (directive(DirectiveKind::Escaped), "iffy"),
        ]
    );
}

#[test]
fn test_reserved_dollar_names_are_interpolations() {
    assert_eq!(
        kinds("{{$ctxKey}}{{ $ }}{{$ name()}}{{ $ ?? x }}{{$}}{{ $ .a }}"),
        vec![
            (directive(DirectiveKind::Escaped), "$ctxKey"),
            (directive(DirectiveKind::Escaped), "$"),
            (directive(DirectiveKind::Block), "name()"),
            (directive(DirectiveKind::Escaped), "$ ?? x"),
            (directive(DirectiveKind::Escaped), "$"),
            (directive(DirectiveKind::Escaped), "$ .a"),
        ]
    );
}

#[test]
fn test_if_without_space_before_paren() {
    assert_eq!(
        kinds("{{if(x)}}"),
        vec![(directive(DirectiveKind::If), "x)")]
    );
}

#[test]
fn test_custom_delimiters() {
    let delimiters = Delimiters::new("<%", "%>");
    let segments = scan("a<% x %>{{ y }}", &delimiters).unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[1].content, "x");
    assert_eq!(segments[2].content, "{{ y }}");
}

// === Spans and lines ===

#[test]
fn test_content_span_points_into_source() {
    let source = "ab{{  total  }}cd";
    let segments = scan(source, &Delimiters::default()).unwrap();
    let span = segments[1].span;
    assert_eq!(&source[span.to_range()], "total");
}

#[test]
fn test_lines_follow_newlines_in_text_and_directives() {
    let source = "<ul>\n{{ a }}\n{{# multi\nline }}\n{{ b }}";
    let lines: Vec<u32> = scan(source, &Delimiters::default())
        .unwrap()
        .iter()
        .filter(|s| s.kind != SegmentKind::Text)
        .map(|s| s.line)
        .collect();
    assert_eq!(lines, vec![2, 3, 5]);
}

// === Failures ===

#[test]
fn test_unterminated_directive() {
    let err = scan("ok {{ broken", &Delimiters::default()).unwrap_err();
    assert!(matches!(err, LexError::Unterminated { .. }));
    assert_eq!(err.span().start, 3);
}

#[test]
fn test_nested_open_delimiter() {
    let err = scan("{{ a {{ b }}", &Delimiters::default()).unwrap_err();
    assert!(matches!(err, LexError::Nested { .. }));
    assert_eq!(err.span(), Span::new(5, 7));
}

proptest! {
    #[test]
    fn text_without_delimiters_round_trips(text in "[a-z<>/ \n=\"]{1,80}") {
        let segments = scan(&text, &Delimiters::default()).unwrap();
        prop_assert_eq!(segments.len(), 1);
        prop_assert_eq!(segments[0].content, text.as_str());
    }
}
