use super::*;
use proptest::prelude::*;

#[test]
fn test_line_from_offset_single_line() {
    let table = LineOffsetTable::build("hello world");
    assert_eq!(table.line_from_offset(0), 1);
    assert_eq!(table.line_from_offset(10), 1);
    assert_eq!(table.line_count(), 1);
}

#[test]
fn test_line_from_offset_multiple_lines() {
    let table = LineOffsetTable::build("line1\nline2\nline3");
    assert_eq!(table.line_from_offset(0), 1); // 'l' of line1
    assert_eq!(table.line_from_offset(5), 1); // '\n' after line1
    assert_eq!(table.line_from_offset(6), 2); // 'l' of line2
    assert_eq!(table.line_from_offset(11), 2);
    assert_eq!(table.line_from_offset(12), 3);
}

#[test]
fn test_line_of_span() {
    let table = LineOffsetTable::build("a\n{{ x }}\nb");
    assert_eq!(table.line_of(Span::new(2, 9)), 2);
}

#[test]
fn test_offset_to_line_col() {
    let table = LineOffsetTable::build("abc\ndefgh\nij");
    assert_eq!(table.offset_to_line_col(0), (1, 1));
    assert_eq!(table.offset_to_line_col(2), (1, 3));
    assert_eq!(table.offset_to_line_col(4), (2, 1));
    assert_eq!(table.offset_to_line_col(7), (2, 4));
    assert_eq!(table.offset_to_line_col(10), (3, 1));
}

#[test]
fn test_trailing_newline_starts_empty_line() {
    let table = LineOffsetTable::build("a\n");
    assert_eq!(table.line_count(), 2);
    assert_eq!(table.line_from_offset(2), 2);
}

#[test]
fn test_offset_past_end_clamps_to_last_line() {
    assert_eq!(line_from_offset("a\nb", 100), 2);
}

proptest! {
    #[test]
    fn table_agrees_with_linear_scan(source in "[a-z\n]{0,64}", offset in 0u32..64) {
        let table = LineOffsetTable::build(&source);
        let clamped = offset.min(u32::try_from(source.len()).unwrap_or(0));
        prop_assert_eq!(table.line_from_offset(clamped), line_from_offset(&source, clamped));
    }
}
