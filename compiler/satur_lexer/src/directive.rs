//! Directive scanner.
//!
//! Splits template markup into text runs and directives. A directive is
//! everything between an open and the next close delimiter; its kind is
//! decided by the first non-space characters of its content:
//!
//! | Prefix           | Kind        |
//! |------------------|-------------|
//! | `#`              | comment     |
//! | `/`              | close       |
//! | `-`              | raw         |
//! | `>`              | code splice |
//! | `$` + whitespace | block call  |
//! | `@`              | component   |
//! | `for (`          | for         |
//! | `if (`           | if          |
//! | `else`           | else        |
//! | anything else    | escaped     |
//!
//! `$` needs trailing whitespace because `{{$ctxKey}}` is an ordinary
//! interpolation of a reserved name.

use std::ops::Range;

use memchr::memmem;
use satur_diagnostic::LineOffsetTable;
use satur_ir::Span;

use crate::LexError;

/// Open/close delimiter pair. Defaults to `{{` / `}}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Delimiters {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::new("{{", "}}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Escaped,
    Raw,
    If,
    Else,
    For,
    Close,
    Comment,
    Block,
    Component,
    Code,
}

impl DirectiveKind {
    /// Human-readable name for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            DirectiveKind::Escaped => "interpolation",
            DirectiveKind::Raw => "raw interpolation",
            DirectiveKind::If => "if",
            DirectiveKind::Else => "else",
            DirectiveKind::For => "for",
            DirectiveKind::Close => "close",
            DirectiveKind::Comment => "comment",
            DirectiveKind::Block => "block call",
            DirectiveKind::Component => "component call",
            DirectiveKind::Code => "code splice",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    Directive(DirectiveKind),
}

/// A text run or a classified directive.
///
/// For directives `content` is the trimmed text after the prefix marker. For
/// `if`/`for` it is everything after the opening parenthesis, so it still ends
/// with `)`. `span` covers `content` inside the template source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment<'src> {
    pub kind: SegmentKind,
    pub content: &'src str,
    pub span: Span,
    /// 1-based line of the segment's first byte.
    pub line: u32,
}

/// Split `source` into segments.
pub fn scan<'src>(
    source: &'src str,
    delimiters: &Delimiters,
) -> Result<Vec<Segment<'src>>, LexError> {
    let table = LineOffsetTable::build(source);
    let bytes = source.as_bytes();
    let open = memmem::Finder::new(delimiters.open.as_bytes());
    let close = memmem::Finder::new(delimiters.close.as_bytes());

    let mut segments = Vec::new();
    let mut pos = 0;

    while let Some(found) = open.find(&bytes[pos..]) {
        let start = pos + found;
        if start > pos {
            segments.push(text_segment(source, pos..start, &table));
        }

        let inner_start = start + delimiters.open.len();
        let Some(close_at) = close.find(&bytes[inner_start..]) else {
            return Err(LexError::Unterminated {
                close: delimiters.close.clone(),
                span: Span::clamped(start..source.len()),
            });
        };
        let inner_end = inner_start + close_at;

        if let Some(nested) = open.find(&bytes[inner_start..inner_end]) {
            let at = inner_start + nested;
            return Err(LexError::Nested {
                open: delimiters.open.clone(),
                span: Span::clamped(at..at + delimiters.open.len()),
            });
        }

        let raw = &source[inner_start..inner_end];
        let (kind, range) = classify(raw);
        segments.push(Segment {
            kind: SegmentKind::Directive(kind),
            content: &raw[range.clone()],
            span: Span::clamped(inner_start + range.start..inner_start + range.end),
            line: table.line_from_offset(u32::try_from(start).unwrap_or(u32::MAX)),
        });
        tracing::trace!(kind = kind.describe(), at = start, "directive");

        pos = inner_end + delimiters.close.len();
    }

    if pos < source.len() {
        segments.push(text_segment(source, pos..source.len(), &table));
    }
    Ok(segments)
}

fn text_segment<'src>(
    source: &'src str,
    range: Range<usize>,
    table: &LineOffsetTable,
) -> Segment<'src> {
    let span = Span::clamped(range.clone());
    Segment {
        kind: SegmentKind::Text,
        content: &source[range],
        span,
        line: table.line_from_offset(span.start),
    }
}

/// Decide the directive kind and the range of its content within `raw`.
fn classify(raw: &str) -> (DirectiveKind, Range<usize>) {
    let lead = raw.len() - raw.trim_start().len();
    let body = &raw[lead..];

    let marker = match body.as_bytes().first() {
        Some(b'#') => Some(DirectiveKind::Comment),
        Some(b'/') => Some(DirectiveKind::Close),
        Some(b'-') => Some(DirectiveKind::Raw),
        Some(b'>') => Some(DirectiveKind::Code),
        Some(b'@') => Some(DirectiveKind::Component),
        Some(b'$') if starts_block_name(&body[1..]) => Some(DirectiveKind::Block),
        _ => None,
    };
    if let Some(kind) = marker {
        return (kind, trimmed(raw, lead + 1));
    }

    if let Some(after) = keyword_paren(body, "for") {
        return (DirectiveKind::For, trimmed(raw, lead + after));
    }
    if let Some(after) = keyword_paren(body, "if") {
        return (DirectiveKind::If, trimmed(raw, lead + after));
    }
    if body.starts_with("else") && !body[4..].starts_with(is_ident_char) {
        return (DirectiveKind::Else, trimmed(raw, lead + 4));
    }

    (DirectiveKind::Escaped, trimmed(raw, 0))
}

/// If `body` is `keyword`, optional whitespace, then `(`, return the offset
/// just past the parenthesis.
fn keyword_paren(body: &str, keyword: &str) -> Option<usize> {
    let rest = body.strip_prefix(keyword)?;
    let gap = rest.len() - rest.trim_start().len();
    rest[gap..]
        .starts_with('(')
        .then_some(keyword.len() + gap + 1)
}

/// `$` marks a block call only when whitespace and then a name follow it;
/// otherwise it is the data record.
fn starts_block_name(rest: &str) -> bool {
    let name = rest.trim_start();
    name.len() < rest.len() && name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Range of `raw[from..]` with surrounding whitespace removed.
fn trimmed(raw: &str, from: usize) -> Range<usize> {
    let tail = &raw[from..];
    let lead = tail.len() - tail.trim_start().len();
    let start = from + lead;
    start..start + tail.trim().len()
}

#[cfg(test)]
mod tests;
