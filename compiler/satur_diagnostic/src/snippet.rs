//! Line-windowed source excerpts for error messages.

use std::fmt::Write;

/// Lines shown on each side of the failing line.
pub const SNIPPET_RADIUS: u32 = 5;

/// Render the lines around `line` (1-based) as `"{tag} {n}| {text}"`.
///
/// The failing line is tagged `>>`, the others with two spaces. The window
/// starts `SNIPPET_RADIUS - 1` lines above the failing line and ends
/// `SNIPPET_RADIUS` lines below it, clamped to the source.
///
/// ```
/// use satur_diagnostic::error_snippet;
///
/// let snippet = error_snippet("a\nb\nc", 2);
/// assert_eq!(snippet, "   1| a\n>> 2| b\n   3| c");
/// ```
pub fn error_snippet(source: &str, line: u32) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let first = line.saturating_sub(SNIPPET_RADIUS) as usize;
    let last = (line.saturating_add(SNIPPET_RADIUS) as usize).min(lines.len());

    let mut out = String::new();
    for (index, text) in lines.iter().enumerate().take(last).skip(first) {
        let number = index + 1;
        let tag = if number == line as usize { ">>" } else { "  " };
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(out, "{tag} {number}| {text}");
    }
    out
}
