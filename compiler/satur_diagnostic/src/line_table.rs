//! Line lookup for byte offsets.
//!
//! For repeated lookups on the same template, use [`LineOffsetTable`], which
//! pre-computes line starts instead of rescanning the source per query.

use satur_ir::Span;

/// Pre-computed byte offset of every line start.
///
/// ```
/// use satur_diagnostic::LineOffsetTable;
///
/// let source = "line1\nline2\nline3";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.line_from_offset(0), 1);
/// assert_eq!(table.line_from_offset(6), 2);
/// assert_eq!(table.line_from_offset(12), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// `offsets[i]` is the byte where line `i + 1` starts.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(
            memchr::memchr_iter(b'\n', source.as_bytes())
                .map(|i| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        );
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    ///
    /// A newline byte belongs to the line it terminates.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let index = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(index + 1).unwrap_or(u32::MAX)
    }

    /// 1-based line of the span's start.
    #[inline]
    pub fn line_of(&self, span: Span) -> u32 {
        self.line_from_offset(span.start)
    }

    /// (line, column), both 1-based; the column counts bytes.
    pub fn offset_to_line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let start = self.offsets[(line - 1) as usize];
        (line, offset - start + 1)
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// One-shot line lookup without building a table.
pub fn line_from_offset(source: &str, offset: u32) -> u32 {
    let end = (offset as usize).min(source.len());
    let newlines = memchr::memchr_iter(b'\n', &source.as_bytes()[..end]).count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests;
