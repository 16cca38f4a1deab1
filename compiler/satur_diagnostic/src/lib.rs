//! Satur Diagnostics - mapping failures back to template source.
//!
//! Two pieces:
//! - [`LineOffsetTable`]: pre-computed line starts for O(log L) offset to
//!   line lookup, built once per template compile.
//! - [`error_snippet`]: the line-windowed excerpt attached to compile and
//!   render errors, with `>>` marking the failing line.

mod line_table;
mod snippet;

pub use line_table::{line_from_offset, LineOffsetTable};
pub use snippet::{error_snippet, SNIPPET_RADIUS};
