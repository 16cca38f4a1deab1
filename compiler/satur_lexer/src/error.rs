use satur_ir::Span;

/// Failure while splitting a template or tokenizing directive content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated directive: expected `{close}` before end of template")]
    Unterminated { close: String, span: Span },

    #[error("nested directive: `{open}` found inside an open directive")]
    Nested { open: String, span: Span },

    #[error("unexpected `{text}` in expression")]
    InvalidToken { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::Unterminated { span, .. }
            | LexError::Nested { span, .. }
            | LexError::InvalidToken { span, .. } => *span,
        }
    }
}
