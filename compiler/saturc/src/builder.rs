//! Render function builder.
//!
//! Compiles markup into a [`CompiledTemplate`] and maps compile and render
//! failures back to the template source.

use satur_diagnostic::error_snippet;
use satur_eval::{
    execute, CallContext, ChildRenderers, HostProps, RenderCall, RenderFailure, RenderFunction,
    Value,
};
use satur_ir::Program;
use satur_lexer::Delimiters;
use satur_parse::{compile, ParseError};

use crate::component::mark_root;
use crate::SaturError;

/// A template compiled once and rendered any number of times.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledTemplate {
    name: String,
    /// The source the program was compiled from (after root marking, for
    /// components), kept for error snippets.
    source: String,
    program: Program,
}

impl CompiledTemplate {
    /// Compile a page or block template.
    #[tracing::instrument(level = "debug", skip(source, delimiters))]
    pub fn build(name: &str, source: &str, delimiters: &Delimiters) -> Result<Self, SaturError> {
        let program = compile(source, delimiters).map_err(|e| compile_error(name, source, &e))?;
        tracing::debug!(nodes = program.nodes.len(), "template compiled");
        Ok(CompiledTemplate {
            name: name.to_owned(),
            source: source.to_owned(),
            program,
        })
    }

    /// Compile a component template: its first element is marked with the
    /// instance key before compiling.
    pub fn component(name: &str, source: &str, delimiters: &Delimiters) -> Result<Self, SaturError> {
        let marked = mark_root(name, source, delimiters)?;
        Self::build(name, &marked, delimiters)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Convert a render failure of this template into an engine error. The
    /// snippet is attached only when `with_snippet` is set.
    pub fn render_error(&self, failure: &RenderFailure, with_snippet: bool) -> SaturError {
        SaturError::Render {
            message: failure.error.message.clone(),
            file: self.name.clone(),
            line: failure.line,
            snippet: with_snippet.then(|| error_snippet(&self.source, failure.line)),
        }
    }
}

impl RenderFunction for CompiledTemplate {
    fn render(
        &self,
        ctx: &dyn CallContext,
        data: &Value,
        children: &dyn ChildRenderers,
        instance_key: Option<&str>,
        host_props: Option<&HostProps>,
        is_server: bool,
    ) -> Result<String, RenderFailure> {
        execute(
            &self.program,
            RenderCall {
                ctx,
                data,
                children,
                instance_key,
                host_props,
                is_server,
            },
        )
    }
}

pub(crate) fn compile_error(file: &str, source: &str, error: &ParseError) -> SaturError {
    SaturError::Compile {
        message: error.kind.to_string(),
        file: file.to_owned(),
        line: error.line,
        snippet: error_snippet(source, error.line),
    }
}
