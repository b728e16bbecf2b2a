//! Module source parsing.
//!
//! Wraps tree-sitter-python behind a single `parse` entry point that either
//! yields the tagged statement model or a `ParseFailure` carrying the trace
//! the report attaches for diagnostics. A parse failure is fatal for the
//! structural checks of one artifact, never for the run.

pub mod ast;
mod python;

pub use ast::{Alias, Expr, Module, Stmt};

/// Why a module could not be parsed.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    /// Multi-line diagnostic detail, attached to the report as a trace.
    pub trace: String,
    syntax: bool,
}

impl ParseFailure {
    pub(crate) fn syntax(trace: String) -> Self {
        Self { trace, syntax: true }
    }

    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        Self {
            trace: detail.into(),
            syntax: false,
        }
    }

    /// True when the source itself is malformed, as opposed to an internal
    /// parser problem.
    pub fn is_syntax_error(&self) -> bool {
        self.syntax
    }
}

/// Parse python module source into the tagged statement model.
pub fn parse(source: &str) -> Result<Module, ParseFailure> {
    python::parse_module(source)
}
