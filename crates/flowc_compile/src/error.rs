//! The user-facing error taxonomy (`spec.md` §7): every phase's local,
//! span-or-fail-fast error type converts into one `CompileError` here via
//! `From`, so collaborators only ever see one shape.

use flowc_base::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Reference,
    Type,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Reference => "reference",
            ErrorCategory::Type => "type",
            ErrorCategory::Runtime => "runtime",
        };
        write!(f, "{}", s)
    }
}

/// 1-based line/column span, resolved against the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl CodeSpan {
    pub fn resolve(span: Span, source: &str) -> Self {
        let (start_line, start_col) = span.start_line_col(source);
        let (end_line, end_col) = span.end_line_col(source);
        Self { start_line, start_col, end_line, end_col }
    }
}

#[derive(Debug, Clone)]
pub struct CompileError {
    pub category: ErrorCategory,
    pub message: String,
    pub span: Option<CodeSpan>,
    /// The source line(s) the span covers, included verbatim for rendering.
    pub code_context: Option<String>,
    pub suggestions: Vec<String>,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

impl std::error::Error for CompileError {}

/// Renders the single source line a span starts on, for `code_context`.
pub fn line_context(source: &str, span: Span) -> Option<String> {
    let (line, _) = span.start_line_col(source);
    source.lines().nth((line as usize).checked_sub(1)?).map(|l| l.to_string())
}
