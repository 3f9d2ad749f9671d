//! Diagnostics and error reporting for spec sources.
//!
//! Provides error values with location information and a console printer with
//! source highlighting.

use thiserror::Error;

use crate::ast::Span;

/// A compile-time error with location information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Syntax,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Syntax,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// Print an error with source context.
pub fn print_error(file_name: &str, source: &str, error: &CompileError) {
    let (line_num, col_num, line_text) = get_line_info(source, error.span.start);

    let red = "\x1b[31m";
    let cyan = "\x1b[36m";
    let bold = "\x1b[1m";
    let reset = "\x1b[0m";

    eprintln!(
        "{bold}{red}{kind}{reset}{bold}: {message}{reset}",
        kind = error.kind,
        message = error.message,
    );

    eprintln!(
        "  {cyan}-->{reset} {file}:{line}:{col}",
        file = file_name,
        line = line_num,
        col = col_num,
    );

    let line_num_width = format!("{}", line_num).len();
    eprintln!("  {cyan}{:>width$} |{reset}", "", width = line_num_width);
    eprintln!(
        "  {cyan}{:>width$} |{reset} {}",
        line_num,
        line_text,
        width = line_num_width
    );

    let underline_len = error
        .span
        .end
        .saturating_sub(error.span.start)
        .min(line_text.len().saturating_sub(col_num - 1))
        .max(1);

    eprintln!(
        "  {cyan}{:>width$} |{reset} {}{red}{}{reset}",
        "",
        " ".repeat(col_num - 1),
        "^".repeat(underline_len),
        width = line_num_width
    );

    eprintln!();
}

/// Get line number, column number, and line text for a byte offset.
fn get_line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    let line_text = &source[line_start..line_end];
    let col_num = offset - line_start + 1;

    (line_num, col_num, line_text)
}
