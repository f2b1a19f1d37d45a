// File: src/errors.rs
//
// Error handling and reporting for the rizz language.
// Provides source positions, parse-time diagnostics with pretty-printed
// pointer-style messages, and the runtime error type raised by the walker.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Source span of a token: where it starts and how many characters it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-based line number
    pub line: usize,
    /// 1-based column of the first character
    pub column: usize,
    /// Number of characters covered
    pub length: usize,
    /// Byte offset of the first character in the source text
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, length: usize, offset: usize) -> Self {
        Self { line, column, length, offset }
    }

    /// Returns the exact source text covered by this position.
    ///
    /// Out-of-range positions yield an empty slice instead of panicking.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let Some(rest) = source.get(self.offset..) else {
            return "";
        };
        let end = rest
            .char_indices()
            .nth(self.length)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// How serious a diagnostic is. Only the rendered label differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self, color: bool) -> String {
        match (self, color) {
            (Severity::Error, true) => "error:".red().bold().to_string(),
            (Severity::Error, false) => "error:".to_string(),
            (Severity::Warning, true) => "warning:".yellow().bold().to_string(),
            (Severity::Warning, false) => "warning:".to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A parse-time (or lexical) diagnostic anchored to a source span
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub position: Position,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, position: Position) -> Self {
        Self { severity: Severity::Error, message: message.into(), position }
    }

    /// Renders the diagnostic against the source lines it was produced from
    pub fn render(&self, lines: &[String], color: bool) -> String {
        format_diagnostic(lines, self.position, &self.message, self.severity, color)
    }
}

/// Renders a pointer-style message for `position`:
///
/// ```text
/// error: Expected ; after alpha statement
/// 1:8 | alpha 2
///              ^
/// ```
///
/// The caret line is aligned on the uncolored prefix so that enabling color
/// never shifts the pointer. A position past the last line renders an empty
/// line text.
pub fn format_diagnostic(
    lines: &[String],
    position: Position,
    message: &str,
    severity: Severity,
    color: bool,
) -> String {
    let line_text = position
        .line
        .checked_sub(1)
        .and_then(|i| lines.get(i))
        .map(String::as_str)
        .unwrap_or("");

    let prefix = format!("{}:{} | ", position.line, position.column);
    let indent = " ".repeat(prefix.len() + position.column.saturating_sub(1));
    let carets = "^".repeat(position.length.max(1));

    let (prefix, carets) = if color {
        (prefix.bright_blue().to_string(), carets.red().bold().to_string())
    } else {
        (prefix, carets)
    };

    format!(
        "{} {}\n{}{}\n{}{}\n",
        severity.label(color),
        message,
        prefix,
        line_text,
        indent,
        carets
    )
}

/// Errors raised while walking a program.
///
/// Every variant is catchable by `sus`/`cringe`, which binds the bare message.
/// The variants only exist so hosts and tests can tell interpreter faults
/// apart from program-level throws.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Scoping and control-flow violations (redeclaration, unknown names, stray break)
    #[error("{0}")]
    Runtime(String),
    /// Raised by an explicit `yeet`
    #[error("{0}")]
    Thrown(String),
    /// The print sink refused a line
    #[error("{0}")]
    Output(String),
    /// Operand combinations the walker has no rule for
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    pub fn runtime(message: impl Into<String>) -> Self {
        RuntimeError::Runtime(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RuntimeError::Internal(message.into())
    }

    pub fn undefined_variable(name: &str) -> Self {
        RuntimeError::Runtime(format!("Variable {} doesn't exist.", name))
    }

    pub fn already_defined(name: &str) -> Self {
        RuntimeError::Runtime(format!("Variable {} already exists in the current scope", name))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, RuntimeError::Internal(_))
    }
}

/// Failure of a whole run: either the program never parsed or it raised
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// Concatenated, rendered parse diagnostics
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.split('\n').map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_caret_aligns_under_column() {
        let src = lines("alpha 2");
        let out = format_diagnostic(&src, Position::new(1, 7, 1, 6), "boom", Severity::Error, false);
        let rendered: Vec<&str> = out.lines().collect();
        assert_eq!(rendered[0], "error: boom");
        assert_eq!(rendered[1], "1:7 | alpha 2");
        let caret_col = rendered[2].find('^').unwrap();
        assert_eq!(&rendered[1][caret_col..caret_col + 1], "2");
    }

    #[test]
    fn test_caret_count_matches_length() {
        let src = lines("fanum_tax x be 1;");
        let out = format_diagnostic(&src, Position::new(1, 1, 9, 0), "m", Severity::Error, false);
        assert!(out.lines().nth(2).unwrap().ends_with("^^^^^^^^^"));
        assert_eq!(out.lines().nth(2).unwrap().trim().len(), 9);
    }

    #[test]
    fn test_warning_label() {
        let src = lines("x;");
        let warning = Diagnostic {
            severity: Severity::Warning,
            message: "careful".to_string(),
            position: Position::new(1, 1, 1, 0),
        };
        let out = warning.render(&src, false);
        assert!(out.starts_with("warning: careful\n"));
    }

    #[test]
    fn test_missing_line_renders_empty() {
        let src = lines("only one line");
        let out = format_diagnostic(&src, Position::new(9, 3, 2, 0), "gone", Severity::Error, false);
        assert_eq!(out.lines().nth(1), Some("9:3 | "));
        let zero = format_diagnostic(&src, Position::new(0, 0, 0, 0), "zero", Severity::Error, false);
        assert!(zero.contains("0:0 | "));
    }

    #[test]
    fn test_position_slice() {
        let src = "alpha \"hi\";";
        assert_eq!(Position::new(1, 7, 4, 6).slice(src), "\"hi\"");
        assert_eq!(Position::new(1, 1, 99, 0).slice(src), src);
        assert_eq!(Position::new(1, 1, 1, 500).slice(src), "");
    }

    #[test]
    fn test_runtime_error_messages() {
        assert_eq!(RuntimeError::undefined_variable("x").to_string(), "Variable x doesn't exist.");
        assert_eq!(RuntimeError::Thrown("oops".into()).to_string(), "oops");
        assert!(RuntimeError::internal("bad").to_string().starts_with("Internal error:"));
        let run: RunError = RuntimeError::runtime("nope").into();
        assert_eq!(run.to_string(), "nope");
    }
}
