// File: src/lib.rs
//
// Library interface for the rizz interpreter.
// Exposes modules for integration testing and external use, plus the
// `run`/`check` entry points used by the CLI and embedders.

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use errors::{RunError, RuntimeError};
pub use interpreter::{PrintSink, SharedOutput, Value, Walker};

/// Parses `source` without executing it.
///
/// Returns the rendered diagnostic report as `RunError::Parse` if anything
/// was reported.
pub fn check(source: &str, color: bool) -> Result<(), RunError> {
    let parsed = parser::parse_source(source, color);
    match parsed.report {
        Some(report) => Err(RunError::Parse(report)),
        None => Ok(()),
    }
}

/// Parses and executes `source`.
///
/// Lines printed by `alpha` go to `sink` when one is given, otherwise to
/// stdout. Nothing runs if parsing reported any diagnostic.
pub fn run(source: &str, color: bool, sink: Option<Box<dyn PrintSink>>) -> Result<(), RunError> {
    let parsed = parser::parse_source(source, color);
    if let Some(report) = parsed.report {
        tracing::debug!(diagnostics = parsed.diagnostics.len(), "parse failed, not running");
        return Err(RunError::Parse(report));
    }

    let mut walker = Walker::new();
    if let Some(sink) = sink {
        walker.set_output(sink);
    }

    walker.run(&parsed.body).map_err(|err| {
        if err.is_internal() {
            tracing::warn!(error = %err, "internal fault escaped the program");
        }
        RunError::from(err)
    })
}
