// File: src/interpreter/output.rs
//
// Where `alpha` sends its lines. Without a sink the walker prints to stdout.

use std::sync::{Arc, Mutex};

/// Receives one line per `alpha` statement, in program order.
///
/// Returning `Err` aborts the run with a runtime error carrying the message.
pub trait PrintSink {
    fn print(&mut self, line: &str) -> Result<(), String>;
}

impl<F> PrintSink for F
where
    F: FnMut(&str) -> Result<(), String>,
{
    fn print(&mut self, line: &str) -> Result<(), String> {
        self(line)
    }
}

/// In-memory sink that can be cloned and read back after a run (used for testing)
#[derive(Clone, Debug, Default)]
pub struct SharedOutput {
    lines: Arc<Mutex<Vec<String>>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Every printed line joined with newlines
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }
}

impl PrintSink for SharedOutput {
    fn print(&mut self, line: &str) -> Result<(), String> {
        let mut lines = self.lines.lock().map_err(|_| "output buffer poisoned".to_string())?;
        lines.push(line.to_string());
        Ok(())
    }
}
