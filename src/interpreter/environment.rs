// File: src/interpreter/environment.rs
//
// Lexical scoping environment for the rizz walker.
// Implements a stack of frames where inner frames shadow outer frames. Each
// frame also records which construct pushed it, which is what `dip` uses to
// find where to stop unwinding.

use super::value::Value;
use crate::errors::RuntimeError;
use ahash::AHashMap;

/// The construct that pushed a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// `{ ... }` bodies, the global frame, and the frame holding a catch binding
    Block,
    /// One iteration of `vibe_check`
    Loop,
    Switch,
    Try,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub kind: FrameKind,
    vars: AHashMap<String, Value>,
}

impl Frame {
    pub fn new(kind: FrameKind) -> Self {
        Frame { kind, vars: AHashMap::new() }
    }
}

/// Variable storage using lexical scoping
///
/// Lookups search from the innermost frame (end of the Vec) outward.
///
/// ```ignore
/// let mut env = Environment::new();
/// env.define("x", Value::Number(10.0))?;        // global frame
///
/// env.push(FrameKind::Block);
/// env.define("x", Value::Number(20.0))?;        // shadows outer x
/// assert_eq!(env.get("x"), Some(Value::Number(20.0)));
///
/// env.truncate(1);
/// assert_eq!(env.get("x"), Some(Value::Number(10.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create a new environment with a single global frame
    pub fn new() -> Self {
        Environment { frames: vec![Frame::new(FrameKind::Block)] }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, kind: FrameKind) {
        self.frames.push(Frame::new(kind));
    }

    /// Drops every frame above `depth`. A no-op if the stack is already that shallow.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    /// Whether some loop or switch frame is on the stack
    pub fn in_loop_or_switch(&self) -> bool {
        self.frames.iter().any(|f| matches!(f.kind, FrameKind::Loop | FrameKind::Switch))
    }

    /// Pops block frames until a loop, switch or try frame is innermost.
    /// Returns false, leaving the stack untouched, if there is no such frame.
    pub fn unwind_to_break_target(&mut self) -> bool {
        match self.frames.iter().rposition(|f| f.kind != FrameKind::Block) {
            Some(index) => {
                self.frames.truncate(index + 1);
                true
            }
            None => false,
        }
    }

    /// Get a variable, searching from inner to outer frames
    pub fn get(&self, name: &str) -> Option<Value> {
        self.frames.iter().rev().find_map(|frame| frame.vars.get(name).cloned())
    }

    /// Define a new variable in the innermost frame
    pub fn define(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(RuntimeError::internal("no frame to declare a variable in"));
        };
        if frame.vars.contains_key(name) {
            return Err(RuntimeError::already_defined(name));
        }
        frame.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Overwrite an existing variable in the nearest frame that holds it
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        for frame in self.frames.iter_mut().rev() {
            if let Some(slot) = frame.vars.get_mut(name) {
                *slot = value;
                return Ok(());
            }
        }
        Err(RuntimeError::undefined_variable(name))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
