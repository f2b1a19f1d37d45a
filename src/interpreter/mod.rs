// File: src/interpreter/mod.rs
//
// Tree-walking evaluator for rizz programs.
// Executes a parsed program by traversing its AST.
//
// The walker keeps a stack of frames (see `environment`) for variables and
// for control flow: `dip` unwinds block frames until it reaches the frame of
// the nearest loop, switch or try. Errors of every kind travel as
// `RuntimeError` through `?` until a `sus`/`cringe` catches them or they
// escape the run.

mod control_flow;
mod environment;
mod output;
mod value;

pub use environment::{Environment, FrameKind};
pub use output::{PrintSink, SharedOutput};
pub use value::{format_number, Value};

use control_flow::ControlFlow;

use crate::ast::{BinaryOp, Body, Node, SwitchArm, UnaryOp};
use crate::errors::RuntimeError;

/// Main walker that executes rizz programs
pub struct Walker {
    pub env: Environment,
    control_flow: ControlFlow,
    output: Option<Box<dyn PrintSink>>,
}

impl Walker {
    /// Creates a walker with an empty global frame that prints to stdout
    pub fn new() -> Self {
        Walker { env: Environment::new(), control_flow: ControlFlow::Normal, output: None }
    }

    pub fn with_output(output: Box<dyn PrintSink>) -> Self {
        let mut walker = Walker::new();
        walker.set_output(output);
        walker
    }

    /// Redirects `alpha` output to the given sink
    pub fn set_output(&mut self, output: Box<dyn PrintSink>) {
        self.output = Some(output);
    }

    /// Runs a whole program
    pub fn run(&mut self, program: &Body) -> Result<(), RuntimeError> {
        tracing::debug!(statements = program.statements.len(), "walking program");
        self.walk_body(program)?;
        tracing::debug!("program finished");
        Ok(())
    }

    fn write_output(&mut self, line: &str) -> Result<(), RuntimeError> {
        match self.output.as_mut() {
            Some(sink) => sink.print(line).map_err(RuntimeError::Output),
            None => {
                println!("{}", line);
                Ok(())
            }
        }
    }

    fn push_frame(&mut self, kind: FrameKind) -> usize {
        self.env.push(kind);
        tracing::trace!(?kind, depth = self.env.depth(), "push frame");
        self.env.depth()
    }

    fn truncate_frames(&mut self, depth: usize) {
        if self.env.depth() > depth {
            tracing::trace!(from = self.env.depth(), to = depth, "drop frames");
            self.env.truncate(depth);
        }
    }

    /// Walks statements in a fresh block frame. Stops early when a break is
    /// pending; the frame is then left for the break target to drop.
    fn walk_body(&mut self, body: &Body) -> Result<Value, RuntimeError> {
        let own_depth = self.push_frame(FrameKind::Block);
        for stmt in &body.statements {
            self.walk(stmt)?;
            if self.env.depth() < own_depth || self.control_flow.is_break() {
                return Ok(Value::Null);
            }
        }
        self.truncate_frames(own_depth - 1);
        Ok(Value::Null)
    }

    /// Evaluates a single node
    pub fn walk(&mut self, node: &Node) -> Result<Value, RuntimeError> {
        match node {
            Node::Body(body) => self.walk_body(body),

            Node::VarDef { name, value } => {
                let value = match value {
                    Some(expr) => self.walk(expr)?,
                    None => Value::Null,
                };
                self.env.define(name, value)?;
                Ok(Value::Null)
            }

            Node::Identifier(name) => {
                self.env.get(name).ok_or_else(|| RuntimeError::undefined_variable(name))
            }

            // Calls only resolve the callee, there is nothing callable yet
            Node::Call { callee, .. } => self.walk(callee),

            Node::Assign { target, value } => {
                let Node::Identifier(name) = target.as_ref() else {
                    return Err(RuntimeError::runtime("Cannot assign to non-variable"));
                };
                let value = self.walk(value)?;
                self.env.set(name, value.clone())?;
                Ok(value)
            }

            Node::Binop { left, op, right } => {
                let left = self.walk(left)?;
                let right = self.walk(right)?;
                binop(*op, left, right)
            }

            Node::Unary { op, operand } => match (op, self.walk(operand)?) {
                (UnaryOp::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
                (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(n)),
                (op, other) => Err(RuntimeError::internal(format!(
                    "Unsupported operand for unary {}: {}",
                    op,
                    other.type_name()
                ))),
            },

            Node::Number(n) => Ok(Value::Number(*n)),
            Node::String(s) => Ok(Value::Str(s.clone())),

            Node::Ternary { condition, if_true, if_false } => {
                if self.walk(condition)?.is_truthy() {
                    self.walk(if_true)
                } else {
                    self.walk(if_false)
                }
            }

            Node::Print(expr) => {
                let value = self.walk(expr)?;
                self.write_output(&value.to_string())?;
                Ok(Value::Null)
            }

            Node::If { condition, body, elifs, else_body } => {
                if self.walk(condition)?.is_truthy() {
                    self.walk(body)?;
                    return Ok(Value::Null);
                }
                for branch in elifs {
                    if self.walk(&branch.condition)?.is_truthy() {
                        self.walk(&branch.body)?;
                        return Ok(Value::Null);
                    }
                }
                if let Some(else_body) = else_body {
                    self.walk(else_body)?;
                }
                Ok(Value::Null)
            }

            Node::While { condition, body } => {
                while self.walk(condition)?.is_truthy() {
                    let depth = self.env.depth();
                    self.push_frame(FrameKind::Loop);
                    self.walk(body)?;
                    self.truncate_frames(depth);
                    if self.control_flow.take_break() {
                        break;
                    }
                }
                Ok(Value::Null)
            }

            Node::Break => {
                if !self.env.unwind_to_break_target() {
                    return Err(RuntimeError::runtime("Tried to break in non-loop context"));
                }
                tracing::trace!(depth = self.env.depth(), "break unwound");
                self.control_flow = ControlFlow::Break;
                Ok(Value::Null)
            }

            Node::Switch { subject, arms } => self.walk_switch(subject, arms),

            Node::Try { body, binding, handler } => {
                let depth = self.env.depth();
                self.push_frame(FrameKind::Try);
                match self.walk_body(body) {
                    Ok(_) => {
                        self.truncate_frames(depth);
                        // a pending break keeps travelling to the enclosing loop or switch
                        if !self.env.in_loop_or_switch() {
                            self.control_flow.take_break();
                        }
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "caught by cringe");
                        self.truncate_frames(depth);
                        self.control_flow = ControlFlow::Normal;
                        self.push_frame(FrameKind::Block);
                        self.env.define(binding, Value::Str(err.to_string()))?;
                        self.walk_body(handler)?;
                        self.truncate_frames(depth);
                    }
                }
                Ok(Value::Null)
            }

            Node::Throw(expr) => {
                let value = self.walk(expr)?;
                Err(RuntimeError::Thrown(value.to_string()))
            }

            Node::Error => Err(RuntimeError::internal("Tried to walk an error node")),
        }
    }

    fn walk_switch(&mut self, subject: &Node, arms: &[SwitchArm]) -> Result<Value, RuntimeError> {
        let depth = self.env.depth();
        self.push_frame(FrameKind::Switch);
        let subject = self.walk(subject)?;

        let mut matched = None;
        let mut default = None;
        'arms: for (index, arm) in arms.iter().enumerate() {
            if arm.is_default && default.is_none() {
                default = Some(index);
            }
            for label in &arm.labels {
                if self.walk(label)?.equals(&subject) {
                    matched = Some(index);
                    break 'arms;
                }
            }
        }

        if let Some(start) = matched.or(default) {
            'run: for arm in &arms[start..] {
                for stmt in &arm.statements {
                    self.walk(stmt)?;
                    if self.control_flow.take_break() {
                        break 'run;
                    }
                }
            }
        }

        self.truncate_frames(depth);
        Ok(Value::Null)
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

fn binop(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left.equals(&right))),
        BinaryOp::NotEq => return Ok(Value::Bool(!left.equals(&right))),
        _ => {}
    }

    // equality is type-agnostic, everything else needs matching operands
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(match op {
            BinaryOp::Add => Value::Number(a + b),
            BinaryOp::Sub => Value::Number(a - b),
            BinaryOp::Mul => Value::Number(a * b),
            BinaryOp::Div => Value::Number(a / b),
            BinaryOp::Less => Value::Bool(a < b),
            BinaryOp::Greater => Value::Bool(a > b),
            BinaryOp::LessEq => Value::Bool(a <= b),
            BinaryOp::GreaterEq => Value::Bool(a >= b),
            BinaryOp::Eq => Value::Bool(a == b),
            BinaryOp::NotEq => Value::Bool(a != b),
        }),
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => Ok(Value::Str(a + &b)),
        (left, right) => Err(RuntimeError::internal(format!(
            "Unsupported operands for {}: {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))),
    }
}
