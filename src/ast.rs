// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the rizz language.
//
// Every construct, statement or expression, is a `Node`. The tree is built
// once by the parser and only read afterwards by the walker.

use std::fmt;

/// Binary operators. `fr`/`cappin` are stored as `Eq`/`NotEq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GreaterEq => ">=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Plus => f.write_str("+"),
            UnaryOp::Minus => f.write_str("-"),
        }
    }
}

/// A `{ ... }` block, and also the whole program
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    pub statements: Vec<Node>,
}

impl Body {
    pub fn new(statements: Vec<Node>) -> Self {
        Body { statements }
    }
}

/// One `delulu (cond) stmt` arm of an if chain
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Node,
    pub body: Node,
}

/// One group of stacked labels and the statements that follow them:
///
/// ```text
/// aura 1:
/// aura 2:
///     alpha "one or two";
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchArm {
    pub labels: Vec<Node>,
    /// Whether `what_the_sigma:` is among the labels
    pub is_default: bool,
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Body(Body),
    VarDef {
        name: String,
        value: Option<Box<Node>>,
    },
    Binop {
        left: Box<Node>,
        op: BinaryOp,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Number(f64),
    String(String),
    Ternary {
        condition: Box<Node>,
        if_true: Box<Node>,
        if_false: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Identifier(String),
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },
    If {
        condition: Box<Node>,
        body: Box<Node>,
        elifs: Vec<Branch>,
        else_body: Option<Box<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    Switch {
        subject: Box<Node>,
        arms: Vec<SwitchArm>,
    },
    Break,
    Try {
        body: Body,
        binding: String,
        handler: Body,
    },
    Throw(Box<Node>),
    Print(Box<Node>),
    /// Stands in for a construct that failed to parse
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Body,
    VarDef,
    Binop,
    Unary,
    Number,
    String,
    Ternary,
    Call,
    Identifier,
    Assign,
    If,
    While,
    Switch,
    Break,
    Try,
    Throw,
    Print,
    Error,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Body(_) => NodeKind::Body,
            Node::VarDef { .. } => NodeKind::VarDef,
            Node::Binop { .. } => NodeKind::Binop,
            Node::Unary { .. } => NodeKind::Unary,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Ternary { .. } => NodeKind::Ternary,
            Node::Call { .. } => NodeKind::Call,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::Assign { .. } => NodeKind::Assign,
            Node::If { .. } => NodeKind::If,
            Node::While { .. } => NodeKind::While,
            Node::Switch { .. } => NodeKind::Switch,
            Node::Break => NodeKind::Break,
            Node::Try { .. } => NodeKind::Try,
            Node::Throw(_) => NodeKind::Throw,
            Node::Print(_) => NodeKind::Print,
            Node::Error => NodeKind::Error,
        }
    }
}
