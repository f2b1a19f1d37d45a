// File: src/parser.rs
//
// Parser for the rizz language.
// Transforms the scanner's token stream into an Abstract Syntax Tree (AST).
//
// Expressions use precedence climbing (Pratt parsing): every token kind may
// have a prefix rule, an infix rule, and a binding precedence. Statements are
// plain recursive descent keyed on the current keyword.
//
// The parser never gives up on a syntax error. Each one is rendered into the
// accumulated report, the parser resynchronizes at the next statement
// boundary, and parsing continues so a single pass reports every error.

use crate::ast::{BinaryOp, Body, Branch, Node, NodeKind, SwitchArm, UnaryOp};
use crate::errors::{Diagnostic, Position};
use crate::lexer::{Keyword, Scanner, Token, TokenKind};

/// Binding strength of infix operators, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assign,
    Call,
    Ternary,
    Relational,
    Equality,
    Term,
    Factor,
    Unary,
}

impl Precedence {
    /// One level tighter; used for the right operand of left-associative operators
    fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assign,
            Precedence::Assign => Precedence::Call,
            Precedence::Call => Precedence::Ternary,
            Precedence::Ternary => Precedence::Relational,
            Precedence::Relational => Precedence::Equality,
            Precedence::Equality => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor | Precedence::Unary => Precedence::Unary,
        }
    }
}

type PrefixFn<'src> = fn(&mut Parser<'src>, Token) -> Node;
type InfixFn<'src> = fn(&mut Parser<'src>, Node, Token) -> Node;

struct ParseRule<'src> {
    precedence: Precedence,
    prefix: Option<PrefixFn<'src>>,
    infix: Option<InfixFn<'src>>,
}

/// Result of parsing a whole program
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub body: Body,
    pub diagnostics: Vec<Diagnostic>,
    /// All diagnostics rendered and concatenated, or `None` on a clean parse
    pub report: Option<String>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Maps a binary operator token to its AST operator and precedence level
fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, Precedence)> {
    let op = match kind {
        TokenKind::Operator("+") => (BinaryOp::Add, Precedence::Term),
        TokenKind::Operator("-") => (BinaryOp::Sub, Precedence::Term),
        TokenKind::Operator("*") => (BinaryOp::Mul, Precedence::Factor),
        TokenKind::Operator("/") => (BinaryOp::Div, Precedence::Factor),
        TokenKind::Operator("<") => (BinaryOp::Less, Precedence::Relational),
        TokenKind::Operator(">") => (BinaryOp::Greater, Precedence::Relational),
        TokenKind::Operator("<=") => (BinaryOp::LessEq, Precedence::Relational),
        TokenKind::Operator(">=") => (BinaryOp::GreaterEq, Precedence::Relational),
        TokenKind::Keyword(Keyword::EqualsEquals) => (BinaryOp::Eq, Precedence::Equality),
        TokenKind::Keyword(Keyword::BangEquals) => (BinaryOp::NotEq, Precedence::Equality),
        _ => return None,
    };
    Some(op)
}

/// Single-lookahead parser over a `Scanner`
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    current: Token,
    previous: Token,
    lines: Vec<String>,
    color: bool,
    diagnostics: Vec<Diagnostic>,
    report: String,
}

impl<'src> Parser<'src> {
    pub fn new(mut scanner: Scanner<'src>, color: bool) -> Self {
        let current = scanner.next();
        let lines = scanner.lines();
        let mut parser = Parser {
            scanner,
            previous: current.clone(),
            current,
            lines,
            color,
            diagnostics: Vec::new(),
            report: String::new(),
        };
        parser.absorb_lexical_diagnostics();
        parser
    }

    /// Parses every top-level statement, dropping the ones that failed to parse
    pub fn parse(&mut self) -> ParseOutput {
        let mut body = Body::default();
        while self.current.kind != TokenKind::Eof {
            let node = self.parse_statement(true);
            if node.kind() != NodeKind::Error {
                body.statements.push(node);
            }
        }

        tracing::debug!(
            statements = body.statements.len(),
            errors = self.diagnostics.len(),
            "parsed program"
        );

        let report = std::mem::take(&mut self.report);
        ParseOutput {
            body,
            diagnostics: std::mem::take(&mut self.diagnostics),
            report: if report.is_empty() { None } else { Some(report) },
        }
    }

    // ---------------------------------------------------------------------
    // Token plumbing
    // ---------------------------------------------------------------------

    fn record(&mut self, diagnostic: Diagnostic) {
        self.report.push_str(&diagnostic.render(&self.lines, self.color));
        self.diagnostics.push(diagnostic);
    }

    fn absorb_lexical_diagnostics(&mut self) {
        for diagnostic in self.scanner.take_diagnostics() {
            self.record(diagnostic);
        }
    }

    pub fn error(&mut self, position: Position, message: impl Into<String>) {
        self.record(Diagnostic::error(message, position));
    }

    /// Consumes the current token and returns it
    fn advance(&mut self) -> Token {
        let next = self.scanner.next();
        self.absorb_lexical_diagnostics();
        self.previous = std::mem::replace(&mut self.current, next);
        self.previous.clone()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    /// Consumes the current token whether or not it matches, reporting a mismatch
    fn expect(&mut self, kind: &TokenKind, message: &str) -> Token {
        let tok = self.advance();
        if &tok.kind != kind {
            self.error(tok.position, message);
        }
        tok
    }

    /// Consumes the current token only if it matches; otherwise reports and stays put
    fn expect_symbol(&mut self, kind: &TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
        } else {
            let position = self.current.position;
            self.error(position, message);
        }
    }

    /// Ends a `...;` statement. A statement whose expression already failed
    /// only swallows a `;` if one is there, so one mistake yields one error.
    fn expect_terminator(&mut self, value: &Node, message: &str) {
        if value.kind() == NodeKind::Error {
            if self.current.is_punct(';') {
                self.advance();
            }
        } else {
            self.expect_symbol(&TokenKind::Punctuation(';'), message);
        }
    }

    /// Skips ahead to something a statement can start from (not consumed)
    fn synchronize(&mut self) {
        loop {
            match self.current.kind {
                TokenKind::Punctuation(';')
                | TokenKind::Eof
                | TokenKind::Keyword(Keyword::Let)
                | TokenKind::Keyword(Keyword::Switch)
                | TokenKind::Keyword(Keyword::Try)
                | TokenKind::Keyword(Keyword::If) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    fn rule(kind: &TokenKind) -> ParseRule<'src> {
        let (precedence, prefix, infix): (Precedence, Option<PrefixFn<'src>>, Option<InfixFn<'src>>) =
            match kind {
                TokenKind::Number(_) => (Precedence::None, Some(Self::number), None),
                TokenKind::String(_) => (Precedence::None, Some(Self::string), None),
                TokenKind::Identifier(_) => (Precedence::None, Some(Self::identifier), None),
                TokenKind::Operator("+") | TokenKind::Operator("-") => {
                    (Precedence::Term, Some(Self::unary), Some(Self::binary))
                }
                TokenKind::Punctuation('(') => {
                    (Precedence::Call, Some(Self::grouping), Some(Self::call))
                }
                TokenKind::Keyword(Keyword::TernaryQuestion) => {
                    (Precedence::Ternary, None, Some(Self::ternary))
                }
                TokenKind::Keyword(Keyword::Equal) => {
                    (Precedence::Assign, None, Some(Self::assignment))
                }
                other => match binary_op(other) {
                    Some((_, precedence)) => (precedence, None, Some(Self::binary)),
                    None => (Precedence::None, None, None),
                },
            };
        ParseRule { precedence, prefix, infix }
    }

    /// Parses a prefix form, then folds in every infix operator binding at
    /// least as tightly as `min_prec`
    pub fn parse_expression(&mut self, min_prec: Precedence) -> Node {
        let tok = self.current.clone();
        let Some(prefix) = Self::rule(&tok.kind).prefix else {
            self.error(tok.position, format!("Unexpected token {}", tok.kind));
            self.synchronize();
            return Node::Error;
        };
        self.advance();

        let mut left = prefix(self, tok);
        loop {
            let rule = Self::rule(&self.current.kind);
            match rule.infix {
                Some(infix) if rule.precedence >= min_prec => {
                    let op = self.advance();
                    left = infix(self, left, op);
                }
                _ => return left,
            }
        }
    }

    fn number(&mut self, tok: Token) -> Node {
        match tok.kind {
            TokenKind::Number(n) => Node::Number(n),
            _ => Node::Error,
        }
    }

    fn string(&mut self, tok: Token) -> Node {
        match tok.kind {
            TokenKind::String(s) => Node::String(s),
            _ => Node::Error,
        }
    }

    fn identifier(&mut self, tok: Token) -> Node {
        match tok.kind {
            TokenKind::Identifier(name) => Node::Identifier(name),
            _ => Node::Error,
        }
    }

    fn unary(&mut self, tok: Token) -> Node {
        let op = match tok.kind {
            TokenKind::Operator("-") => UnaryOp::Minus,
            _ => UnaryOp::Plus,
        };
        let operand = self.parse_expression(Precedence::Unary);
        Node::Unary { op, operand: Box::new(operand) }
    }

    fn grouping(&mut self, _tok: Token) -> Node {
        let expr = self.parse_expression(Precedence::None);
        self.expect_symbol(&TokenKind::Punctuation(')'), "Expected ) after parenthesis grouping");
        expr
    }

    fn binary(&mut self, left: Node, tok: Token) -> Node {
        let Some((op, precedence)) = binary_op(&tok.kind) else {
            self.error(tok.position, format!("Unexpected token {}", tok.kind));
            return Node::Error;
        };
        let right = self.parse_expression(precedence.next());
        Node::Binop { left: Box::new(left), op, right: Box::new(right) }
    }

    /// `cond wrizz = a, lrizz = b`
    fn ternary(&mut self, condition: Node, _tok: Token) -> Node {
        self.expect_symbol(&TokenKind::Operator("="), "Expected equals sign after wrizz (wrizz =)");
        let if_true = self.parse_expression(Precedence::None);
        self.expect_symbol(
            &TokenKind::Punctuation(','),
            "Expected comma (, lrizz =) after wrizz expression",
        );
        self.expect_symbol(
            &TokenKind::Keyword(Keyword::TernaryColon),
            "Expected lrizz (, lrizz =) after wrizz expression",
        );
        self.expect_symbol(&TokenKind::Operator("="), "Expected equals sign after lrizz (lrizz =)");
        let if_false = self.parse_expression(Precedence::None);

        Node::Ternary {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        }
    }

    fn call(&mut self, callee: Node, _tok: Token) -> Node {
        let mut args = Vec::new();
        while !self.current.is_punct(')') && self.current.kind != TokenKind::Eof {
            args.push(self.parse_expression(Precedence::None));
            if self.current.is_punct(',') {
                self.advance();
            } else {
                break;
            }
        }
        self.expect_symbol(&TokenKind::Punctuation(')'), "Expected ) after function call");
        Node::Call { callee: Box::new(callee), args }
    }

    /// Right-associative: the value side is parsed from the lowest precedence
    fn assignment(&mut self, target: Node, tok: Token) -> Node {
        if !matches!(target.kind(), NodeKind::Identifier | NodeKind::Assign) {
            self.error(
                tok.position,
                format!("\"{}\" token can only be applied to variables", Keyword::Equal),
            );
        }
        let value = self.parse_expression(Precedence::None);
        Node::Assign { target: Box::new(target), value: Box::new(value) }
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn parse_statement(&mut self, allow_var: bool) -> Node {
        while self.current.is_punct(';') {
            self.advance();
        }
        if self.current.kind == TokenKind::Eof {
            return Node::Error;
        }

        match self.current.kind {
            TokenKind::Keyword(Keyword::Let) => {
                if !allow_var {
                    let position = self.current.position;
                    self.error(position, "May not have variable definition in branch block");
                }
                self.parse_var_def()
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::Print) => self.parse_print(),
            TokenKind::Keyword(Keyword::Switch) => self.parse_switch(),
            TokenKind::Keyword(Keyword::Try) => self.parse_try(),
            TokenKind::Keyword(Keyword::Throw) => self.parse_throw(),
            TokenKind::Keyword(Keyword::Break) => self.parse_break(),
            TokenKind::Punctuation('{') => Node::Body(self.parse_body()),
            _ => {
                let expr = self.parse_expression(Precedence::None);
                self.expect_terminator(&expr, "Expected ; after expression");
                expr
            }
        }
    }

    /// `fanum_tax name;` or `fanum_tax name be value;`
    fn parse_var_def(&mut self) -> Node {
        self.advance(); // fanum_tax
        let name_tok = self.advance();
        let name = match name_tok.kind {
            TokenKind::Identifier(name) => name,
            _ => {
                self.error(
                    name_tok.position,
                    format!("Expected variable name after {}", Keyword::Let),
                );
                self.synchronize();
                return Node::Error;
            }
        };

        if self.current.is_punct(';') {
            self.advance();
            return Node::VarDef { name, value: None };
        }

        self.expect_symbol(
            &TokenKind::Keyword(Keyword::Equal),
            &format!("Expected {} after {} definition", Keyword::Equal, Keyword::Let),
        );
        let value = self.parse_expression(Precedence::None);
        self.expect_terminator(&value, &format!("Expected ; after {} definition", Keyword::Let));
        Node::VarDef { name, value: Some(Box::new(value)) }
    }

    /// The single statement after a condition or `cap`; declarations are not allowed here
    fn parse_branch(&mut self) -> Node {
        while self.current.is_punct(';') {
            self.advance();
        }
        if self.current.kind == TokenKind::Eof {
            let position = self.current.position;
            self.error(position, "Expected statement before end of input");
        }
        self.parse_statement(false)
    }

    /// `(cond) stmt`
    fn parse_condition_and_branch(&mut self) -> (Node, Node) {
        self.expect_symbol(&TokenKind::Punctuation('('), "Expected ( to begin condition");
        let condition = self.parse_expression(Precedence::None);
        self.expect_symbol(&TokenKind::Punctuation(')'), "Expected ) to close condition");
        let body = self.parse_branch();
        (condition, body)
    }

    fn parse_body(&mut self) -> Body {
        self.expect(&TokenKind::Punctuation('{'), "Expected { to start body");
        let mut statements = Vec::new();
        while self.current.kind != TokenKind::Eof && !self.current.is_punct('}') {
            let node = self.parse_statement(true);
            if node.kind() != NodeKind::Error {
                statements.push(node);
            }
        }
        self.expect_symbol(&TokenKind::Punctuation('}'), "Expected } to end body");
        Body::new(statements)
    }

    fn parse_if(&mut self) -> Node {
        self.advance(); // bet
        let (condition, body) = self.parse_condition_and_branch();

        let mut elifs = Vec::new();
        while self.current.is_keyword(Keyword::Elif) {
            self.advance();
            let (condition, body) = self.parse_condition_and_branch();
            elifs.push(Branch { condition, body });
        }

        let else_body = if self.current.is_keyword(Keyword::Else) {
            self.advance();
            Some(Box::new(self.parse_branch()))
        } else {
            None
        };

        Node::If { condition: Box::new(condition), body: Box::new(body), elifs, else_body }
    }

    fn parse_while(&mut self) -> Node {
        self.advance(); // vibe_check
        let (condition, body) = self.parse_condition_and_branch();
        Node::While { condition: Box::new(condition), body: Box::new(body) }
    }

    fn parse_print(&mut self) -> Node {
        self.advance(); // alpha
        let value = self.parse_expression(Precedence::None);
        self.expect_terminator(&value, &format!("Expected ; after {} statement", Keyword::Print));
        Node::Print(Box::new(value))
    }

    fn parse_throw(&mut self) -> Node {
        self.advance(); // yeet
        let value = self.parse_expression(Precedence::None);
        self.expect_terminator(&value, &format!("Expected ; after {} statement", Keyword::Throw));
        Node::Throw(Box::new(value))
    }

    fn parse_break(&mut self) -> Node {
        self.advance(); // dip
        self.expect_symbol(
            &TokenKind::Punctuation(';'),
            &format!("Expected ; after {} statement", Keyword::Break),
        );
        Node::Break
    }

    fn at_switch_label(&self) -> bool {
        self.current.is_keyword(Keyword::Case) || self.current.is_keyword(Keyword::Default)
    }

    /// `looksmaxxing subject { aura a: aura b: stmts... what_the_sigma: stmts... }`
    fn parse_switch(&mut self) -> Node {
        self.advance(); // looksmaxxing
        let subject = self.parse_expression(Precedence::None);
        self.expect_symbol(
            &TokenKind::Punctuation('{'),
            &format!("Expected {{ to begin {} statement", Keyword::Switch),
        );

        let mut arms = Vec::new();
        let mut found_default = false;
        while self.at_switch_label() {
            let mut labels = Vec::new();
            let mut is_default = false;

            while self.at_switch_label() {
                if self.current.is_keyword(Keyword::Default) {
                    let tok = self.advance();
                    if found_default {
                        self.error(
                            tok.position,
                            format!("Default was already specified for this {} statement", Keyword::Switch),
                        );
                    }
                    found_default = true;
                    is_default = true;
                    self.expect_symbol(
                        &TokenKind::Punctuation(':'),
                        &format!("Expected : after {}", Keyword::Default),
                    );
                } else {
                    self.advance(); // aura
                    labels.push(self.parse_expression(Precedence::None));
                    self.expect_symbol(
                        &TokenKind::Punctuation(':'),
                        &format!("Expected colon to start {} body", Keyword::Case),
                    );
                }
            }

            let mut statements = Vec::new();
            while self.current.kind != TokenKind::Eof
                && !self.current.is_punct('}')
                && !self.at_switch_label()
            {
                let start = self.current.position;
                let statement = self.parse_statement(true);
                match statement.kind() {
                    NodeKind::Error => continue,
                    NodeKind::VarDef => self.error(
                        start,
                        format!(
                            "Cannot declare variable in non-block scope of {} {} statement",
                            Keyword::Switch,
                            Keyword::Case
                        ),
                    ),
                    _ => {}
                }
                statements.push(statement);
            }

            arms.push(SwitchArm { labels, is_default, statements });
        }

        self.expect_symbol(
            &TokenKind::Punctuation('}'),
            &format!("Expected }} to end {} statement", Keyword::Switch),
        );
        Node::Switch { subject: Box::new(subject), arms }
    }

    /// `sus { ... } cringe (name) { ... }`
    fn parse_try(&mut self) -> Node {
        self.advance(); // sus
        let body = self.parse_body();

        let message = format!(
            "Expected {} (err) {{ ... }} block after {} block",
            Keyword::Catch,
            Keyword::Try
        );
        self.expect(&TokenKind::Keyword(Keyword::Catch), &message);
        self.expect_symbol(&TokenKind::Punctuation('('), &message);
        let binding_tok = self.advance();
        let binding = match binding_tok.kind {
            TokenKind::Identifier(name) => name,
            _ => {
                self.error(binding_tok.position, message.as_str());
                String::new()
            }
        };
        self.expect_symbol(&TokenKind::Punctuation(')'), &message);
        let handler = self.parse_body();

        Node::Try { body, binding, handler }
    }
}

/// Scans and parses `source` in one go
pub fn parse_source(source: &str, color: bool) -> ParseOutput {
    Parser::new(Scanner::new(source), color).parse()
}
