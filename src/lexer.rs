// File: src/lexer.rs
//
// Lexical analyzer (scanner) for the rizz language.
// Converts source text into a lazy stream of tokens for the parser.
//
// Supports:
// - Keywords: fanum_tax, be, bet, delulu, cap, vibe_check, sus, cringe, yeet,
//   looksmaxxing, aura, what_the_sigma, dip, wrizz, lrizz, fr, cappin, alpha
// - Identifiers and numbers (digits with at most one decimal point)
// - String literals in double or single quotes
// - Operators: + - * / = < > <= >=
// - Punctuation: ( ) { } , ; :
// - Comments: // to end of line and /* ... */

use crate::errors::{Diagnostic, Position};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Let,
    Equal,
    If,
    Elif,
    Else,
    While,
    Try,
    Catch,
    Throw,
    Switch,
    Case,
    Default,
    Break,
    TernaryQuestion,
    TernaryColon,
    EqualsEquals,
    BangEquals,
    Print,
}

impl Keyword {
    /// The source spelling of the keyword
    pub fn lexeme(self) -> &'static str {
        match self {
            Keyword::Let => "fanum_tax",
            Keyword::Equal => "be",
            Keyword::If => "bet",
            Keyword::Elif => "delulu",
            Keyword::Else => "cap",
            Keyword::While => "vibe_check",
            Keyword::Try => "sus",
            Keyword::Catch => "cringe",
            Keyword::Throw => "yeet",
            Keyword::Switch => "looksmaxxing",
            Keyword::Case => "aura",
            Keyword::Default => "what_the_sigma",
            Keyword::Break => "dip",
            Keyword::TernaryQuestion => "wrizz",
            Keyword::TernaryColon => "lrizz",
            Keyword::EqualsEquals => "fr",
            Keyword::BangEquals => "cappin",
            Keyword::Print => "alpha",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.lexeme())
    }
}

const ALL_KEYWORDS: [Keyword; 18] = [
    Keyword::Let,
    Keyword::Equal,
    Keyword::If,
    Keyword::Elif,
    Keyword::Else,
    Keyword::While,
    Keyword::Try,
    Keyword::Catch,
    Keyword::Throw,
    Keyword::Switch,
    Keyword::Case,
    Keyword::Default,
    Keyword::Break,
    Keyword::TernaryQuestion,
    Keyword::TernaryColon,
    Keyword::EqualsEquals,
    Keyword::BangEquals,
    Keyword::Print,
];

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> =
    Lazy::new(|| ALL_KEYWORDS.iter().map(|k| (k.lexeme(), *k)).collect());

/// Looks up an identifier in the keyword table
pub fn keyword(ident: &str) -> Option<Keyword> {
    KEYWORDS.get(ident).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    String(String),
    Identifier(String),
    Keyword(Keyword),
    Operator(&'static str),
    Punctuation(char),
    Eof,
    /// A malformed character; already reported by the scanner
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Number(_) => write!(f, "number"),
            TokenKind::String(_) => write!(f, "string"),
            TokenKind::Identifier(_) => write!(f, "identifier"),
            TokenKind::Keyword(k) => write!(f, "{}", k),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Punctuation(c) => write!(f, "{}", c),
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punctuation(c)
    }
}

/// Pulls tokens out of a source string one at a time.
///
/// The scanner never stops on bad input: malformed characters and unterminated
/// literals are recorded as diagnostics and scanning carries on. Once the end
/// of input is reached every further call returns `Eof`.
pub struct Scanner<'src> {
    source: &'src str,
    chars: Vec<(usize, char)>,
    ind: usize,
    line: usize,
    col: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            source,
            chars: source.char_indices().collect(),
            ind: 0,
            line: 1,
            col: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Source split into lines, as the diagnostics formatter expects them
    pub fn lines(&self) -> Vec<String> {
        self.source.split('\n').map(|s| s.to_string()).collect()
    }

    /// Drains the lexical diagnostics recorded so far
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn at_eof(&self) -> bool {
        self.ind >= self.chars.len()
    }

    fn curr(&self) -> char {
        self.peek(0)
    }

    fn peek(&self, skip: usize) -> char {
        self.chars.get(self.ind + skip).map(|&(_, c)| c).unwrap_or('\0')
    }

    fn offset(&self) -> usize {
        self.chars.get(self.ind).map(|&(o, _)| o).unwrap_or(self.source.len())
    }

    fn advance(&mut self) {
        if self.at_eof() {
            return;
        }
        if self.curr() == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.ind += 1;
    }

    /// Position of the current character, `length` characters long
    fn position(&self, length: usize) -> Position {
        Position::new(self.line, self.col, length, self.offset())
    }

    fn report(&mut self, message: String, position: Position) {
        tracing::debug!(line = position.line, column = position.column, "{}", message);
        self.diagnostics.push(Diagnostic::error(message, position));
    }

    fn skip_trivia(&mut self) {
        loop {
            let c = self.curr();
            if !self.at_eof() && c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek(1) == '/' {
                while !self.at_eof() && self.curr() != '\n' {
                    self.advance();
                }
            } else if c == '/' && self.peek(1) == '*' {
                let start = self.position(2);
                self.advance();
                self.advance();
                while !self.at_eof() && !(self.curr() == '*' && self.peek(1) == '/') {
                    self.advance();
                }
                if self.at_eof() {
                    self.report("Unterminated block comment".to_string(), start);
                    return;
                }
                self.advance();
                self.advance();
            } else {
                return;
            }
        }
    }

    /// Returns the next token, skipping over malformed characters
    pub fn next(&mut self) -> Token {
        loop {
            let token = self.next_raw();
            if token.kind != TokenKind::Error {
                return token;
            }
        }
    }

    /// Returns the next token, including `TokenKind::Error` for malformed characters
    pub fn next_raw(&mut self) -> Token {
        self.skip_trivia();

        if self.at_eof() {
            return Token { kind: TokenKind::Eof, position: self.position(1) };
        }

        let c = self.curr();
        let start = self.ind;
        let mut pos = self.position(1);

        match c {
            '+' | '-' | '*' | '/' | '=' | '<' | '>' => {
                self.advance();
                let op = match c {
                    '<' | '>' if self.curr() == '=' => {
                        self.advance();
                        pos.length = 2;
                        if c == '<' {
                            "<="
                        } else {
                            ">="
                        }
                    }
                    '+' => "+",
                    '-' => "-",
                    '*' => "*",
                    '/' => "/",
                    '=' => "=",
                    '<' => "<",
                    _ => ">",
                };
                Token { kind: TokenKind::Operator(op), position: pos }
            }
            ',' | ':' | '(' | ')' | '{' | '}' | ';' => {
                self.advance();
                Token { kind: TokenKind::Punctuation(c), position: pos }
            }
            '"' | '\'' => self.scan_string(c, pos),
            _ if c.is_ascii_digit() || (c == '.' && self.peek(1).is_ascii_digit()) => {
                let mut text = String::new();
                let mut seen_dot = false;
                while self.curr().is_ascii_digit() || (self.curr() == '.' && !seen_dot) {
                    if self.curr() == '.' {
                        seen_dot = true;
                    }
                    text.push(self.curr());
                    self.advance();
                }
                pos.length = self.ind - start;
                let value = text.parse().unwrap_or(0.0);
                Token { kind: TokenKind::Number(value), position: pos }
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while self.curr().is_ascii_alphanumeric() || self.curr() == '_' {
                    ident.push(self.curr());
                    self.advance();
                }
                pos.length = self.ind - start;
                let kind = match keyword(&ident) {
                    Some(kw) => TokenKind::Keyword(kw),
                    None => TokenKind::Identifier(ident),
                };
                Token { kind, position: pos }
            }
            _ => {
                self.report(format!("Unexpected character {}", c), pos);
                self.advance();
                Token { kind: TokenKind::Error, position: pos }
            }
        }
    }

    fn scan_string(&mut self, quote: char, mut pos: Position) -> Token {
        let start = self.ind;
        self.advance(); // opening quote
        let mut value = String::new();
        let mut terminated = false;

        while !self.at_eof() {
            let ch = self.curr();
            if ch == quote {
                self.advance();
                terminated = true;
                break;
            }
            if ch == '\\' && self.peek(1) == quote {
                value.push(quote);
                self.advance();
            } else {
                value.push(ch);
            }
            self.advance();
        }

        if !terminated {
            let at = self.position(1);
            self.report(format!("Expected closing quote {} to string", quote), at);
        }

        pos.length = self.ind - start;
        Token { kind: TokenKind::String(value), position: pos }
    }
}

/// Scans the whole source, returning every token up to and including `Eof`
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
