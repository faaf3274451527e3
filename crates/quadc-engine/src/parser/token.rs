//! Token definitions for the quadc source language.
//!
//! This module defines all tokens that can appear in source code,
//! including keywords, operators, literals, and separators.

use crate::parser::interner::Symbol;
use serde::Serialize;
use std::fmt;

/// A token of the C-like source language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Void,
    Int,
    Char,
    Return,
    If,
    Else,
    While,
    For,
    Extern,

    // Literals
    IntLiteral(i64),
    CharLiteral(u8),
    StringLiteral(Symbol), // Interned string contents (escapes resolved)

    // Identifiers
    Identifier(Symbol),

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Unary
    PlusPlus,
    MinusMinus,
    Bang,
    Amp,

    // Comparison
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Logical
    AmpAmp,
    PipePipe,

    // Assignment
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,

    // Separators
    Semicolon,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    /// End of input
    Eof,
}

impl Token {
    /// Whether this token begins a type specifier
    pub fn is_type_keyword(&self) -> bool {
        matches!(self, Token::Void | Token::Int | Token::Char)
    }

    /// Human-readable description used in "expected ..." diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Void => "'void'",
            Token::Int => "'int'",
            Token::Char => "'char'",
            Token::Return => "'return'",
            Token::If => "'if'",
            Token::Else => "'else'",
            Token::While => "'while'",
            Token::For => "'for'",
            Token::Extern => "'extern'",
            Token::IntLiteral(_) => "integer literal",
            Token::CharLiteral(_) => "character literal",
            Token::StringLiteral(_) => "string literal",
            Token::Identifier(_) => "identifier",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Percent => "'%'",
            Token::PlusPlus => "'++'",
            Token::MinusMinus => "'--'",
            Token::Bang => "'!'",
            Token::Amp => "'&'",
            Token::EqualEqual => "'=='",
            Token::BangEqual => "'!='",
            Token::Less => "'<'",
            Token::LessEqual => "'<='",
            Token::Greater => "'>'",
            Token::GreaterEqual => "'>='",
            Token::AmpAmp => "'&&'",
            Token::PipePipe => "'||'",
            Token::Equal => "'='",
            Token::PlusEqual => "'+='",
            Token::MinusEqual => "'-='",
            Token::StarEqual => "'*='",
            Token::SlashEqual => "'/='",
            Token::PercentEqual => "'%='",
            Token::Semicolon => "';'",
            Token::Comma => "','",
            Token::LeftParen => "'('",
            Token::RightParen => "')'",
            Token::LeftBrace => "'{'",
            Token::RightBrace => "'}'",
            Token::LeftBracket => "'['",
            Token::RightBracket => "']'",
            Token::Eof => "end of file",
        }
    }
}

/// Source location of a token or AST node.
///
/// `start`/`end` are byte offsets; `line`/`column` are 1-based and refer to `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(&self, other: &Span) -> Span {
        let (line, column) = if self.start <= other.start {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n) => write!(f, "{}", n),
            Token::CharLiteral(c) => write!(f, "{:?}", *c as char),
            Token::StringLiteral(_) => write!(f, "string literal"),
            Token::Identifier(_) => write!(f, "identifier"),
            other => {
                let text = other.describe();
                write!(f, "{}", text.trim_matches('\''))
            }
        }
    }
}
