//! Parse error types

use crate::parser::token::{Span, Token};
use thiserror::Error;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken { expected: Vec<Token>, found: Token },
    UnexpectedEof { expected: Vec<Token> },
    InvalidSyntax { reason: String },

    /// Parser exceeded iteration or depth limit
    ParserLimitExceeded { message: String },
}

fn describe_expected(expected: &[Token]) -> String {
    let names: Vec<&str> = expected.iter().map(Token::describe).collect();
    match names.as_slice() {
        [] => "more input".to_string(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

impl ParseError {
    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        let message = format!(
            "expected {}, found {}",
            describe_expected(&expected),
            found.describe()
        );
        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            message,
        }
    }

    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        let message = format!(
            "unexpected end of file, expected {}",
            describe_expected(&expected)
        );
        Self {
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            message,
        }
    }

    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            message: format!("invalid syntax: {}", reason),
            kind: ParseErrorKind::InvalidSyntax { reason },
            span,
        }
    }

    pub fn parser_limit_exceeded(message: impl Into<String>, span: Span) -> Self {
        let message = message.into();
        Self {
            kind: ParseErrorKind::ParserLimitExceeded {
                message: message.clone(),
            },
            span,
            message: format!("parser limit exceeded: {}", message),
        }
    }
}
