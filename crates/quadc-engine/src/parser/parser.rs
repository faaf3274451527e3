//! Parser for the quadc source language
//!
//! A recursive descent parser that turns the lexer's token stream into a
//! [`Program`]. Parsing stops at the first error.

pub mod error;
pub mod expr;
pub mod guards;
pub mod precedence;
pub mod stmt;

use crate::parser::ast::*;
use crate::parser::interner::{Interner, Symbol};
use crate::parser::lexer::{LexError, Lexer};
use crate::parser::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// Parser state.
///
/// One token of lookahead beyond the current token is available through
/// [`Parser::peek`].
pub struct Parser {
    /// Pre-tokenized input, always terminated by `Token::Eof`
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Interner shared with the lexer
    interner: Interner,

    /// Next node id to hand out
    next_id: u32,

    /// Current nesting depth (see [`guards::MAX_PARSE_DEPTH`])
    pub(crate) depth: usize,
}

impl Parser {
    /// Create a new parser from source code.
    pub fn new(source: &str) -> Result<Self, Vec<LexError>> {
        let (tokens, interner) = Lexer::new(source).tokenize()?;
        Ok(Self::from_tokens(tokens, interner))
    }

    /// Create a parser over an existing token stream.
    pub fn from_tokens(mut tokens: Vec<(Token, Span)>, interner: Interner) -> Self {
        if !matches!(tokens.last(), Some((Token::Eof, _))) {
            let eof_span = match tokens.last() {
                Some((_, last)) => Span::new(last.end, last.end, last.line, last.column),
                None => Span::new(0, 0, 1, 1),
            };
            tokens.push((Token::Eof, eof_span));
        }

        Self {
            tokens,
            pos: 0,
            interner,
            next_id: 0,
            depth: 0,
        }
    }

    /// Parse the entire source file.
    ///
    /// Returns the program together with the interner that resolves its
    /// identifiers and string literals.
    pub fn parse(mut self) -> Result<(Program, Interner), ParseError> {
        let start_span = self.current_span();
        let mut items = Vec::new();
        let mut guard = guards::LoopGuard::new("program_items");

        while !self.at_eof() {
            guard.check()?;
            items.push(stmt::parse_item(&mut self)?);
        }

        let span = match items.last() {
            Some(last) => self.combine_spans(&start_span, last.span()),
            None => start_span,
        };

        Ok((Program::new(items, span), self.interner))
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Peek at the token after the current one.
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(tok, _)| tok)
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            self.current_span()
        } else {
            self.tokens[self.pos - 1].1
        }
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches the expected kind.
    pub fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Consume an identifier.
    pub fn expect_identifier(&mut self) -> Result<Identifier, ParseError> {
        match *self.current() {
            Token::Identifier(name) => {
                let span = self.current_span();
                self.advance();
                Ok(Identifier::new(name, span))
            }
            _ => Err(self.unexpected_token(&[Token::Identifier(Symbol::dummy())])),
        }
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Create an "unexpected token" error at the current position.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), span)
        }
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    pub fn combine_spans(&self, start: &Span, end: &Span) -> Span {
        Span {
            start: start.start,
            end: end.end,
            line: start.line,
            column: start.column,
        }
    }

    /// Hand out a fresh node id.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }
}
