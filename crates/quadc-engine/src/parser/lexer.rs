//! Lexer for the quadc source language.
//!
//! Tokenization is generated by logos; this module converts the raw logos
//! tokens into [`Token`]s, interning identifiers and string contents and
//! attaching line/column information to every span.

use crate::parser::interner::Interner;
use crate::parser::token::{Span, Token};
use logos::Logos;
use thiserror::Error;

/// Raw token produced by logos before interning.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
enum LogosToken {
    #[token("void")]
    Void,
    #[token("int")]
    Int,
    #[token("char")]
    Char,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("extern")]
    Extern,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Number,

    // A digit run glued to letters (`12ab`) is reported as a malformed number
    #[regex(r"[0-9]+[A-Za-z_][A-Za-z0-9_]*")]
    BadNumber,

    #[regex(r"'([^'\\\n]|\\[^\n])'")]
    CharLit,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    StringLit,

    #[regex(r#""([^"\\\n]|\\[^\n])*"#)]
    UnterminatedString,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("=")]
    Equal,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,

    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character {ch:?}")]
    UnexpectedCharacter { ch: char, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String, span: Span },

    #[error("invalid escape sequence '{escape}'")]
    InvalidEscape { escape: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InvalidNumber { span, .. }
            | LexError::InvalidEscape { span, .. } => *span,
        }
    }
}

/// Maps byte offsets to 1-based line/column pairs.
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        let line = match self.line_starts.binary_search(&start) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let column = start - self.line_starts[line] + 1;
        Span::new(start, end, line as u32 + 1, column as u32)
    }
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    errors: Vec<LexError>,
    interner: Interner,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
            interner: Interner::with_capacity(64),
        }
    }

    /// Tokenize the whole input.
    ///
    /// The token stream always ends with [`Token::Eof`]. All lexical errors
    /// are collected before returning.
    pub fn tokenize(mut self) -> Result<(Vec<(Token, Span)>, Interner), Vec<LexError>> {
        let index = LineIndex::new(self.source);
        let mut lexer = LogosToken::lexer(self.source);

        while let Some(result) = lexer.next() {
            let range = lexer.span();
            let span = index.span(range.start, range.end);
            let text = lexer.slice();

            match result {
                Ok(raw) => {
                    if let Some(token) = self.convert(raw, text, span) {
                        self.tokens.push((token, span));
                    }
                }
                Err(()) => {
                    let ch = text.chars().next().unwrap_or('\0');
                    self.errors.push(LexError::UnexpectedCharacter { ch, span });
                }
            }
        }

        let end = self.source.len();
        self.tokens.push((Token::Eof, index.span(end, end)));

        if self.errors.is_empty() {
            Ok((self.tokens, self.interner))
        } else {
            Err(self.errors)
        }
    }

    fn convert(&mut self, raw: LogosToken, text: &str, span: Span) -> Option<Token> {
        let token = match raw {
            LogosToken::Void => Token::Void,
            LogosToken::Int => Token::Int,
            LogosToken::Char => Token::Char,
            LogosToken::Return => Token::Return,
            LogosToken::If => Token::If,
            LogosToken::Else => Token::Else,
            LogosToken::While => Token::While,
            LogosToken::For => Token::For,
            LogosToken::Extern => Token::Extern,
            LogosToken::Identifier => Token::Identifier(self.interner.intern(text)),
            LogosToken::Number => match text.parse::<i64>() {
                Ok(value) => Token::IntLiteral(value),
                Err(_) => return self.error(LexError::InvalidNumber {
                    text: text.to_string(),
                    span,
                }),
            },
            LogosToken::BadNumber => {
                return self.error(LexError::InvalidNumber {
                    text: text.to_string(),
                    span,
                })
            }
            LogosToken::CharLit => {
                let body = &text[1..text.len() - 1];
                match unescape(body) {
                    Ok(bytes) if bytes.len() == 1 => Token::CharLiteral(bytes[0]),
                    Ok(_) => {
                        let ch = body.chars().next().unwrap_or('\'');
                        return self.error(LexError::UnexpectedCharacter { ch, span });
                    }
                    Err(escape) => return self.error(LexError::InvalidEscape { escape, span }),
                }
            }
            LogosToken::StringLit => {
                let body = &text[1..text.len() - 1];
                match unescape(body) {
                    Ok(bytes) => {
                        let value = String::from_utf8_lossy(&bytes);
                        Token::StringLiteral(self.interner.intern(&value))
                    }
                    Err(escape) => return self.error(LexError::InvalidEscape { escape, span }),
                }
            }
            LogosToken::UnterminatedString => {
                return self.error(LexError::UnterminatedString { span })
            }
            LogosToken::Plus => Token::Plus,
            LogosToken::Minus => Token::Minus,
            LogosToken::Star => Token::Star,
            LogosToken::Slash => Token::Slash,
            LogosToken::Percent => Token::Percent,
            LogosToken::PlusPlus => Token::PlusPlus,
            LogosToken::MinusMinus => Token::MinusMinus,
            LogosToken::Bang => Token::Bang,
            LogosToken::Amp => Token::Amp,
            LogosToken::EqualEqual => Token::EqualEqual,
            LogosToken::BangEqual => Token::BangEqual,
            LogosToken::Less => Token::Less,
            LogosToken::LessEqual => Token::LessEqual,
            LogosToken::Greater => Token::Greater,
            LogosToken::GreaterEqual => Token::GreaterEqual,
            LogosToken::AmpAmp => Token::AmpAmp,
            LogosToken::PipePipe => Token::PipePipe,
            LogosToken::Equal => Token::Equal,
            LogosToken::PlusEqual => Token::PlusEqual,
            LogosToken::MinusEqual => Token::MinusEqual,
            LogosToken::StarEqual => Token::StarEqual,
            LogosToken::SlashEqual => Token::SlashEqual,
            LogosToken::PercentEqual => Token::PercentEqual,
            LogosToken::Semicolon => Token::Semicolon,
            LogosToken::Comma => Token::Comma,
            LogosToken::LeftParen => Token::LeftParen,
            LogosToken::RightParen => Token::RightParen,
            LogosToken::LeftBrace => Token::LeftBrace,
            LogosToken::RightBrace => Token::RightBrace,
            LogosToken::LeftBracket => Token::LeftBracket,
            LogosToken::RightBracket => Token::RightBracket,
        };
        Some(token)
    }

    fn error(&mut self, err: LexError) -> Option<Token> {
        self.errors.push(err);
        None
    }
}

/// Resolve backslash escapes. Returns the offending escape on failure.
fn unescape(body: &str) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('r') => out.push(b'\r'),
            Some('0') => out.push(0),
            Some('\\') => out.push(b'\\'),
            Some('\'') => out.push(b'\''),
            Some('"') => out.push(b'"'),
            Some(other) => return Err(format!("\\{}", other)),
            None => return Err("\\".to_string()),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        let (tokens, _) = Lexer::new(source).tokenize().expect("lex error");
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let (tokens, interner) = Lexer::new("int main extern integer").tokenize().unwrap();
        assert_eq!(tokens[0].0, Token::Int);
        assert!(matches!(tokens[1].0, Token::Identifier(sym) if interner.resolve(sym) == "main"));
        assert_eq!(tokens[2].0, Token::Extern);
        assert!(matches!(tokens[3].0, Token::Identifier(sym) if interner.resolve(sym) == "integer"));
        assert_eq!(tokens[4].0, Token::Eof);
    }

    #[test]
    fn test_compound_operators_are_longest_match() {
        let tokens = lex("a += b++ <= c && !d");
        let ops: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !matches!(t, Token::Identifier(_)))
            .collect();
        assert_eq!(
            ops,
            vec![
                Token::PlusEqual,
                Token::PlusPlus,
                Token::LessEqual,
                Token::AmpAmp,
                Token::Bang,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = lex("int /* block\n comment */ x; // trailing\n");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::Int);
        assert_eq!(tokens[2], Token::Semicolon);

        let tokens = lex("/** a * b **/ x /*/ y */ ;");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], Token::Semicolon);
    }

    #[test]
    fn test_char_and_string_literals() {
        let (tokens, interner) = Lexer::new(r#"'a' '\n' "hi\tthere""#).tokenize().unwrap();
        assert_eq!(tokens[0].0, Token::CharLiteral(b'a'));
        assert_eq!(tokens[1].0, Token::CharLiteral(b'\n'));
        match tokens[2].0 {
            Token::StringLiteral(sym) => assert_eq!(interner.resolve(sym), "hi\tthere"),
            ref other => panic!("expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_line_and_column_tracking() {
        let (tokens, _) = Lexer::new("int x;\n  return x;").tokenize().unwrap();
        let (ref ret, span) = tokens[3];
        assert_eq!(*ret, Token::Return);
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 3);
    }

    #[test]
    fn test_errors_are_collected() {
        let errors = Lexer::new("int $x = 12ab; \"open").tokenize().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], LexError::UnexpectedCharacter { ch: '$', .. }));
        assert!(matches!(errors[1], LexError::InvalidNumber { ref text, .. } if text == "12ab"));
        assert!(matches!(errors[2], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_invalid_escape() {
        let errors = Lexer::new(r#""bad \q""#).tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::InvalidEscape { ref escape, .. } if escape == "\\q"));
    }
}
