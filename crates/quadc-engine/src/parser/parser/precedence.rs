//! Operator precedence table for binary expression parsing.

use crate::parser::token::Token;

/// Operator precedence level (higher = tighter binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None = 0,
    Assignment = 1,     // =, +=, -=, *=, /=, %=
    LogicalOr = 2,      // ||
    LogicalAnd = 3,     // &&
    Equality = 4,       // ==, !=
    Relational = 5,     // <, <=, >, >=
    Additive = 6,       // +, -
    Multiplicative = 7, // *, /, %
    Unary = 8,          // -, !, *, &, ++, --
    Postfix = 9,        // (), [], ++, --
}

impl Precedence {
    /// The next tighter level, used for left-associative operands
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::LogicalOr,
            Precedence::LogicalOr => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary | Precedence::Postfix => Precedence::Postfix,
        }
    }
}

/// Get the precedence of an infix operator token.
pub fn get_precedence(token: &Token) -> Precedence {
    match token {
        Token::Equal
        | Token::PlusEqual
        | Token::MinusEqual
        | Token::StarEqual
        | Token::SlashEqual
        | Token::PercentEqual => Precedence::Assignment,

        Token::PipePipe => Precedence::LogicalOr,
        Token::AmpAmp => Precedence::LogicalAnd,
        Token::EqualEqual | Token::BangEqual => Precedence::Equality,
        Token::Less | Token::LessEqual | Token::Greater | Token::GreaterEqual => {
            Precedence::Relational
        }
        Token::Plus | Token::Minus => Precedence::Additive,
        Token::Star | Token::Slash | Token::Percent => Precedence::Multiplicative,
        _ => Precedence::None,
    }
}

/// Assignment is the only right-associative infix level.
pub fn is_right_associative(token: &Token) -> bool {
    get_precedence(token) == Precedence::Assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(get_precedence(&Token::Star) > get_precedence(&Token::Plus));
        assert!(get_precedence(&Token::Plus) > get_precedence(&Token::Less));
        assert!(get_precedence(&Token::AmpAmp) > get_precedence(&Token::PipePipe));
        assert!(get_precedence(&Token::PipePipe) > get_precedence(&Token::PlusEqual));
        assert_eq!(get_precedence(&Token::Semicolon), Precedence::None);
    }

    #[test]
    fn test_associativity() {
        assert!(is_right_associative(&Token::Equal));
        assert!(!is_right_associative(&Token::Minus));
    }
}
