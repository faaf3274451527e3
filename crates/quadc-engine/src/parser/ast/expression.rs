//! Expression AST nodes
//!
//! This module defines all expression kinds of the language:
//! - Literals (integers, characters, strings)
//! - Unary, binary, relational and logical operators
//! - Assignment and compound assignment
//! - Increment/decrement, indexing and calls

use super::{Identifier, NodeId};
use crate::parser::interner::Symbol;
use crate::parser::token::Span;

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expression {
    pub fn new(id: NodeId, kind: ExprKind, span: Span) -> Self {
        Self { id, kind, span }
    }

    /// Whether this expression is evaluated for its truth value by
    /// branching rather than by computing a number.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Relational { .. }
                | ExprKind::Logical { .. }
                | ExprKind::Unary {
                    op: UnaryOperator::Not,
                    ..
                }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal: 42
    IntLiteral(i64),

    /// Character literal: 'a'
    CharLiteral(u8),

    /// String literal: "hello"
    StringLiteral(Symbol),

    /// Variable or function name
    Identifier(Symbol),

    /// Unary operator: -x, !x, *p, &x
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// ++x, x--, ...
    IncDec {
        op: IncDecOperator,
        operand: Box<Expression>,
    },

    /// Arithmetic: x + y
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Comparison: x < y
    Relational {
        op: RelationalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Short-circuit: x && y
    Logical {
        op: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// `target = value`, or `target op= value` when `op` is set
    Assign {
        op: Option<BinaryOperator>,
        target: Box<Expression>,
        value: Box<Expression>,
    },

    /// a[i]
    Index {
        base: Box<Expression>,
        index: Box<Expression>,
    },

    /// f(a, b)
    Call {
        callee: Identifier,
        args: Vec<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,  // -x
    Not,     // !x
    Deref,   // *p
    AddrOf,  // &x
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::Deref => "*",
            UnaryOperator::AddrOf => "&",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOperator {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl IncDecOperator {
    pub fn is_increment(self) -> bool {
        matches!(self, IncDecOperator::PreIncrement | IncDecOperator::PostIncrement)
    }

    pub fn is_prefix(self) -> bool {
        matches!(self, IncDecOperator::PreIncrement | IncDecOperator::PreDecrement)
    }

    pub fn symbol(self) -> &'static str {
        if self.is_increment() {
            "++"
        } else {
            "--"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Modulo,   // %
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOperator {
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
}

impl RelationalOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            RelationalOperator::Equal => "==",
            RelationalOperator::NotEqual => "!=",
            RelationalOperator::Less => "<",
            RelationalOperator::LessEqual => "<=",
            RelationalOperator::Greater => ">",
            RelationalOperator::GreaterEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And, // &&
    Or,  // ||
}

impl LogicalOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }
}
