//! Statement AST nodes

use super::{Expression, Identifier, NodeId, TypeExpr};
use crate::parser::token::Span;

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `{ ... }`
    Block(Block),

    /// `int x = 1, *p;`
    VarDecl(VarDecl),

    If(IfStatement),
    While(WhileStatement),
    For(ForStatement),
    Return(ReturnStatement),

    /// Expression evaluated for its side effects
    Expression(ExpressionStatement),

    /// Lone `;`
    Empty(Span),
}

impl Statement {
    pub fn span(&self) -> &Span {
        match self {
            Statement::Block(s) => &s.span,
            Statement::VarDecl(s) => &s.span,
            Statement::If(s) => &s.span,
            Statement::While(s) => &s.span,
            Statement::For(s) => &s.span,
            Statement::Return(s) => &s.span,
            Statement::Expression(s) => &s.span,
            Statement::Empty(span) => span,
        }
    }
}

/// Braced statement list; opens a new scope
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// Variable declaration with one or more declarators
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeExpr,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

/// One declared name: `*p`, `buf[16]`, `x = 3`
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub id: NodeId,
    pub name: Identifier,

    /// Stars written before the name, on top of the declaration's type
    pub pointer_depth: u8,

    pub array_len: Option<u32>,
    pub init: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

/// `for (init; condition; update) body`, every header part optional
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<Expression>,
    pub condition: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}
