//! Abstract Syntax Tree (AST) for the quadc source language.
//!
//! This module defines the complete AST structure, including:
//! - Program structure (functions and global declarations)
//! - Statements (declarations, control flow, etc.)
//! - Expressions (literals, operators, calls, etc.)
//! - Type specifiers
//!
//! Every expression, declarator, block and function carries a [`NodeId`]
//! assigned by the parser. Later passes key their side tables by these ids
//! instead of writing back into the tree.

use crate::parser::interner::Symbol;
use crate::parser::token::Span;

pub mod expression;
pub mod printer;
pub mod statement;
pub mod types;

pub use expression::*;
pub use printer::AstPrinter;
pub use statement::*;
pub use types::*;

/// Parser-assigned node identity, unique within one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Root node: one translation unit
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Functions and global declarations in source order
    pub items: Vec<Item>,

    /// Span covering the whole file
    pub span: Span,
}

impl Program {
    pub fn new(items: Vec<Item>, span: Span) -> Self {
        Self { items, span }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over function definitions and prototypes
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(func) => Some(func),
            Item::Global(_) => None,
        })
    }
}

/// Top-level item
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Function definition or prototype
    Function(FunctionDecl),

    /// Global variable declaration: `int x, *p = 0;`
    Global(VarDecl),
}

impl Item {
    pub fn span(&self) -> &Span {
        match self {
            Item::Function(func) => &func.span,
            Item::Global(decl) => &decl.span,
        }
    }
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: Symbol,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: Symbol, span: Span) -> Self {
        Self { name, span }
    }
}

/// Function definition or prototype
///
/// `body` is `None` for prototypes (`int f(int);` or `extern int f(int);`).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub id: NodeId,
    pub name: Identifier,
    pub return_type: TypeExpr,
    pub params: Vec<Parameter>,
    pub body: Option<Block>,
    pub is_extern: bool,
    pub span: Span,
}

impl FunctionDecl {
    pub fn is_prototype(&self) -> bool {
        self.body.is_none()
    }
}

/// Function parameter: `int *p` or `char buf[]`
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: NodeId,
    pub name: Identifier,
    pub ty: TypeExpr,

    /// Written with `[]`; decays to a pointer
    pub is_array: bool,

    pub span: Span,
}
