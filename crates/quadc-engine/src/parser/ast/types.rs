//! Type specifiers as written in source

use crate::parser::token::Span;
use std::fmt;

/// Base type keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Void,
    Int,
    Char,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BaseType::Void => "void",
            BaseType::Int => "int",
            BaseType::Char => "char",
        };
        f.write_str(name)
    }
}

/// A type specifier: base keyword followed by zero or more `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeExpr {
    pub base: BaseType,
    pub pointer_depth: u8,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(base: BaseType, pointer_depth: u8, span: Span) -> Self {
        Self {
            base,
            pointer_depth,
            span,
        }
    }

    /// Same specifier with `extra` more levels of indirection
    pub fn with_pointers(self, extra: u8) -> Self {
        Self {
            pointer_depth: self.pointer_depth.saturating_add(extra),
            ..self
        }
    }

    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void && self.pointer_depth == 0
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for _ in 0..self.pointer_depth {
            f.write_str("*")?;
        }
        Ok(())
    }
}
