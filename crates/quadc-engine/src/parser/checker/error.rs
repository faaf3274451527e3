//! Error types for type checking and binding
//!
//! Provides structured error types with source locations for reporting
//! binding and type errors.

use crate::parser::Span;
use thiserror::Error;

/// Errors that can occur during type checking
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// Duplicate symbol definition in the same scope
    #[error("redefinition of '{name}'")]
    DuplicateSymbol {
        name: String,
        /// Location of original definition
        original: Span,
        /// Location of duplicate definition
        duplicate: Span,
    },

    #[error("use of undeclared identifier '{name}'")]
    UndefinedName { name: String, span: Span },

    #[error("'{name}' is not a function")]
    NotAFunction { name: String, span: Span },

    #[error("function '{name}' used as a value")]
    FunctionAsValue { name: String, span: Span },

    #[error("function '{name}' expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        name: String,
        expected: usize,
        actual: usize,
        span: Span,
    },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: String,
        span: Span,
    },

    /// Operator applied to an operand type it does not accept
    #[error("invalid operand of type {ty} for '{op}'")]
    InvalidOperand { op: String, ty: String, span: Span },

    #[error("condition must be a scalar, got {ty}")]
    NonScalarCondition { ty: String, span: Span },

    #[error("void value not ignored as it ought to be")]
    VoidValue { span: Span },

    #[error("variable '{name}' declared void")]
    VoidVariable { name: String, span: Span },

    #[error("function prototype '{name}' was never defined")]
    UndefinedPrototype { name: String, span: Span },

    #[error("redefinition of function '{name}'")]
    FunctionRedefinition {
        name: String,
        original: Span,
        duplicate: Span,
    },

    #[error("conflicting declaration of '{name}'")]
    ConflictingDeclaration { name: String, span: Span },

    #[error("initializer of global '{name}' is not a constant")]
    NonConstantInitializer { name: String, span: Span },

    #[error("array '{name}' cannot have an initializer")]
    ArrayInitializer { name: String, span: Span },

    #[error("return type does not match function: expected {expected}, got {actual}")]
    ReturnMismatch {
        expected: String,
        actual: String,
        span: Span,
    },
}

impl CheckError {
    /// Primary location of the error
    pub fn span(&self) -> Span {
        match self {
            CheckError::DuplicateSymbol { duplicate, .. }
            | CheckError::FunctionRedefinition { duplicate, .. } => *duplicate,
            CheckError::UndefinedName { span, .. }
            | CheckError::NotAFunction { span, .. }
            | CheckError::FunctionAsValue { span, .. }
            | CheckError::ArgumentCount { span, .. }
            | CheckError::TypeMismatch { span, .. }
            | CheckError::InvalidOperand { span, .. }
            | CheckError::NonScalarCondition { span, .. }
            | CheckError::VoidValue { span }
            | CheckError::VoidVariable { span, .. }
            | CheckError::UndefinedPrototype { span, .. }
            | CheckError::ConflictingDeclaration { span, .. }
            | CheckError::NonConstantInitializer { span, .. }
            | CheckError::ArrayInitializer { span, .. }
            | CheckError::ReturnMismatch { span, .. } => *span,
        }
    }

    /// Location of an earlier declaration this error refers to, if any
    pub fn related_span(&self) -> Option<Span> {
        match self {
            CheckError::DuplicateSymbol { original, .. }
            | CheckError::FunctionRedefinition { original, .. } => Some(*original),
            _ => None,
        }
    }

    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            CheckError::DuplicateSymbol { .. } => "E2001",
            CheckError::UndefinedName { .. } => "E2002",
            CheckError::NotAFunction { .. } => "E2003",
            CheckError::FunctionAsValue { .. } => "E2004",
            CheckError::ArgumentCount { .. } => "E2005",
            CheckError::TypeMismatch { .. } => "E2006",
            CheckError::InvalidOperand { .. } => "E2007",
            CheckError::NonScalarCondition { .. } => "E2008",
            CheckError::VoidValue { .. } => "E2009",
            CheckError::VoidVariable { .. } => "E2010",
            CheckError::UndefinedPrototype { .. } => "E2011",
            CheckError::FunctionRedefinition { .. } => "E2012",
            CheckError::ConflictingDeclaration { .. } => "E2013",
            CheckError::NonConstantInitializer { .. } => "E2014",
            CheckError::ArrayInitializer { .. } => "E2015",
            CheckError::ReturnMismatch { .. } => "E2016",
        }
    }
}
