//! Type checker: name binding, expression typing and implicit casts.
//!
//! The checker never rewrites the AST. Its results live in an [`Analysis`]
//! keyed by node id, next to the [`SymbolTable`] and [`TypeContext`]
//! (see [`CheckOutput`]).
//!
//! [`TypeContext`]: crate::parser::types::TypeContext

pub mod checker;
pub mod error;
pub mod symbols;

pub use checker::{Analysis, CheckOutput, Coercion, TypeChecker};
pub use error::CheckError;
pub use symbols::{Scope, ScopeId, ScopeKind, SymbolEntry, SymbolId, SymbolKind, SymbolTable};
