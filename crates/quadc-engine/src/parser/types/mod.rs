//! Type system: interned types and their queries

pub mod context;
pub mod ty;

pub use context::TypeContext;
pub use ty::{FunctionType, Type, TypeId};
