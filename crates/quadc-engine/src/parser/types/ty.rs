//! Core type definitions

use std::fmt;

/// Unique identifier for a type in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Create a new TypeId from a raw value
    ///
    /// Prefer the well-known constants on [`super::TypeContext`].
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// A type of the source language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,

    /// 32-bit signed integer
    Int,

    /// 8-bit character
    Char,

    /// Pointer to the given type
    Pointer(TypeId),

    /// Fixed-length array: `elem[len]`
    Array { element: TypeId, len: u32 },

    /// Function signature
    Function(FunctionType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub ret: TypeId,
    pub params: Vec<TypeId>,
}

impl Type {
    /// Integer-like types that participate in arithmetic directly
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int | Type::Char)
    }

    /// Types that can be tested for truth and compared
    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Int | Type::Char | Type::Pointer(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }
}
