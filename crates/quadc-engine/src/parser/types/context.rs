//! Type context for managing types and type interning

use super::ty::{FunctionType, Type, TypeId};
use crate::parser::ast::{BaseType, TypeExpr};
use rustc_hash::FxHashMap;

/// Type context that manages all types in a program
///
/// Identical types share one [`TypeId`], so type equality is id equality.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Storage for all types, indexed by TypeId
    types: Vec<Type>,

    /// Reverse mapping from Type to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    pub const VOID: TypeId = TypeId(0);
    pub const INT: TypeId = TypeId(1);
    pub const CHAR: TypeId = TypeId(2);

    /// Size in bytes of a pointer on the target
    pub const POINTER_SIZE: u32 = 8;

    pub fn new() -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
        };

        // Order must match the well-known constants above
        ctx.intern(Type::Void);
        ctx.intern(Type::Int);
        ctx.intern(Type::Char);

        ctx
    }

    /// Intern a type, returning its TypeId
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.type_to_id.insert(ty, id);
        id
    }

    /// Get a type by id
    ///
    /// Ids are only minted by `intern`, so lookup cannot miss for ids
    /// from this context.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        self.intern(Type::Pointer(pointee))
    }

    pub fn array_of(&mut self, element: TypeId, len: u32) -> TypeId {
        self.intern(Type::Array { element, len })
    }

    pub fn function(&mut self, ret: TypeId, params: Vec<TypeId>) -> TypeId {
        self.intern(Type::Function(FunctionType { ret, params }))
    }

    /// Resolve a written type specifier, with `extra` declarator stars
    pub fn resolve_type_expr(&mut self, ty: &TypeExpr, extra: u8) -> TypeId {
        let mut id = match ty.base {
            BaseType::Void => Self::VOID,
            BaseType::Int => Self::INT,
            BaseType::Char => Self::CHAR,
        };
        for _ in 0..(ty.pointer_depth as u32 + extra as u32) {
            id = self.pointer_to(id);
        }
        id
    }

    /// Pointee of a pointer, or element of an array
    pub fn pointee(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            Type::Pointer(inner) => Some(*inner),
            Type::Array { element, .. } => Some(*element),
            _ => None,
        }
    }

    pub fn function_signature(&self, id: TypeId) -> Option<&FunctionType> {
        match self.get(id) {
            Type::Function(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn is_void(&self, id: TypeId) -> bool {
        id == Self::VOID
    }

    pub fn is_integer(&self, id: TypeId) -> bool {
        self.get(id).is_integer()
    }

    pub fn is_scalar(&self, id: TypeId) -> bool {
        self.get(id).is_scalar()
    }

    pub fn is_pointer(&self, id: TypeId) -> bool {
        self.get(id).is_pointer()
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.get(id), Type::Array { .. })
    }

    /// Storage size in bytes
    pub fn size_of(&self, id: TypeId) -> u32 {
        match self.get(id) {
            Type::Void => 0,
            Type::Int => 4,
            Type::Char => 1,
            Type::Pointer(_) | Type::Function(_) => Self::POINTER_SIZE,
            Type::Array { element, len } => self.size_of(*element).saturating_mul(*len),
        }
    }

    /// Byte width of an immediate of this type
    pub fn const_width(&self, id: TypeId) -> u8 {
        match self.get(id) {
            Type::Char => 1,
            Type::Int | Type::Void => 4,
            _ => Self::POINTER_SIZE as u8,
        }
    }

    /// Human-readable type name: `int`, `char*`, `int[10]`, `int(char*)`
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            Type::Void => "void".to_string(),
            Type::Int => "int".to_string(),
            Type::Char => "char".to_string(),
            Type::Pointer(inner) => format!("{}*", self.display(*inner)),
            Type::Array { element, len } => format!("{}[{}]", self.display(*element), len),
            Type::Function(sig) => {
                let params: Vec<String> = sig.params.iter().map(|p| self.display(*p)).collect();
                format!("{}({})", self.display(sig.ret), params.join(", "))
            }
        }
    }
}
