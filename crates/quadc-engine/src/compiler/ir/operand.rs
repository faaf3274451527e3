//! IR Operands
//!
//! Operands are the inputs and outputs of quads: immediate integers, string
//! literals, variables (by symbol id), branch labels and type tags.

use crate::parser::checker::SymbolId;
use crate::parser::TypeId;
use std::fmt;

/// Compile-time branch target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl Label {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__L{}__", self.0)
    }
}

/// A quad operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Immediate integer; `width` is the byte size of the type it came from
    IntConst { value: i64, width: u8 },
    /// String literal, only read by the `String` quad
    StrConst(String),
    /// Variable, parameter, global, function or temporary
    Variable(SymbolId),
    Label(Label),
    /// Type tag, only used as the target of `Cast`
    Type(TypeId),
}

impl Operand {
    pub fn int(value: i64, width: u8) -> Self {
        Operand::IntConst { value, width }
    }

    pub fn as_variable(&self) -> Option<SymbolId> {
        match self {
            Operand::Variable(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<Label> {
        match self {
            Operand::Label(label) => Some(*label),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Operand::IntConst { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::IntConst { .. } | Operand::StrConst(_))
    }
}

impl From<SymbolId> for Operand {
    fn from(sym: SymbolId) -> Self {
        Operand::Variable(sym)
    }
}

impl From<Label> for Operand {
    fn from(label: Label) -> Self {
        Operand::Label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display() {
        assert_eq!(Label::new(0).to_string(), "__L0__");
        assert_eq!(Label::new(17).to_string(), "__L17__");
    }

    #[test]
    fn test_accessors() {
        let var = Operand::from(SymbolId(3));
        assert_eq!(var.as_variable(), Some(SymbolId(3)));
        assert_eq!(var.as_label(), None);
        assert!(!var.is_constant());

        let c = Operand::int(-4, 4);
        assert_eq!(c.as_int(), Some(-4));
        assert!(c.is_constant());
        assert!(Operand::StrConst("hi".into()).is_constant());

        assert_eq!(Operand::from(Label(2)).as_label(), Some(Label(2)));
    }
}
