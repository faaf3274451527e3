//! Quads
//!
//! A quad is one three-address operation: an opcode, up to two source
//! operands and one destination. A function's quads live in an append-only
//! [`QuadList`]; the successor of quad `n` is quad `n + 1`.

use super::operand::{Label, Operand};
use crate::parser::ast::RelationalOperator;
use crate::parser::checker::SymbolId;
use crate::parser::TypeId;
use std::fmt;

/// Quad opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadOp {
    /// Declare a global: arg1 = variable, arg2 = optional initial value
    Global,
    /// Materialize a string literal: arg1 = text, res = `char*` variable
    String,

    // Binary arithmetic: res = arg1 op arg2
    Add,
    Sub,
    Mul,
    SDiv,
    SMod,

    /// res = -arg1
    Neg,
    /// res = arg1
    Copy,
    /// res = &arg1
    AddrOf,
    /// res = *arg1
    RDeref,
    /// *res = arg1
    LDeref,
    /// res = arg1 + arg2, pointer plus element offset
    AddPtr,

    /// Branch target definition: arg1 = label
    Label,
    /// Unconditional jump: arg1 = label
    Goto,

    // Conditional branches: if (arg1 op arg2) goto res
    IfEq,
    IfNeq,
    IfLt,
    IfLeq,
    IfGt,
    IfGeq,

    /// Function prologue marker: arg1 = function
    Enter,
    /// Push an argument: arg1 = value
    Param,
    /// arg1 = callee, arg2 = argument count, res = optional result
    Call,
    /// arg1 = optional value
    Return,
    /// res = (arg2) arg1
    Cast,
}

impl QuadOp {
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            QuadOp::Add | QuadOp::Sub | QuadOp::Mul | QuadOp::SDiv | QuadOp::SMod
        )
    }

    pub fn is_cond_branch(self) -> bool {
        matches!(
            self,
            QuadOp::IfEq | QuadOp::IfNeq | QuadOp::IfLt | QuadOp::IfLeq | QuadOp::IfGt | QuadOp::IfGeq
        )
    }

    /// Goto or conditional branch
    pub fn is_jump(self) -> bool {
        self == QuadOp::Goto || self.is_cond_branch()
    }

    /// Ends a basic block
    pub fn is_terminator(self) -> bool {
        self.is_jump() || self == QuadOp::Return
    }

    /// Conditional branch for a relational operator
    pub fn from_relational(op: RelationalOperator) -> Self {
        match op {
            RelationalOperator::Equal => QuadOp::IfEq,
            RelationalOperator::NotEqual => QuadOp::IfNeq,
            RelationalOperator::Less => QuadOp::IfLt,
            RelationalOperator::LessEqual => QuadOp::IfLeq,
            RelationalOperator::Greater => QuadOp::IfGt,
            RelationalOperator::GreaterEqual => QuadOp::IfGeq,
        }
    }

    /// Infix symbol for binary operators and comparisons
    pub fn symbol(self) -> Option<&'static str> {
        let s = match self {
            QuadOp::Add => "+",
            QuadOp::Sub => "-",
            QuadOp::Mul => "*",
            QuadOp::SDiv => "/",
            QuadOp::SMod => "%",
            QuadOp::AddPtr => "+ptr",
            QuadOp::IfEq => "==",
            QuadOp::IfNeq => "!=",
            QuadOp::IfLt => "<",
            QuadOp::IfLeq => "<=",
            QuadOp::IfGt => ">",
            QuadOp::IfGeq => ">=",
            _ => return None,
        };
        Some(s)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            QuadOp::Global => "global",
            QuadOp::String => "string",
            QuadOp::Add => "add",
            QuadOp::Sub => "sub",
            QuadOp::Mul => "mul",
            QuadOp::SDiv => "sdiv",
            QuadOp::SMod => "smod",
            QuadOp::Neg => "neg",
            QuadOp::Copy => "copy",
            QuadOp::AddrOf => "addrof",
            QuadOp::RDeref => "rderef",
            QuadOp::LDeref => "lderef",
            QuadOp::AddPtr => "addptr",
            QuadOp::Label => "label",
            QuadOp::Goto => "goto",
            QuadOp::IfEq => "ifeq",
            QuadOp::IfNeq => "ifneq",
            QuadOp::IfLt => "iflt",
            QuadOp::IfLeq => "ifleq",
            QuadOp::IfGt => "ifgt",
            QuadOp::IfGeq => "ifgeq",
            QuadOp::Enter => "enter",
            QuadOp::Param => "param",
            QuadOp::Call => "call",
            QuadOp::Return => "return",
            QuadOp::Cast => "cast",
        }
    }
}

impl fmt::Display for QuadOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One three-address operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quad {
    pub op: QuadOp,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
    pub res: Option<Operand>,
}

impl Quad {
    pub fn new(
        op: QuadOp,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
        res: Option<Operand>,
    ) -> Self {
        Self { op, arg1, arg2, res }
    }

    pub fn global(var: SymbolId, init: Option<Operand>) -> Self {
        Self::new(QuadOp::Global, Some(var.into()), init, None)
    }

    pub fn string(text: impl Into<String>, dest: SymbolId) -> Self {
        Self::new(
            QuadOp::String,
            Some(Operand::StrConst(text.into())),
            None,
            Some(dest.into()),
        )
    }

    /// `dest = lhs op rhs` for arithmetic and `AddPtr`
    pub fn binary(op: QuadOp, lhs: Operand, rhs: Operand, dest: SymbolId) -> Self {
        Self::new(op, Some(lhs), Some(rhs), Some(dest.into()))
    }

    /// `dest = op src` for `Neg`, `AddrOf` and `RDeref`
    pub fn unary(op: QuadOp, src: Operand, dest: SymbolId) -> Self {
        Self::new(op, Some(src), None, Some(dest.into()))
    }

    pub fn copy(src: Operand, dest: Operand) -> Self {
        Self::new(QuadOp::Copy, Some(src), None, Some(dest))
    }

    /// `*ptr = value`
    pub fn store(value: Operand, ptr: Operand) -> Self {
        Self::new(QuadOp::LDeref, Some(value), None, Some(ptr))
    }

    pub fn label(label: Label) -> Self {
        Self::new(QuadOp::Label, Some(label.into()), None, None)
    }

    pub fn goto(label: Label) -> Self {
        Self::new(QuadOp::Goto, Some(label.into()), None, None)
    }

    /// `if (lhs op rhs) goto target`
    pub fn branch(op: QuadOp, lhs: Operand, rhs: Operand, target: Label) -> Self {
        debug_assert!(op.is_cond_branch());
        Self::new(op, Some(lhs), Some(rhs), Some(target.into()))
    }

    pub fn enter(func: SymbolId) -> Self {
        Self::new(QuadOp::Enter, Some(func.into()), None, None)
    }

    pub fn param(value: Operand) -> Self {
        Self::new(QuadOp::Param, Some(value), None, None)
    }

    pub fn call(callee: SymbolId, argc: usize, dest: Option<SymbolId>) -> Self {
        Self::new(
            QuadOp::Call,
            Some(callee.into()),
            Some(Operand::int(argc as i64, 4)),
            dest.map(Operand::from),
        )
    }

    pub fn ret(value: Option<Operand>) -> Self {
        Self::new(QuadOp::Return, value, None, None)
    }

    pub fn cast(value: Operand, to: TypeId, dest: SymbolId) -> Self {
        Self::new(QuadOp::Cast, Some(value), Some(Operand::Type(to)), Some(dest.into()))
    }

    /// Label this quad jumps to, for `Goto` and conditional branches
    pub fn target_label(&self) -> Option<Label> {
        match self.op {
            QuadOp::Goto => self.arg1.as_ref().and_then(Operand::as_label),
            op if op.is_cond_branch() => self.res.as_ref().and_then(Operand::as_label),
            _ => None,
        }
    }

    /// Label this quad defines, for `Label`
    pub fn defined_label(&self) -> Option<Label> {
        match self.op {
            QuadOp::Label => self.arg1.as_ref().and_then(Operand::as_label),
            _ => None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        self.op.is_terminator()
    }
}

/// Index of a quad in its function's [`QuadList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadId(pub u32);

impl QuadId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QuadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Append-only quad sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadList {
    quads: Vec<Quad>,
}

impl QuadList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, quad: Quad) -> QuadId {
        let id = QuadId(self.quads.len() as u32);
        self.quads.push(quad);
        id
    }

    /// Append every quad of `other`, preserving order
    pub fn append(&mut self, other: QuadList) {
        self.quads.extend(other.quads);
    }

    pub fn get(&self, id: QuadId) -> Option<&Quad> {
        self.quads.get(id.as_usize())
    }

    /// Quad that follows `id`, if any
    pub fn next(&self, id: QuadId) -> Option<QuadId> {
        let next = QuadId(id.0 + 1);
        (next.as_usize() < self.quads.len()).then_some(next)
    }

    pub fn first(&self) -> Option<&Quad> {
        self.quads.first()
    }

    pub fn last(&self) -> Option<&Quad> {
        self.quads.last()
    }

    /// Inclusive range `first..=last`
    pub fn range(&self, first: QuadId, last: QuadId) -> &[Quad] {
        let end = (last.as_usize() + 1).min(self.quads.len());
        let start = first.as_usize().min(end);
        &self.quads[start..end]
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quad> {
        self.quads.iter()
    }

    /// Iterate with ids
    pub fn enumerate(&self) -> impl Iterator<Item = (QuadId, &Quad)> {
        self.quads
            .iter()
            .enumerate()
            .map(|(i, quad)| (QuadId(i as u32), quad))
    }

    pub fn as_slice(&self) -> &[Quad] {
        &self.quads
    }
}

impl<'a> IntoIterator for &'a QuadList {
    type Item = &'a Quad;
    type IntoIter = std::slice::Iter<'a, Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_classification() {
        assert!(QuadOp::Goto.is_jump());
        assert!(QuadOp::IfLt.is_cond_branch());
        assert!(QuadOp::Return.is_terminator());
        assert!(!QuadOp::Return.is_jump());
        assert!(!QuadOp::Label.is_terminator());
        assert!(QuadOp::SMod.is_binary());
        assert!(!QuadOp::AddPtr.is_binary());
        assert_eq!(QuadOp::from_relational(RelationalOperator::LessEqual), QuadOp::IfLeq);
    }

    #[test]
    fn test_branch_targets() {
        let goto = Quad::goto(Label(4));
        assert_eq!(goto.target_label(), Some(Label(4)));
        assert_eq!(goto.defined_label(), None);

        let branch = Quad::branch(QuadOp::IfNeq, Operand::int(1, 4), Operand::int(0, 4), Label(9));
        assert_eq!(branch.target_label(), Some(Label(9)));

        let label = Quad::label(Label(9));
        assert_eq!(label.defined_label(), Some(Label(9)));
        assert_eq!(label.target_label(), None);
    }

    #[test]
    fn test_call_without_result() {
        let call = Quad::call(SymbolId(0), 2, None);
        assert_eq!(call.arg2, Some(Operand::int(2, 4)));
        assert!(call.res.is_none());
    }

    #[test]
    fn test_quad_list() {
        let mut list = QuadList::new();
        let a = list.push(Quad::goto(Label(0)));
        let b = list.push(Quad::label(Label(0)));

        let mut tail = QuadList::new();
        tail.push(Quad::ret(None));
        list.append(tail);

        assert_eq!(list.len(), 3);
        assert_eq!(list.next(a), Some(b));
        assert_eq!(list.next(QuadId(2)), None);
        assert_eq!(list.range(b, QuadId(2)).len(), 2);
        assert_eq!(list.last().map(|q| q.op), Some(QuadOp::Return));
    }
}
