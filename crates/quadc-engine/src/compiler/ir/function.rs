//! IR Functions
//!
//! A lowered function: its flat quad list and, once the CFG builder has run,
//! the basic blocks partitioning that list.

use super::block::{BasicBlock, BasicBlockId};
use super::quad::{QuadId, QuadList, QuadOp};
use crate::parser::checker::{ScopeId, SymbolId};
use crate::parser::TypeId;

/// An IR function
#[derive(Debug, Clone)]
pub struct IrFunction {
    /// Function name
    pub name: String,
    /// Function symbol
    pub symbol: SymbolId,
    /// Parameter symbols, in declaration order
    pub params: Vec<SymbolId>,
    /// Return type
    pub return_ty: TypeId,
    /// Scope holding the parameters and outermost locals
    pub scope: ScopeId,
    pub quads: QuadList,
    /// Basic blocks in source order; empty until the CFG is built
    pub blocks: Vec<BasicBlock>,
}

impl IrFunction {
    /// Create a new function with no quads
    pub fn new(
        name: impl Into<String>,
        symbol: SymbolId,
        params: Vec<SymbolId>,
        return_ty: TypeId,
        scope: ScopeId,
    ) -> Self {
        Self {
            name: name.into(),
            symbol,
            params,
            return_ty,
            scope,
            quads: QuadList::new(),
            blocks: Vec::new(),
        }
    }

    /// Get a block by ID
    pub fn get_block(&self, id: BasicBlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.0 as usize)
    }

    /// Block that contains a quad
    pub fn block_of(&self, quad: QuadId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.contains(quad))
    }

    /// Get the entry block
    pub fn entry(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of successor edges across all blocks
    pub fn edge_count(&self) -> usize {
        self.blocks.iter().map(|b| b.succs.len()).sum()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    pub fn has_cfg(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// Validate the function structure
    pub fn validate(&self) -> Result<(), String> {
        match self.quads.first() {
            Some(quad) if quad.op == QuadOp::Enter => {}
            _ => return Err("Function does not start with enter".to_string()),
        }

        if !self.has_cfg() {
            return Ok(());
        }

        // Blocks must tile the quad list in order
        let mut expected = 0u32;
        for (index, block) in self.blocks.iter().enumerate() {
            if block.id.0 as usize != index {
                return Err(format!("Block {} is stored at index {}", block.id, index));
            }
            if block.first.0 != expected || block.last < block.first {
                return Err(format!(
                    "Block {} covers {}..={}, expected to start at q{}",
                    block.id, block.first, block.last, expected
                ));
            }
            expected = block.last.0 + 1;

            for &succ in &block.succs {
                let target = self
                    .get_block(succ)
                    .ok_or_else(|| format!("Block {} references non-existent successor {}", block.id, succ))?;
                if !target.preds.contains(&block.id) {
                    return Err(format!("Edge {} -> {} has no matching predecessor", block.id, succ));
                }
            }
        }
        if expected as usize != self.quads.len() {
            return Err(format!(
                "Blocks cover {} of {} quads",
                expected,
                self.quads.len()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::quad::Quad;
    use crate::parser::TypeContext;

    fn make_function() -> IrFunction {
        let mut func = IrFunction::new("f", SymbolId(0), vec![], TypeContext::VOID, ScopeId(1));
        func.quads.push(Quad::enter(SymbolId(0)));
        func.quads.push(Quad::ret(None));
        func
    }

    #[test]
    fn test_function_new() {
        let func = IrFunction::new("test", SymbolId(2), vec![SymbolId(3)], TypeContext::INT, ScopeId(1));
        assert_eq!(func.name, "test");
        assert_eq!(func.param_count(), 1);
        assert!(func.quads.is_empty());
        assert!(!func.has_cfg());
    }

    #[test]
    fn test_validate_partition() {
        let mut func = make_function();
        assert!(func.validate().is_ok());

        func.blocks.push(BasicBlock::new(BasicBlockId(0), QuadId(0), QuadId(1)));
        assert!(func.validate().is_ok());
        assert_eq!(func.block_of(QuadId(1)).map(|b| b.id), Some(BasicBlockId(0)));

        func.blocks[0].last = QuadId(0);
        assert!(func.validate().is_err());
    }

    #[test]
    fn test_validate_requires_enter() {
        let mut func = make_function();
        func.quads = QuadList::new();
        func.quads.push(Quad::ret(None));
        assert!(func.validate().is_err());
    }
}
