//! Basic Blocks
//!
//! A basic block is a window `first..=last` into its function's quad list
//! with a single entry and a single exit. Edges are non-owning block ids.

use super::quad::{Quad, QuadId, QuadList};

/// Basic block identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BasicBlockId(pub u32);

impl BasicBlockId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BasicBlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// A basic block: a maximal straight-line run of quads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    pub id: BasicBlockId,
    /// First quad of the block
    pub first: QuadId,
    /// Last quad of the block (inclusive)
    pub last: QuadId,
    pub preds: Vec<BasicBlockId>,
    pub succs: Vec<BasicBlockId>,
}

impl BasicBlock {
    pub fn new(id: BasicBlockId, first: QuadId, last: QuadId) -> Self {
        Self {
            id,
            first,
            last,
            preds: Vec::new(),
            succs: Vec::new(),
        }
    }

    /// Number of quads in the block
    pub fn len(&self) -> usize {
        (self.last.0 - self.first.0) as usize + 1
    }

    /// Blocks always hold at least one quad
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, id: QuadId) -> bool {
        self.first <= id && id <= self.last
    }

    pub fn quad_ids(&self) -> impl Iterator<Item = QuadId> {
        (self.first.0..=self.last.0).map(QuadId)
    }

    /// The block's quads within `list`
    pub fn quads<'a>(&self, list: &'a QuadList) -> &'a [Quad] {
        list.range(self.first, self.last)
    }

    /// Last quad of the block
    pub fn exit<'a>(&self, list: &'a QuadList) -> Option<&'a Quad> {
        list.get(self.last)
    }

    /// Record a successor edge; duplicates are ignored
    pub fn add_succ(&mut self, succ: BasicBlockId) {
        if !self.succs.contains(&succ) {
            self.succs.push(succ);
        }
    }

    /// Record a predecessor edge; duplicates are ignored
    pub fn add_pred(&mut self, pred: BasicBlockId) {
        if !self.preds.contains(&pred) {
            self.preds.push(pred);
        }
    }

    pub fn successors(&self) -> &[BasicBlockId] {
        &self.succs
    }

    pub fn predecessors(&self) -> &[BasicBlockId] {
        &self.preds
    }
}
