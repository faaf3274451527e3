//! Control-flow graph construction
//!
//! Partitions a function's flat quad list into maximal basic blocks and
//! links them. A block ends at a `Goto`, a conditional branch or a `Return`,
//! or right before a `Label`. A conditional branch directly followed by a
//! `Goto` ends its block on that `Goto`, so the pair acts as a two-way exit.

use super::ir::{BasicBlock, BasicBlockId, IrFunction, Label, QuadId, QuadList, QuadOp};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// CFG construction errors
///
/// Labels are compiler-generated, so these indicate a lowering bug.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CfgError {
    #[error("branch to undefined label {label} in function '{function}'")]
    UndefinedLabel { label: Label, function: String },
}

/// Build the CFG of `func` and attach its blocks
pub fn build_function_cfg(func: &mut IrFunction) -> Result<(), CfgError> {
    func.blocks = build_cfg(&func.name, &func.quads)?;
    debug!(
        "built CFG for '{}': {} blocks, {} edges",
        func.name,
        func.block_count(),
        func.edge_count()
    );
    Ok(())
}

/// Partition `quads` into basic blocks with predecessor and successor edges
pub fn build_cfg(function: &str, quads: &QuadList) -> Result<Vec<BasicBlock>, CfgError> {
    let mut blocks = discover_blocks(quads);
    let labels = index_labels(&blocks, quads);
    link_edges(function, &mut blocks, quads, &labels)?;
    Ok(blocks)
}

/// Single forward pass splitting the list into blocks
fn discover_blocks(quads: &QuadList) -> Vec<BasicBlock> {
    let list = quads.as_slice();
    let mut blocks = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < list.len() {
        let op = list[i].op;
        if op.is_cond_branch() && list.get(i + 1).is_some_and(|q| q.op == QuadOp::Goto) {
            i += 1;
        }

        let ends_here = op.is_terminator()
            || list.get(i + 1).map_or(true, |q| q.op == QuadOp::Label);
        if ends_here {
            let id = BasicBlockId(blocks.len() as u32);
            trace!("{}: q{}..=q{}", id, start, i);
            blocks.push(BasicBlock::new(id, QuadId(start as u32), QuadId(i as u32)));
            start = i + 1;
        }
        i += 1;
    }

    blocks
}

/// Map each label to the block it starts
fn index_labels(blocks: &[BasicBlock], quads: &QuadList) -> FxHashMap<Label, BasicBlockId> {
    blocks
        .iter()
        .filter_map(|block| {
            quads
                .get(block.first)
                .and_then(|q| q.defined_label())
                .map(|label| (label, block.id))
        })
        .collect()
}

fn link_edges(
    function: &str,
    blocks: &mut [BasicBlock],
    quads: &QuadList,
    labels: &FxHashMap<Label, BasicBlockId>,
) -> Result<(), CfgError> {
    let lookup = |label: Label| {
        labels
            .get(&label)
            .copied()
            .ok_or_else(|| CfgError::UndefinedLabel {
                label,
                function: function.to_string(),
            })
    };

    let count = blocks.len();
    let mut edges: Vec<(BasicBlockId, BasicBlockId)> = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        let next = (index + 1 < count).then(|| BasicBlockId(index as u32 + 1));
        let window = block.quads(quads);
        let exit = match window.last() {
            Some(quad) => quad,
            None => continue,
        };

        match exit.op {
            QuadOp::Goto => {
                // Taken edge of a paired conditional branch first
                if let [.., branch, _] = window {
                    if branch.op.is_cond_branch() {
                        if let Some(label) = branch.target_label() {
                            edges.push((block.id, lookup(label)?));
                        }
                    }
                }
                if let Some(label) = exit.target_label() {
                    edges.push((block.id, lookup(label)?));
                }
            }
            op if op.is_cond_branch() => {
                if let Some(label) = exit.target_label() {
                    edges.push((block.id, lookup(label)?));
                }
                if let Some(next) = next {
                    edges.push((block.id, next));
                }
            }
            QuadOp::Return => {}
            _ => {
                if let Some(next) = next {
                    edges.push((block.id, next));
                }
            }
        }
    }

    for (from, to) in edges {
        blocks[from.0 as usize].add_succ(to);
        blocks[to.0 as usize].add_pred(from);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::{Operand, Quad};
    use crate::parser::checker::SymbolId;

    fn list(quads: Vec<Quad>) -> QuadList {
        let mut list = QuadList::new();
        for quad in quads {
            list.push(quad);
        }
        list
    }

    fn v(n: u32) -> Operand {
        Operand::Variable(SymbolId(n))
    }

    fn succs(blocks: &[BasicBlock], i: usize) -> Vec<u32> {
        blocks[i].succs.iter().map(|b| b.0).collect()
    }

    #[test]
    fn test_straight_line_is_one_block() {
        let quads = list(vec![
            Quad::enter(SymbolId(0)),
            Quad::copy(Operand::int(1, 4), v(1)),
            Quad::ret(Some(v(1))),
        ]);
        let blocks = build_cfg("f", &quads).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!((blocks[0].first, blocks[0].last), (QuadId(0), QuadId(2)));
        assert!(blocks[0].succs.is_empty());
    }

    #[test]
    fn test_paired_branch_forms_two_way_exit() {
        let quads = list(vec![
            Quad::enter(SymbolId(0)),
            Quad::branch(QuadOp::IfEq, v(1), Operand::int(0, 4), Label(0)),
            Quad::goto(Label(1)),
            Quad::label(Label(0)),
            Quad::ret(None),
            Quad::label(Label(1)),
            Quad::ret(None),
        ]);
        let blocks = build_cfg("f", &quads).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].last, QuadId(2));
        assert_eq!(succs(&blocks, 0), vec![1, 2]);
        assert!(blocks[1].succs.is_empty());
        assert!(blocks[2].succs.is_empty());
        assert_eq!(blocks[2].preds, vec![BasicBlockId(0)]);
    }

    #[test]
    fn test_unpaired_branch_falls_through() {
        let quads = list(vec![
            Quad::enter(SymbolId(0)),
            Quad::branch(QuadOp::IfLt, v(1), v(2), Label(0)),
            Quad::copy(v(1), v(2)),
            Quad::label(Label(0)),
            Quad::ret(None),
        ]);
        let blocks = build_cfg("f", &quads).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(succs(&blocks, 0), vec![2, 1]);
        assert_eq!(succs(&blocks, 1), vec![2]);
        assert_eq!(blocks[2].preds.len(), 2);
    }

    #[test]
    fn test_label_starts_block_and_fallthrough_links() {
        let quads = list(vec![
            Quad::enter(SymbolId(0)),
            Quad::label(Label(5)),
            Quad::copy(v(1), v(2)),
            Quad::goto(Label(5)),
        ]);
        let blocks = build_cfg("f", &quads).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(succs(&blocks, 0), vec![1]);
        assert_eq!(succs(&blocks, 1), vec![1]);
        assert_eq!(blocks[1].preds, vec![BasicBlockId(0), BasicBlockId(1)]);
    }

    #[test]
    fn test_undefined_label() {
        let quads = list(vec![Quad::enter(SymbolId(0)), Quad::goto(Label(7))]);
        let err = build_cfg("f", &quads).unwrap_err();
        assert_eq!(
            err,
            CfgError::UndefinedLabel {
                label: Label(7),
                function: "f".to_string()
            }
        );
        assert_eq!(err.to_string(), "branch to undefined label __L7__ in function 'f'");
    }
}
