//! Machine-readable CFG report
//!
//! A serde view of every function's blocks and edges, emitted as JSON by
//! the command-line driver.

use super::function::IrFunction;
use super::module::IrModule;
use super::pretty::{format_quad, PrintContext};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CfgReport {
    pub globals: Vec<String>,
    pub functions: Vec<FunctionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionReport {
    pub name: String,
    pub quad_count: usize,
    pub edge_count: usize,
    pub blocks: Vec<BlockReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    pub id: u32,
    /// Index of the first quad
    pub first: u32,
    /// Index of the last quad (inclusive)
    pub last: u32,
    pub quads: Vec<String>,
    pub preds: Vec<u32>,
    pub succs: Vec<u32>,
}

impl CfgReport {
    pub fn from_module(module: &IrModule, ctx: &PrintContext<'_>) -> Self {
        Self {
            globals: module.globals.iter().map(|q| format_quad(q, ctx)).collect(),
            functions: module
                .functions
                .iter()
                .map(|f| FunctionReport::from_function(f, ctx))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FunctionReport {
    pub fn from_function(func: &IrFunction, ctx: &PrintContext<'_>) -> Self {
        let blocks = func
            .blocks
            .iter()
            .map(|block| BlockReport {
                id: block.id.as_u32(),
                first: block.first.0,
                last: block.last.0,
                quads: block
                    .quads(&func.quads)
                    .iter()
                    .map(|q| format_quad(q, ctx))
                    .collect(),
                preds: block.preds.iter().map(|b| b.as_u32()).collect(),
                succs: block.succs.iter().map(|b| b.as_u32()).collect(),
            })
            .collect();

        Self {
            name: func.name.clone(),
            quad_count: func.quad_count(),
            edge_count: func.edge_count(),
            blocks,
        }
    }
}
