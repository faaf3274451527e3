//! Quad IR
//!
//! The IR sits between the checked AST and a back end. It is three-address
//! code ("quads") kept as one flat list per function, later partitioned into
//! basic blocks by the CFG builder.
//!
//! # Structure
//!
//! - `IrModule` - globals plus functions of one compilation unit
//! - `IrFunction` - a function's quad list and basic blocks
//! - `BasicBlock` - a window into the quad list with edges
//! - `Quad` - one three-address operation
//! - `Operand` - constants, variables, labels and type tags

pub mod block;
pub mod function;
pub mod module;
pub mod operand;
pub mod pretty;
pub mod quad;
pub mod report;

pub use block::{BasicBlock, BasicBlockId};
pub use function::IrFunction;
pub use module::{FunctionId, IrModule};
pub use operand::{Label, Operand};
pub use pretty::{format_quad, Cfg, PrettyPrint, PrintContext};
pub use quad::{Quad, QuadId, QuadList, QuadOp};
pub use report::{BlockReport, CfgReport, FunctionReport};
