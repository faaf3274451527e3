//! Middle end: quad IR, lowering from the checked AST, and CFG construction.
//!
//! # Example
//!
//! ```ignore
//! use quadc_engine::compiler::lower::Lowerer;
//!
//! let module = Lowerer::new(&interner, &checked.types, &mut checked.symbols, &checked.analysis)
//!     .lower_program(&program)?;
//! ```

pub mod cfg;
pub mod ir;
pub mod lower;

pub use cfg::{build_cfg, build_function_cfg, CfgError};
pub use ir::{BasicBlock, BasicBlockId, IrFunction, IrModule, Label, Operand, Quad, QuadId, QuadList, QuadOp};
pub use lower::{LValue, LowerError, LowerOptions, Lowerer};
