//! quadc engine
//!
//! A compiler front and middle end for a small C-like language: lexer,
//! parser, type checker, lowering to three-address quads, and per-function
//! control-flow graphs.
//!
//! # Example
//!
//! ```ignore
//! use quadc_engine::{compile, CompileOptions};
//!
//! let compilation = compile("int f() { return 1 + 2; }", &CompileOptions::default())?;
//! println!("{}", compilation.dump_cfg());
//! ```

pub mod compiler;
pub mod diagnostic;
pub mod parser;

pub use compiler::ir::{Cfg, CfgReport, PrettyPrint, PrintContext};
pub use compiler::{
    BasicBlock, BasicBlockId, CfgError, IrFunction, IrModule, Label, LowerError, LowerOptions,
    Lowerer, Operand, Quad, QuadId, QuadList, QuadOp,
};
pub use diagnostic::{create_files, Diagnostic};
pub use parser::{
    Analysis, CheckError, CheckOutput, Interner, LexError, ParseError, Parser, Span, SymbolTable,
    TypeChecker, TypeContext,
};

use log::debug;
use parser::ast::{AstPrinter, Program};
use thiserror::Error;

/// Any error that stops a compilation
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{} lexical error(s)", .0.len())]
    Lex(Vec<LexError>),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Lower(LowerError),

    #[error(transparent)]
    Cfg(#[from] CfgError),
}

impl From<Vec<LexError>> for CompileError {
    fn from(errors: Vec<LexError>) -> Self {
        CompileError::Lex(errors)
    }
}

impl From<LowerError> for CompileError {
    fn from(error: LowerError) -> Self {
        match error {
            LowerError::Cfg(cfg) => CompileError::Cfg(cfg),
            other => CompileError::Lower(other),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Partition each function into basic blocks
    pub build_cfg: bool,
    /// Append a return to functions that fall off their end
    pub implicit_return: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            build_cfg: true,
            implicit_return: true,
        }
    }
}

impl CompileOptions {
    pub fn with_cfg(mut self, build_cfg: bool) -> Self {
        self.build_cfg = build_cfg;
        self
    }

    pub fn with_implicit_return(mut self, implicit_return: bool) -> Self {
        self.implicit_return = implicit_return;
        self
    }

    pub fn lower_options(&self) -> LowerOptions {
        LowerOptions {
            implicit_return: self.implicit_return,
            build_cfg: self.build_cfg,
        }
    }
}

/// Result of a successful compilation
#[derive(Debug)]
pub struct Compilation {
    pub interner: Interner,
    pub program: Program,
    pub types: TypeContext,
    pub symbols: SymbolTable,
    pub analysis: Analysis,
    pub module: IrModule,
}

impl Compilation {
    pub fn print_context(&self) -> PrintContext<'_> {
        PrintContext::new(&self.symbols, &self.types)
    }

    /// Lowered function by name
    pub fn function(&self, name: &str) -> Option<&IrFunction> {
        self.module.get_function_by_name(name)
    }

    pub fn dump_ast(&self) -> String {
        AstPrinter::new(&self.interner).print_program(&self.program)
    }

    /// Flat quad listing of every global and function
    pub fn dump_ir(&self) -> String {
        self.module.pretty_print(&self.print_context())
    }

    /// Basic blocks with their edges
    pub fn dump_cfg(&self) -> String {
        Cfg(&self.module).pretty_print(&self.print_context())
    }

    pub fn cfg_report(&self) -> CfgReport {
        CfgReport::from_module(&self.module, &self.print_context())
    }
}

/// Run every stage on `source`, stopping at the first error
pub fn compile(source: &str, options: &CompileOptions) -> Result<Compilation, CompileError> {
    let (program, interner) = Parser::new(source)?.parse()?;
    let CheckOutput {
        types,
        mut symbols,
        analysis,
    } = TypeChecker::new(&interner).check(&program)?;

    let module = Lowerer::new(&interner, &types, &mut symbols, &analysis)
        .with_options(options.lower_options())
        .lower_program(&program)?;
    debug!(
        "compiled {} item(s) into {} quad(s)",
        program.items.len(),
        module.total_quad_count()
    );

    Ok(Compilation {
        interner,
        program,
        types,
        symbols,
        analysis,
        module,
    })
}
