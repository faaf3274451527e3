//! AST to IR Lowering
//!
//! Converts the checked AST into quads, one flat list per function, and
//! hands each finished list to the CFG builder.
//!
//! Lowering trusts the checker: every expression has a type and every name
//! a symbol in the [`Analysis`]. A missing entry is a [`LowerError::Internal`].

pub mod control_flow;
mod expr;
mod stmt;

pub use control_flow::{IfLabels, LabelMaker, LoopLabels};
pub use expr::LValue;

use crate::compiler::cfg::{build_function_cfg, CfgError};
use crate::compiler::ir::{IrFunction, IrModule, Operand, Quad, QuadId, QuadList, QuadOp};
use crate::parser::ast::{self, Expression, NodeId};
use crate::parser::checker::{Analysis, ScopeId, SymbolId, SymbolTable};
use crate::parser::{Interner, Span, TypeContext, TypeId};
use log::debug;
use thiserror::Error;

/// Lowering errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LowerError {
    /// Assignment target, `&` operand or `++`/`--` operand without storage
    #[error("expression is not assignable")]
    NotAnLvalue { span: Span },

    /// Construct the checker accepts but lowering does not cover
    #[error("lowering of {construct} is not implemented")]
    Unimplemented { construct: String, span: Span },

    #[error("internal lowering error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Cfg(#[from] CfgError),
}

impl LowerError {
    pub fn span(&self) -> Option<Span> {
        match self {
            LowerError::NotAnLvalue { span } | LowerError::Unimplemented { span, .. } => Some(*span),
            LowerError::Internal { .. } | LowerError::Cfg(_) => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LowerError::NotAnLvalue { .. } => "E3001",
            LowerError::Unimplemented { .. } => "E3002",
            LowerError::Internal { .. } => "E3003",
            LowerError::Cfg(_) => "E3004",
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        LowerError::Internal {
            message: message.into(),
        }
    }
}

/// Lowering configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerOptions {
    /// Append a return when the body does not end in one
    pub implicit_return: bool,
    /// Partition each function into basic blocks
    pub build_cfg: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            implicit_return: true,
            build_cfg: true,
        }
    }
}

/// Lowers one checked program
pub struct Lowerer<'a> {
    interner: &'a Interner,
    types: &'a TypeContext,
    /// Receives the temporaries lowering allocates
    symbols: &'a mut SymbolTable,
    analysis: &'a Analysis,
    options: LowerOptions,
    labels: LabelMaker,
    /// Quads of the function being lowered
    quads: QuadList,
    /// Innermost scope, owner of new temporaries
    scope: ScopeId,
}

impl<'a> Lowerer<'a> {
    /// Create a new lowerer
    pub fn new(
        interner: &'a Interner,
        types: &'a TypeContext,
        symbols: &'a mut SymbolTable,
        analysis: &'a Analysis,
    ) -> Self {
        let scope = symbols.global_scope();
        Self {
            interner,
            types,
            symbols,
            analysis,
            options: LowerOptions::default(),
            labels: LabelMaker::new(),
            quads: QuadList::new(),
            scope,
        }
    }

    /// Set lowering options
    pub fn with_options(mut self, options: LowerOptions) -> Self {
        self.options = options;
        self
    }

    /// Lower a whole program: globals first, then functions, each in source order
    pub fn lower_program(mut self, program: &ast::Program) -> Result<IrModule, LowerError> {
        let mut module = IrModule::new();

        for item in &program.items {
            if let ast::Item::Global(decl) = item {
                self.lower_global(decl, &mut module)?;
            }
        }

        for func in program.functions() {
            if let Some(ir) = self.lower_function(func)? {
                module.add_function(ir);
            }
        }

        debug!(
            "lowered {} function(s), {} label(s), {} temporaries",
            module.function_count(),
            self.labels.count(),
            self.symbols.temp_count()
        );
        Ok(module)
    }

    fn lower_global(&mut self, decl: &ast::VarDecl, module: &mut IrModule) -> Result<(), LowerError> {
        for d in &decl.declarators {
            let sym = self.binding(d.id)?;
            let init = self.analysis.constant(d.id).map(|value| {
                let width = self.types.const_width(self.symbols.get(sym).ty);
                Operand::int(value, width)
            });
            module.add_global(Quad::global(sym, init));
        }
        Ok(())
    }

    /// Lower a function definition. Prototypes produce no IR.
    fn lower_function(&mut self, func: &ast::FunctionDecl) -> Result<Option<IrFunction>, LowerError> {
        let body = match &func.body {
            Some(body) => body,
            None => return Ok(None),
        };

        let name = self.interner.resolve(func.name.name);
        let symbol = self.binding(func.id)?;
        let scope = self
            .analysis
            .scope_of(func.id)
            .ok_or_else(|| LowerError::internal(format!("function '{}' has no scope", name)))?;
        let params = func
            .params
            .iter()
            .map(|p| self.binding(p.id))
            .collect::<Result<Vec<_>, _>>()?;
        let return_ty = self
            .types
            .function_signature(self.symbols.get(symbol).ty)
            .map(|sig| sig.ret)
            .ok_or_else(|| LowerError::internal(format!("'{}' has no function type", name)))?;

        self.quads = QuadList::new();
        self.scope = scope;
        self.emit(Quad::enter(symbol));

        for stmt in &body.statements {
            self.lower_statement(stmt)?;
        }

        if self.options.implicit_return && !self.ends_with(&[QuadOp::Return]) {
            let value = if self.types.is_void(return_ty) {
                None
            } else {
                Some(Operand::int(0, self.types.const_width(return_ty)))
            };
            self.emit(Quad::ret(value));
        }

        self.scope = self.symbols.global_scope();

        let mut ir = IrFunction::new(name, symbol, params, return_ty, scope);
        ir.quads = std::mem::take(&mut self.quads);
        debug!("lowered function '{}': {} quads", name, ir.quad_count());

        if self.options.build_cfg {
            build_function_cfg(&mut ir)?;
        }
        Ok(Some(ir))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn emit(&mut self, quad: Quad) -> QuadId {
        self.quads.push(quad)
    }

    /// Whether the last emitted quad has one of `ops`
    fn ends_with(&self, ops: &[QuadOp]) -> bool {
        self.quads.last().is_some_and(|q| ops.contains(&q.op))
    }

    fn new_temp(&mut self, ty: TypeId) -> SymbolId {
        self.symbols.new_temp(self.scope, ty)
    }

    fn binding(&self, id: NodeId) -> Result<SymbolId, LowerError> {
        self.analysis
            .binding(id)
            .ok_or_else(|| LowerError::internal(format!("node {} has no symbol", id.0)))
    }

    /// Type of an expression as the checker computed it, before coercion
    fn type_of(&self, expr: &Expression) -> Result<TypeId, LowerError> {
        self.analysis.type_of(expr.id).ok_or_else(|| {
            LowerError::internal(format!("expression at {} has no type", expr.span))
        })
    }

    /// Type of an expression's value after any coercion
    fn value_type(&self, expr: &Expression) -> Result<TypeId, LowerError> {
        match self.analysis.coercion(expr.id) {
            Some(coercion) => Ok(coercion.to),
            None => self.type_of(expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::{PrettyPrint, PrintContext};
    use crate::parser::{Parser, TypeChecker};

    fn lower_with(source: &str, options: LowerOptions) -> Result<String, LowerError> {
        let (program, interner) = Parser::new(source).unwrap().parse().unwrap();
        let mut checked = TypeChecker::new(&interner).check(&program).unwrap();
        let module = Lowerer::new(&interner, &checked.types, &mut checked.symbols, &checked.analysis)
            .with_options(options)
            .lower_program(&program)?;
        let ctx = PrintContext::new(&checked.symbols, &checked.types);
        Ok(module.pretty_print(&ctx))
    }

    fn lower(source: &str) -> String {
        lower_with(source, LowerOptions::default()).unwrap()
    }

    #[test]
    fn test_lower_literal_sum() {
        let expected = "\
fn f() -> int {
  enter f
  _t0 = 1
  _t1 = 2
  _t2 = _t0 + _t1
  return _t2
}
";
        assert_eq!(lower("int f() { return 1 + 2; }"), expected);
    }

    #[test]
    fn test_globals_come_first() {
        let out = lower("int g = 5; int f() { return g; } char c = -1, *p;");
        assert!(out.starts_with("global g = 5\nglobal c = -1\nglobal p\n\nfn f() -> int {\n"));
    }

    #[test]
    fn test_prototypes_produce_no_ir() {
        let out = lower("extern int puts(char *s); int main() { puts(\"hi\"); return 0; }");
        assert!(!out.contains("fn puts"));
        assert!(out.contains("_t0 = string \"hi\""));
        assert!(out.contains("param _t0"));
        assert!(out.contains("_t1 = call puts, 1"));
    }

    #[test]
    fn test_implicit_return() {
        let out = lower("void f() { } int g() { } char *h() { }");
        assert!(out.contains("fn f() -> void {\n  enter f\n  return\n}"));
        assert!(out.contains("fn g() -> int {\n  enter g\n  return 0\n}"));
        assert!(out.contains("fn h() -> char* {\n  enter h\n  return 0\n}"));

        let options = LowerOptions {
            implicit_return: false,
            build_cfg: false,
        };
        let out = lower_with("void f() { }", options).unwrap();
        assert_eq!(out, "fn f() -> void {\n  enter f\n}\n");
    }

    #[test]
    fn test_errors() {
        let err = lower_with("int f() { 1 = 2; return 0; }", LowerOptions::default()).unwrap_err();
        assert!(matches!(err, LowerError::NotAnLvalue { .. }));
        assert_eq!(err.code(), "E3001");

        let err = lower_with("int f(int *a, int *b) { return a - b; }", LowerOptions::default())
            .unwrap_err();
        assert!(matches!(err, LowerError::Unimplemented { .. }));
        assert!(err.span().is_some());
    }
}
