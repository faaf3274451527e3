//! Type checker
//!
//! Walks the AST once in source order. Names must be declared before use.
//! Results are recorded in an [`Analysis`] keyed by [`NodeId`]:
//! - the type of every expression,
//! - the symbol every identifier, declarator, parameter and function binds to,
//! - implicit casts (int/char conversions, array decay),
//! - the scope opened by every function and block.

use super::error::CheckError;
use super::symbols::{ScopeId, ScopeKind, SymbolId, SymbolKind, SymbolTable};
use crate::parser::ast::*;
use crate::parser::interner::Interner;
use crate::parser::types::{Type, TypeContext, TypeId};
use crate::parser::Span;
use log::debug;
use rustc_hash::FxHashMap;

/// An implicit conversion applied to an expression's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coercion {
    pub from: TypeId,
    pub to: TypeId,
}

/// Side tables produced by the checker
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    expr_types: FxHashMap<NodeId, TypeId>,
    bindings: FxHashMap<NodeId, SymbolId>,
    coercions: FxHashMap<NodeId, Coercion>,
    scopes: FxHashMap<NodeId, ScopeId>,
    constants: FxHashMap<NodeId, i64>,
}

impl Analysis {
    /// Type of an expression before any coercion
    pub fn type_of(&self, id: NodeId) -> Option<TypeId> {
        self.expr_types.get(&id).copied()
    }

    /// Symbol bound by an identifier, call, declarator, parameter or function
    pub fn binding(&self, id: NodeId) -> Option<SymbolId> {
        self.bindings.get(&id).copied()
    }

    pub fn coercion(&self, id: NodeId) -> Option<Coercion> {
        self.coercions.get(&id).copied()
    }

    /// Scope opened by a function or block
    pub fn scope_of(&self, id: NodeId) -> Option<ScopeId> {
        self.scopes.get(&id).copied()
    }

    /// Folded initializer of a global declarator
    pub fn constant(&self, id: NodeId) -> Option<i64> {
        self.constants.get(&id).copied()
    }

    pub fn coercion_count(&self) -> usize {
        self.coercions.len()
    }
}

/// Everything the checker hands to lowering
#[derive(Debug, Clone)]
pub struct CheckOutput {
    pub types: TypeContext,
    pub symbols: SymbolTable,
    pub analysis: Analysis,
}

/// Type checker
pub struct TypeChecker<'a> {
    interner: &'a Interner,
    types: TypeContext,
    symbols: SymbolTable,
    analysis: Analysis,
    /// Innermost open scope
    scope: ScopeId,
    /// Return type of the function being checked
    return_type: TypeId,
    /// First prototype site of every function, for the undefined-prototype check
    prototypes: Vec<(SymbolId, Span)>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        let symbols = SymbolTable::new();
        let scope = symbols.global_scope();
        Self {
            interner,
            types: TypeContext::new(),
            symbols,
            analysis: Analysis::default(),
            scope,
            return_type: TypeContext::VOID,
            prototypes: Vec::new(),
        }
    }

    /// Check a whole program.
    pub fn check(mut self, program: &Program) -> Result<CheckOutput, CheckError> {
        for item in &program.items {
            match item {
                Item::Function(func) => self.check_function(func)?,
                Item::Global(decl) => self.check_var_decl(decl, SymbolKind::Global)?,
            }
        }

        for &(sym, span) in &self.prototypes {
            let entry = self.symbols.get(sym);
            if !entry.is_extern && !entry.is_defined {
                return Err(CheckError::UndefinedPrototype {
                    name: entry.name.clone(),
                    span,
                });
            }
        }

        Ok(CheckOutput {
            types: self.types,
            symbols: self.symbols,
            analysis: self.analysis,
        })
    }

    fn name(&self, ident: &Identifier) -> &'a str {
        self.interner.resolve(ident.name)
    }

    fn display(&self, ty: TypeId) -> String {
        self.types.display(ty)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn check_function(&mut self, func: &FunctionDecl) -> Result<(), CheckError> {
        let name = self.name(&func.name);
        let ret = self.types.resolve_type_expr(&func.return_type, 0);

        let mut param_types = Vec::with_capacity(func.params.len());
        for param in &func.params {
            param_types.push(self.param_type(param)?);
        }
        let fn_type = self.types.function(ret, param_types.clone());

        let global = self.symbols.global_scope();
        let sym = match self.symbols.lookup_local(global, name) {
            Some(existing) => {
                let entry = self.symbols.get(existing);
                if entry.kind != SymbolKind::Function {
                    return Err(CheckError::DuplicateSymbol {
                        name: name.to_string(),
                        original: entry.span,
                        duplicate: func.name.span,
                    });
                }
                if entry.ty != fn_type {
                    return Err(CheckError::ConflictingDeclaration {
                        name: name.to_string(),
                        span: func.name.span,
                    });
                }
                if entry.is_defined && func.body.is_some() {
                    return Err(CheckError::FunctionRedefinition {
                        name: name.to_string(),
                        original: entry.span,
                        duplicate: func.name.span,
                    });
                }
                existing
            }
            None => self.symbols.define(
                global,
                name,
                SymbolKind::Function,
                fn_type,
                func.name.span,
            )?,
        };

        {
            let entry = self.symbols.get_mut(sym);
            entry.is_extern |= func.is_extern;
            if func.body.is_some() {
                entry.is_defined = true;
                entry.span = func.name.span;
            }
        }
        self.analysis.bindings.insert(func.id, sym);

        let body = match &func.body {
            Some(body) => body,
            None => {
                if !self.prototypes.iter().any(|(s, _)| *s == sym) {
                    self.prototypes.push((sym, func.span));
                }
                return Ok(());
            }
        };

        let fn_scope = self.symbols.push_scope(ScopeKind::Function, global);
        self.analysis.scopes.insert(func.id, fn_scope);
        for (param, ty) in func.params.iter().zip(param_types) {
            let param_name = self.name(&param.name);
            let param_sym = self.symbols.define(
                fn_scope,
                param_name,
                SymbolKind::Param,
                ty,
                param.name.span,
            )?;
            self.analysis.bindings.insert(param.id, param_sym);
        }

        // Parameters and the outermost body locals share one scope
        self.analysis.scopes.insert(body.id, fn_scope);
        self.scope = fn_scope;
        self.return_type = ret;

        let result = body
            .statements
            .iter()
            .try_for_each(|stmt| self.check_statement(stmt));

        self.scope = global;
        debug!("checked function '{}'", name);
        result
    }

    fn param_type(&mut self, param: &Parameter) -> Result<TypeId, CheckError> {
        let ty = self.types.resolve_type_expr(&param.ty, 0);
        if param.is_array {
            return Ok(self.types.pointer_to(ty));
        }
        if self.types.is_void(ty) {
            return Err(CheckError::VoidVariable {
                name: self.name(&param.name).to_string(),
                span: param.span,
            });
        }
        Ok(ty)
    }

    fn check_var_decl(&mut self, decl: &VarDecl, kind: SymbolKind) -> Result<(), CheckError> {
        for d in &decl.declarators {
            let name = self.name(&d.name);
            let mut ty = self.types.resolve_type_expr(&decl.ty, d.pointer_depth);
            if self.types.is_void(ty) {
                return Err(CheckError::VoidVariable {
                    name: name.to_string(),
                    span: d.span,
                });
            }
            if let Some(len) = d.array_len {
                ty = self.types.array_of(ty, len);
            }

            let sym = self.symbols.define(self.scope, name, kind, ty, d.name.span)?;
            self.analysis.bindings.insert(d.id, sym);

            let init = match &d.init {
                Some(init) => init,
                None => continue,
            };
            if d.array_len.is_some() {
                return Err(CheckError::ArrayInitializer {
                    name: name.to_string(),
                    span: init.span,
                });
            }

            if kind == SymbolKind::Global {
                let value = constant_value(init).ok_or_else(|| CheckError::NonConstantInitializer {
                    name: name.to_string(),
                    span: init.span,
                })?;
                self.analysis.constants.insert(d.id, value);
            }

            let init_ty = self.check_value(init)?;
            self.coerce(init, init_ty, ty)?;
        }
        Ok(())
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn check_statement(&mut self, stmt: &Statement) -> Result<(), CheckError> {
        match stmt {
            Statement::Block(block) => {
                let outer = self.scope;
                let inner = self.symbols.push_scope(ScopeKind::Block, outer);
                self.analysis.scopes.insert(block.id, inner);
                self.scope = inner;
                let result = block
                    .statements
                    .iter()
                    .try_for_each(|stmt| self.check_statement(stmt));
                self.scope = outer;
                result
            }
            Statement::VarDecl(decl) => self.check_var_decl(decl, SymbolKind::Local),
            Statement::If(s) => {
                self.check_condition(&s.condition)?;
                self.check_statement(&s.then_branch)?;
                if let Some(else_branch) = &s.else_branch {
                    self.check_statement(else_branch)?;
                }
                Ok(())
            }
            Statement::While(s) => {
                self.check_condition(&s.condition)?;
                self.check_statement(&s.body)
            }
            Statement::For(s) => {
                if let Some(init) = &s.init {
                    self.check_expression(init)?;
                }
                if let Some(cond) = &s.condition {
                    self.check_condition(cond)?;
                }
                if let Some(update) = &s.update {
                    self.check_expression(update)?;
                }
                self.check_statement(&s.body)
            }
            Statement::Return(s) => self.check_return(s),
            Statement::Expression(s) => self.check_expression(&s.expression).map(|_| ()),
            Statement::Empty(_) => Ok(()),
        }
    }

    fn check_return(&mut self, stmt: &ReturnStatement) -> Result<(), CheckError> {
        let expected = self.return_type;
        match &stmt.value {
            Some(value) => {
                if self.types.is_void(expected) {
                    let actual = self.check_expression(value)?;
                    return Err(CheckError::ReturnMismatch {
                        expected: self.display(expected),
                        actual: self.display(actual),
                        span: stmt.span,
                    });
                }
                let actual = self.check_value(value)?;
                self.coerce(value, actual, expected).map_err(|_| CheckError::ReturnMismatch {
                    expected: self.display(expected),
                    actual: self.display(actual),
                    span: stmt.span,
                })
            }
            None if self.types.is_void(expected) => Ok(()),
            None => Err(CheckError::ReturnMismatch {
                expected: self.display(expected),
                actual: "void".to_string(),
                span: stmt.span,
            }),
        }
    }

    fn check_condition(&mut self, cond: &Expression) -> Result<(), CheckError> {
        let ty = self.check_value(cond)?;
        if !self.types.is_scalar(ty) {
            return Err(CheckError::NonScalarCondition {
                ty: self.display(ty),
                span: cond.span,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Check an expression used for its value: arrays decay to pointers and
    /// void is rejected. Returns the type after decay.
    fn check_value(&mut self, expr: &Expression) -> Result<TypeId, CheckError> {
        let ty = self.check_expression(expr)?;
        if self.types.is_void(ty) {
            return Err(CheckError::VoidValue { span: expr.span });
        }
        if let Type::Array { element, .. } = *self.types.get(ty) {
            let decayed = self.types.pointer_to(element);
            self.analysis
                .coercions
                .insert(expr.id, Coercion { from: ty, to: decayed });
            return Ok(decayed);
        }
        Ok(ty)
    }

    /// Convert an already checked value of type `from` to `to`.
    fn coerce(&mut self, expr: &Expression, from: TypeId, to: TypeId) -> Result<(), CheckError> {
        if from == to {
            return Ok(());
        }
        if self.types.is_integer(from) && self.types.is_integer(to) {
            self.analysis.coercions.insert(expr.id, Coercion { from, to });
            return Ok(());
        }
        Err(CheckError::TypeMismatch {
            expected: self.display(to),
            actual: self.display(from),
            span: expr.span,
        })
    }

    /// Check an integer operand and widen it to `int`.
    fn check_int_operand(&mut self, expr: &Expression, op: &str) -> Result<TypeId, CheckError> {
        let ty = self.check_value(expr)?;
        if !self.types.is_integer(ty) {
            return Err(self.invalid_operand(op, ty, expr.span));
        }
        self.coerce(expr, ty, TypeContext::INT)?;
        Ok(TypeContext::INT)
    }

    fn invalid_operand(&self, op: &str, ty: TypeId, span: Span) -> CheckError {
        CheckError::InvalidOperand {
            op: op.to_string(),
            ty: self.display(ty),
            span,
        }
    }

    fn check_expression(&mut self, expr: &Expression) -> Result<TypeId, CheckError> {
        let ty = self.check_expression_kind(expr)?;
        self.analysis.expr_types.insert(expr.id, ty);
        Ok(ty)
    }

    fn check_expression_kind(&mut self, expr: &Expression) -> Result<TypeId, CheckError> {
        match &expr.kind {
            ExprKind::IntLiteral(_) => Ok(TypeContext::INT),
            ExprKind::CharLiteral(_) => Ok(TypeContext::CHAR),
            ExprKind::StringLiteral(_) => Ok(self.types.pointer_to(TypeContext::CHAR)),

            ExprKind::Identifier(name) => {
                let text = self.interner.resolve(*name);
                let sym = self.symbols.resolve(self.scope, text).ok_or_else(|| {
                    CheckError::UndefinedName {
                        name: text.to_string(),
                        span: expr.span,
                    }
                })?;
                let entry = self.symbols.get(sym);
                if entry.kind == SymbolKind::Function {
                    return Err(CheckError::FunctionAsValue {
                        name: text.to_string(),
                        span: expr.span,
                    });
                }
                self.analysis.bindings.insert(expr.id, sym);
                Ok(entry.ty)
            }

            ExprKind::Unary { op, operand } => match op {
                UnaryOperator::Negate => self.check_int_operand(operand, op.symbol()),
                UnaryOperator::Not => {
                    let ty = self.check_value(operand)?;
                    if !self.types.is_scalar(ty) {
                        return Err(self.invalid_operand(op.symbol(), ty, operand.span));
                    }
                    Ok(TypeContext::INT)
                }
                UnaryOperator::Deref => {
                    let ty = self.check_value(operand)?;
                    match self.types.pointee(ty) {
                        Some(inner) if !self.types.is_void(inner) => Ok(inner),
                        _ => Err(self.invalid_operand(op.symbol(), ty, operand.span)),
                    }
                }
                UnaryOperator::AddrOf => {
                    let ty = self.check_expression(operand)?;
                    if self.types.is_void(ty) {
                        return Err(CheckError::VoidValue { span: operand.span });
                    }
                    Ok(self.types.pointer_to(ty))
                }
            },

            ExprKind::IncDec { op, operand } => {
                let ty = self.check_expression(operand)?;
                if !self.types.is_integer(ty) && !self.types.is_pointer(ty) {
                    return Err(self.invalid_operand(op.symbol(), ty, operand.span));
                }
                Ok(ty)
            }

            ExprKind::Binary { op, left, right } => self.check_binary(*op, left, right),

            ExprKind::Relational { op, left, right } => {
                let lt = self.check_value(left)?;
                let rt = self.check_value(right)?;
                if self.types.is_integer(lt) && self.types.is_integer(rt) {
                    if lt != rt {
                        self.coerce(left, lt, TypeContext::INT)?;
                        self.coerce(right, rt, TypeContext::INT)?;
                    }
                } else if self.types.is_pointer(lt) && lt == rt {
                    // pointers of the same type compare directly
                } else if !self.types.is_scalar(lt) {
                    return Err(self.invalid_operand(op.symbol(), lt, left.span));
                } else {
                    return Err(CheckError::TypeMismatch {
                        expected: self.display(lt),
                        actual: self.display(rt),
                        span: right.span,
                    });
                }
                Ok(TypeContext::INT)
            }

            ExprKind::Logical { op, left, right } => {
                for side in [left, right] {
                    let ty = self.check_value(side)?;
                    if !self.types.is_scalar(ty) {
                        return Err(self.invalid_operand(op.symbol(), ty, side.span));
                    }
                }
                Ok(TypeContext::INT)
            }

            ExprKind::Assign { op, target, value } => {
                let target_ty = self.check_expression(target)?;
                if !self.types.is_scalar(target_ty) {
                    return Err(self.invalid_operand("=", target_ty, target.span));
                }

                let value_ty = self.check_value(value)?;
                match op {
                    Some(BinaryOperator::Add | BinaryOperator::Subtract)
                        if self.types.is_pointer(target_ty) =>
                    {
                        if !self.types.is_integer(value_ty) {
                            return Err(self.invalid_operand("+=", value_ty, value.span));
                        }
                        self.coerce(value, value_ty, TypeContext::INT)?;
                    }
                    Some(bin) => {
                        if !self.types.is_integer(target_ty) {
                            return Err(self.invalid_operand(bin.symbol(), target_ty, target.span));
                        }
                        if !self.types.is_integer(value_ty) {
                            return Err(self.invalid_operand(bin.symbol(), value_ty, value.span));
                        }
                        self.coerce(value, value_ty, target_ty)?;
                    }
                    None => self.coerce(value, value_ty, target_ty)?,
                }
                Ok(target_ty)
            }

            ExprKind::Index { base, index } => {
                let base_ty = self.check_value(base)?;
                let elem = match self.types.pointee(base_ty) {
                    Some(elem) if !self.types.is_void(elem) => elem,
                    _ => return Err(self.invalid_operand("[]", base_ty, base.span)),
                };
                self.check_int_operand(index, "[]")?;
                Ok(elem)
            }

            ExprKind::Call { callee, args } => {
                let text = self.name(callee);
                let sym = self.symbols.resolve(self.scope, text).ok_or_else(|| {
                    CheckError::UndefinedName {
                        name: text.to_string(),
                        span: callee.span,
                    }
                })?;
                let sig = match self.types.function_signature(self.symbols.get(sym).ty) {
                    Some(sig) => sig.clone(),
                    None => {
                        return Err(CheckError::NotAFunction {
                            name: text.to_string(),
                            span: callee.span,
                        })
                    }
                };
                if sig.params.len() != args.len() {
                    return Err(CheckError::ArgumentCount {
                        name: text.to_string(),
                        expected: sig.params.len(),
                        actual: args.len(),
                        span: expr.span,
                    });
                }
                for (arg, &param_ty) in args.iter().zip(&sig.params) {
                    let arg_ty = self.check_value(arg)?;
                    self.coerce(arg, arg_ty, param_ty)?;
                }
                self.analysis.bindings.insert(expr.id, sym);
                Ok(sig.ret)
            }
        }
    }

    fn check_binary(
        &mut self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> Result<TypeId, CheckError> {
        let lt = self.check_value(left)?;
        let rt = self.check_value(right)?;
        let lp = self.types.is_pointer(lt);
        let rp = self.types.is_pointer(rt);

        match op {
            BinaryOperator::Add if lp || rp => {
                let (ptr, other, other_ty) = if lp { (lt, right, rt) } else { (rt, left, lt) };
                if !self.types.is_integer(other_ty) {
                    return Err(self.invalid_operand(op.symbol(), other_ty, other.span));
                }
                self.coerce(other, other_ty, TypeContext::INT)?;
                Ok(ptr)
            }
            BinaryOperator::Subtract if lp && rp => {
                if lt != rt {
                    return Err(CheckError::TypeMismatch {
                        expected: self.display(lt),
                        actual: self.display(rt),
                        span: right.span,
                    });
                }
                Ok(TypeContext::INT)
            }
            BinaryOperator::Subtract if lp => {
                if !self.types.is_integer(rt) {
                    return Err(self.invalid_operand(op.symbol(), rt, right.span));
                }
                self.coerce(right, rt, TypeContext::INT)?;
                Ok(lt)
            }
            _ => {
                for (side, ty) in [(left, lt), (right, rt)] {
                    if !self.types.is_integer(ty) {
                        return Err(self.invalid_operand(op.symbol(), ty, side.span));
                    }
                    self.coerce(side, ty, TypeContext::INT)?;
                }
                Ok(TypeContext::INT)
            }
        }
    }
}

/// Fold a global initializer: an integer or character literal, optionally negated.
fn constant_value(expr: &Expression) -> Option<i64> {
    match &expr.kind {
        ExprKind::IntLiteral(v) => Some(*v),
        ExprKind::CharLiteral(c) => Some(*c as i64),
        ExprKind::Unary {
            op: UnaryOperator::Negate,
            operand,
        } => constant_value(operand).map(|v| v.wrapping_neg()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn check(source: &str) -> Result<(Program, CheckOutput), CheckError> {
        let (program, interner) = Parser::new(source).unwrap().parse().unwrap();
        let output = TypeChecker::new(&interner).check(&program)?;
        Ok((program, output))
    }

    fn check_err(source: &str) -> CheckError {
        match check(source) {
            Ok(_) => panic!("expected a check error for {:?}", source),
            Err(err) => err,
        }
    }

    fn body(program: &Program, index: usize) -> &Block {
        program.functions().nth(index).unwrap().body.as_ref().unwrap()
    }

    #[test]
    fn test_binds_identifiers_to_innermost_symbol() {
        let (program, out) = check("int x; int f(int x) { { int x; x = 1; } return x; }").unwrap();
        let block = body(&program, 0);

        let inner_assign = match &block.statements[0] {
            Statement::Block(b) => match &b.statements[1] {
                Statement::Expression(e) => &e.expression,
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        };
        let target = match &inner_assign.kind {
            ExprKind::Assign { target, .. } => target,
            other => panic!("unexpected {:?}", other),
        };
        let sym = out.analysis.binding(target.id).unwrap();
        assert_eq!(out.symbols.get(sym).kind, SymbolKind::Local);

        let ret = match &block.statements[1] {
            Statement::Return(r) => r.value.as_ref().unwrap(),
            other => panic!("unexpected {:?}", other),
        };
        let sym = out.analysis.binding(ret.id).unwrap();
        assert_eq!(out.symbols.get(sym).kind, SymbolKind::Param);
    }

    #[test]
    fn test_char_arithmetic_is_promoted() {
        let (program, out) = check("int f(char a, char b) { return a + b; }").unwrap();
        let ret = match &body(&program, 0).statements[0] {
            Statement::Return(r) => r.value.as_ref().unwrap(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(out.analysis.type_of(ret.id), Some(TypeContext::INT));
        match &ret.kind {
            ExprKind::Binary { left, right, .. } => {
                let c = out.analysis.coercion(left.id).unwrap();
                assert_eq!((c.from, c.to), (TypeContext::CHAR, TypeContext::INT));
                assert!(out.analysis.coercion(right.id).is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_array_decays_in_value_context() {
        let (program, out) = check("int f() { int a[4]; int *p; p = a; return *p; }").unwrap();
        let assign = match &body(&program, 0).statements[2] {
            Statement::Expression(e) => &e.expression,
            other => panic!("unexpected {:?}", other),
        };
        let value = match &assign.kind {
            ExprKind::Assign { value, .. } => value,
            other => panic!("unexpected {:?}", other),
        };
        let c = out.analysis.coercion(value.id).unwrap();
        assert!(out.types.is_array(c.from));
        assert_eq!(out.types.display(c.to), "int*");
    }

    #[test]
    fn test_global_constants_are_folded() {
        let (program, out) = check("int a = -5; char c = 'x';").unwrap();
        let ids: Vec<NodeId> = program
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Global(decl) => Some(decl.declarators[0].id),
                _ => None,
            })
            .collect();
        assert_eq!(out.analysis.constant(ids[0]), Some(-5));
        assert_eq!(out.analysis.constant(ids[1]), Some('x' as i64));
    }

    #[test]
    fn test_function_scopes_are_recorded() {
        let (program, out) = check("int f(int n) { return n; }").unwrap();
        let func = program.functions().next().unwrap();
        let scope = out.analysis.scope_of(func.id).unwrap();
        assert_eq!(out.analysis.scope_of(body(&program, 0).id), Some(scope));
        assert_eq!(out.symbols.variables_in(scope).count(), 1);
    }

    #[test]
    fn test_prototype_then_definition() {
        assert!(check("int f(int n); int g() { return f(1); } int f(int n) { return n; }").is_ok());
        assert!(check("extern int puts(char *s); int main() { puts(\"hi\"); return 0; }").is_ok());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(check_err("int f() { return y; }"), CheckError::UndefinedName { .. }));
        assert!(matches!(check_err("int x; int x;"), CheckError::DuplicateSymbol { .. }));
        assert!(matches!(check_err("int x; int f() { return x(); }"), CheckError::NotAFunction { .. }));
        assert!(matches!(
            check_err("int g(int a) { return a; } int f() { return g(); }"),
            CheckError::ArgumentCount { expected: 1, actual: 0, .. }
        ));
        assert!(matches!(
            check_err("int f() { int *p; p = 1; return 0; }"),
            CheckError::TypeMismatch { .. }
        ));
        assert!(matches!(
            check_err("void g() {} int f() { return g() + 1; }"),
            CheckError::VoidValue { .. }
        ));
        assert!(matches!(check_err("int f(int n);"), CheckError::UndefinedPrototype { .. }));
        assert!(matches!(
            check_err("int f() { return 1; } int f() { return 2; }"),
            CheckError::FunctionRedefinition { .. }
        ));
        assert!(matches!(
            check_err("int f(int n); char f(int n) { return 'a'; }"),
            CheckError::ConflictingDeclaration { .. }
        ));
        assert!(matches!(
            check_err("int y; int x = y;"),
            CheckError::NonConstantInitializer { .. }
        ));
        assert!(matches!(check_err("void f() { return 1; }"), CheckError::ReturnMismatch { .. }));
        assert!(matches!(check_err("int f() { return; }"), CheckError::ReturnMismatch { .. }));
        assert!(matches!(check_err("void f() { void x; }"), CheckError::VoidVariable { .. }));
        assert!(matches!(
            check_err("void g() {} void f() { if (g()) ; }"),
            CheckError::VoidValue { .. }
        ));
    }

    #[test]
    fn test_pointer_difference_is_accepted() {
        assert!(check("int f(int *a, int *b) { return a - b; }").is_ok());
        assert!(check("int *f(int *a, int n) { return n + a; }").is_ok());
    }
}
