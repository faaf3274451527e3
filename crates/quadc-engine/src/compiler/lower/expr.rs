//! Expression Lowering
//!
//! Three entry points per expression:
//! - rvalue lowering yields the operand holding the value,
//! - lvalue lowering yields the storage location,
//! - condition lowering branches to a true or a false label without
//!   materializing a value.

use super::{LowerError, Lowerer};
use crate::compiler::ir::{Label, Operand, Quad, QuadOp};
use crate::parser::ast::*;
use crate::parser::{TypeContext, TypeId};

/// Storage location of an lvalue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LValue {
    /// A variable, written with `Copy`
    Direct(Operand),
    /// Memory behind a pointer, written with `LDeref`
    Indirect(Operand),
}

impl LValue {
    /// Operand naming the storage: the variable or the pointer
    pub fn location(&self) -> &Operand {
        match self {
            LValue::Direct(op) | LValue::Indirect(op) => op,
        }
    }

    /// Quad writing `value` into this location
    pub fn store(&self, value: Operand) -> Quad {
        match self {
            LValue::Direct(dest) => Quad::copy(value, dest.clone()),
            LValue::Indirect(ptr) => Quad::store(value, ptr.clone()),
        }
    }
}

impl<'a> Lowerer<'a> {
    /// Lower an expression for its value, applying the checker's coercion
    pub(super) fn lower_value(&mut self, expr: &Expression) -> Result<Operand, LowerError> {
        let place = self.lower_rvalue(expr)?;
        self.coerce(expr, place)
    }

    /// Lower an expression evaluated only for its side effects
    pub(super) fn lower_effect(&mut self, expr: &Expression) -> Result<(), LowerError> {
        match &expr.kind {
            ExprKind::Call { args, .. } => self.lower_call(expr, args).map(|_| ()),
            _ => self.lower_rvalue(expr).map(|_| ()),
        }
    }

    fn coerce(&mut self, expr: &Expression, place: Operand) -> Result<Operand, LowerError> {
        match self.analysis.coercion(expr.id) {
            Some(coercion) => {
                let temp = self.new_temp(coercion.to);
                self.emit(Quad::cast(place, coercion.to, temp));
                Ok(Operand::Variable(temp))
            }
            None => Ok(place),
        }
    }

    /// Lower an expression for its value, before coercion
    fn lower_rvalue(&mut self, expr: &Expression) -> Result<Operand, LowerError> {
        if expr.is_boolean() {
            return self.materialize_condition(expr);
        }

        match &expr.kind {
            ExprKind::IntLiteral(value) => self.lower_constant(expr, *value),
            ExprKind::CharLiteral(c) => self.lower_constant(expr, *c as i64),
            ExprKind::StringLiteral(text) => {
                let ty = self.type_of(expr)?;
                let temp = self.new_temp(ty);
                let text = self.interner.resolve(*text).to_string();
                self.emit(Quad::string(text, temp));
                Ok(Operand::Variable(temp))
            }
            ExprKind::Identifier(_) => Ok(Operand::Variable(self.binding(expr.id)?)),

            ExprKind::Unary { op, operand } => match op {
                UnaryOperator::Negate => {
                    let value = self.lower_value(operand)?;
                    let temp = self.new_temp(self.type_of(expr)?);
                    self.emit(Quad::unary(QuadOp::Neg, value, temp));
                    Ok(Operand::Variable(temp))
                }
                UnaryOperator::Deref => {
                    let ptr = self.lower_value(operand)?;
                    let temp = self.new_temp(self.type_of(expr)?);
                    self.emit(Quad::unary(QuadOp::RDeref, ptr, temp));
                    Ok(Operand::Variable(temp))
                }
                UnaryOperator::AddrOf => match self.lower_lvalue(operand)? {
                    LValue::Direct(var) => {
                        let temp = self.new_temp(self.type_of(expr)?);
                        self.emit(Quad::unary(QuadOp::AddrOf, var, temp));
                        Ok(Operand::Variable(temp))
                    }
                    LValue::Indirect(ptr) => Ok(ptr),
                },
                UnaryOperator::Not => self.materialize_condition(expr),
            },

            ExprKind::IncDec { op, operand } => self.lower_inc_dec(*op, operand),

            ExprKind::Binary { op, left, right } => {
                let lhs = self.lower_value(left)?;
                let rhs = self.lower_value(right)?;
                let lt = self.value_type(left)?;
                let rt = self.value_type(right)?;
                let ty = self.type_of(expr)?;
                self.lower_arithmetic(*op, (lhs, lt), (rhs, rt), ty, expr)
            }

            ExprKind::Relational { .. } | ExprKind::Logical { .. } => {
                self.materialize_condition(expr)
            }

            ExprKind::Assign { op: None, target, value } => {
                let location = self.lower_lvalue(target)?;
                let value = self.lower_value(value)?;
                self.emit(location.store(value.clone()));
                Ok(value)
            }

            ExprKind::Assign {
                op: Some(op),
                target,
                value,
            } => {
                // The target is lowered twice: once for its location, once for its value
                let location = self.lower_lvalue(target)?;
                let current = self.lower_rvalue(target)?;
                let rhs = self.lower_value(value)?;
                let ty = self.type_of(target)?;
                let rt = self.value_type(value)?;
                let result = self.lower_arithmetic(*op, (current, ty), (rhs, rt), ty, expr)?;
                self.emit(location.store(result.clone()));
                Ok(result)
            }

            ExprKind::Index { base, index } => {
                let ptr = self.lower_element_address(base, index)?;
                let temp = self.new_temp(self.type_of(expr)?);
                self.emit(Quad::unary(QuadOp::RDeref, ptr, temp));
                Ok(Operand::Variable(temp))
            }

            ExprKind::Call { args, .. } => self.lower_call(expr, args)?.ok_or_else(|| {
                LowerError::Internal {
                    message: format!("void call at {} used as a value", expr.span),
                }
            }),
        }
    }

    /// Fresh temporary holding a literal of the expression's type
    fn lower_constant(&mut self, expr: &Expression, value: i64) -> Result<Operand, LowerError> {
        let ty = self.type_of(expr)?;
        let temp = self.new_temp(ty);
        let width = self.types.const_width(ty);
        self.emit(Quad::copy(Operand::int(value, width), Operand::Variable(temp)));
        Ok(Operand::Variable(temp))
    }

    /// Emit one arithmetic operation into a fresh temporary of type `ty`.
    ///
    /// Pointer plus integer becomes `AddPtr` with the pointer first; pointer
    /// minus integer negates the offset first.
    fn lower_arithmetic(
        &mut self,
        op: BinaryOperator,
        (lhs, lt): (Operand, TypeId),
        (rhs, rt): (Operand, TypeId),
        ty: TypeId,
        expr: &Expression,
    ) -> Result<Operand, LowerError> {
        let lp = self.types.is_pointer(lt);
        let rp = self.types.is_pointer(rt);
        let temp = self.new_temp(ty);

        let quad = match op {
            BinaryOperator::Add if lp => Quad::binary(QuadOp::AddPtr, lhs, rhs, temp),
            BinaryOperator::Add if rp => Quad::binary(QuadOp::AddPtr, rhs, lhs, temp),
            BinaryOperator::Subtract if lp && rp => {
                return Err(LowerError::Unimplemented {
                    construct: "pointer difference".to_string(),
                    span: expr.span,
                })
            }
            BinaryOperator::Subtract if lp => {
                let offset = self.new_temp(rt);
                self.emit(Quad::unary(QuadOp::Neg, rhs, offset));
                Quad::binary(QuadOp::AddPtr, lhs, Operand::Variable(offset), temp)
            }
            _ => Quad::binary(arithmetic_op(op), lhs, rhs, temp),
        };
        self.emit(quad);
        Ok(Operand::Variable(temp))
    }

    /// `++`/`--` in both positions.
    ///
    /// Post-fix copies the current value into the result before the update;
    /// pre-fix copies the updated value after it.
    fn lower_inc_dec(
        &mut self,
        op: IncDecOperator,
        operand: &Expression,
    ) -> Result<Operand, LowerError> {
        let ty = self.type_of(operand)?;
        let location = self.lower_lvalue(operand)?;
        let current = self.lower_rvalue(operand)?;
        let step = if op.is_increment() { 1 } else { -1 };

        let result = self.new_temp(ty);
        if !op.is_prefix() {
            self.emit(Quad::copy(current.clone(), Operand::Variable(result)));
        }

        let updated = self.new_temp(ty);
        let quad = if self.types.is_pointer(ty) {
            let width = self.types.const_width(TypeContext::INT);
            Quad::binary(QuadOp::AddPtr, current, Operand::int(step, width), updated)
        } else {
            let width = self.types.const_width(ty);
            Quad::binary(QuadOp::Add, current, Operand::int(step, width), updated)
        };
        self.emit(quad);
        self.emit(location.store(Operand::Variable(updated)));

        if op.is_prefix() {
            self.emit(Quad::copy(Operand::Variable(updated), Operand::Variable(result)));
        }
        Ok(Operand::Variable(result))
    }

    /// Address of `base[index]` in a fresh pointer temporary
    fn lower_element_address(
        &mut self,
        base: &Expression,
        index: &Expression,
    ) -> Result<Operand, LowerError> {
        let ptr = self.lower_value(base)?;
        let offset = self.lower_value(index)?;
        let ptr_ty = self.value_type(base)?;
        let temp = self.new_temp(ptr_ty);
        self.emit(Quad::binary(QuadOp::AddPtr, ptr, offset, temp));
        Ok(Operand::Variable(temp))
    }

    /// Arguments left to right, each followed by its `Param`, then the call.
    /// Returns the result temporary, or `None` for a void callee.
    fn lower_call(
        &mut self,
        expr: &Expression,
        args: &[Expression],
    ) -> Result<Option<Operand>, LowerError> {
        for arg in args {
            let value = self.lower_value(arg)?;
            self.emit(Quad::param(value));
        }

        let callee = self.binding(expr.id)?;
        let ret = self.type_of(expr)?;
        let result = if self.types.is_void(ret) {
            None
        } else {
            Some(self.new_temp(ret))
        };
        self.emit(Quad::call(callee, args.len(), result));
        Ok(result.map(Operand::Variable))
    }

    /// Lower an expression for its storage location
    pub(super) fn lower_lvalue(&mut self, expr: &Expression) -> Result<LValue, LowerError> {
        match &expr.kind {
            ExprKind::Identifier(_) => Ok(LValue::Direct(Operand::Variable(self.binding(expr.id)?))),
            ExprKind::Unary {
                op: UnaryOperator::Deref,
                operand,
            } => Ok(LValue::Indirect(self.lower_value(operand)?)),
            ExprKind::Index { base, index } => {
                Ok(LValue::Indirect(self.lower_element_address(base, index)?))
            }
            _ => Err(LowerError::NotAnLvalue { span: expr.span }),
        }
    }

    // ========================================================================
    // Boolean context
    // ========================================================================

    /// Branch to `on_true` or `on_false` depending on `expr`.
    ///
    /// Every conditional branch emitted here is immediately followed by a
    /// `Goto`.
    pub(super) fn lower_condition(
        &mut self,
        expr: &Expression,
        on_true: Label,
        on_false: Label,
    ) -> Result<(), LowerError> {
        match &expr.kind {
            ExprKind::Relational { op, left, right } => {
                let lhs = self.lower_value(left)?;
                let rhs = self.lower_value(right)?;
                self.emit(Quad::branch(QuadOp::from_relational(*op), lhs, rhs, on_true));
                self.emit(Quad::goto(on_false));
            }
            ExprKind::Logical {
                op: LogicalOperator::And,
                left,
                right,
            } => {
                let rhs_label = self.labels.fresh();
                self.lower_condition(left, rhs_label, on_false)?;
                self.emit(Quad::label(rhs_label));
                self.lower_condition(right, on_true, on_false)?;
            }
            ExprKind::Logical {
                op: LogicalOperator::Or,
                left,
                right,
            } => {
                let rhs_label = self.labels.fresh();
                self.lower_condition(left, on_true, rhs_label)?;
                self.emit(Quad::label(rhs_label));
                self.lower_condition(right, on_true, on_false)?;
            }
            ExprKind::Unary {
                op: UnaryOperator::Not,
                operand,
            } => self.lower_condition(operand, on_false, on_true)?,
            _ => {
                let value = self.lower_value(expr)?;
                let width = self.types.const_width(self.value_type(expr)?);
                self.emit(Quad::branch(QuadOp::IfNeq, value, Operand::int(0, width), on_true));
                self.emit(Quad::goto(on_false));
            }
        }
        Ok(())
    }

    /// 0/1 value of a boolean expression used outside a condition
    fn materialize_condition(&mut self, expr: &Expression) -> Result<Operand, LowerError> {
        let ty = self.type_of(expr)?;
        let temp = self.new_temp(ty);
        let width = self.types.const_width(ty);
        let on_true = self.labels.fresh();
        let on_false = self.labels.fresh();
        let end = self.labels.fresh();

        self.lower_condition(expr, on_true, on_false)?;
        self.emit(Quad::label(on_true));
        self.emit(Quad::copy(Operand::int(1, width), Operand::Variable(temp)));
        self.emit(Quad::goto(end));
        self.emit(Quad::label(on_false));
        self.emit(Quad::copy(Operand::int(0, width), Operand::Variable(temp)));
        self.emit(Quad::label(end));
        Ok(Operand::Variable(temp))
    }
}

fn arithmetic_op(op: BinaryOperator) -> QuadOp {
    match op {
        BinaryOperator::Add => QuadOp::Add,
        BinaryOperator::Subtract => QuadOp::Sub,
        BinaryOperator::Multiply => QuadOp::Mul,
        BinaryOperator::Divide => QuadOp::SDiv,
        BinaryOperator::Modulo => QuadOp::SMod,
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::ir::{PrettyPrint, PrintContext};
    use crate::compiler::lower::{LowerOptions, Lowerer};
    use crate::parser::{Parser, TypeChecker};

    /// Quad listing of the only function, without CFG
    fn quads(source: &str) -> Vec<String> {
        let (program, interner) = Parser::new(source).unwrap().parse().unwrap();
        let mut checked = TypeChecker::new(&interner).check(&program).unwrap();
        let options = LowerOptions {
            implicit_return: false,
            build_cfg: false,
        };
        let module = Lowerer::new(&interner, &checked.types, &mut checked.symbols, &checked.analysis)
            .with_options(options)
            .lower_program(&program)
            .unwrap();
        let ctx = PrintContext::new(&checked.symbols, &checked.types);
        module.functions[0]
            .quads
            .iter()
            .skip(1)
            .map(|q| q.pretty_print(&ctx))
            .collect()
    }

    #[test]
    fn test_variables_are_not_materialized() {
        assert_eq!(quads("int f(int a, int b) { return a * b; }"), vec![
            "_t0 = a * b",
            "return _t0",
        ]);
    }

    #[test]
    fn test_assignment_yields_rhs() {
        assert_eq!(quads("void f(int a, int b) { a = b = 3; }"), vec![
            "_t0 = 3",
            "b = _t0",
            "a = _t0",
        ]);
    }

    #[test]
    fn test_compound_assignment() {
        assert_eq!(quads("void f(int x) { x += 1; }"), vec![
            "_t0 = 1",
            "_t1 = x + _t0",
            "x = _t1",
        ]);
    }

    #[test]
    fn test_division_is_signed() {
        assert_eq!(quads("int f(int a, int b) { return a / b % a; }"), vec![
            "_t0 = a / b",
            "_t1 = _t0 % a",
            "return _t1",
        ]);
    }

    #[test]
    fn test_post_and_pre_increment() {
        assert_eq!(quads("void f(int i) { i++; }"), vec![
            "_t0 = i",
            "_t1 = i + 1",
            "i = _t1",
        ]);
        assert_eq!(quads("void f(int i) { --i; }"), vec![
            "_t1 = i + -1",
            "i = _t1",
            "_t0 = _t1",
        ]);
    }

    #[test]
    fn test_pointer_increment_uses_addptr() {
        assert_eq!(quads("void f(char *p) { p++; }"), vec![
            "_t0 = p",
            "_t1 = p +ptr 1",
            "p = _t1",
        ]);
    }

    #[test]
    fn test_deref_and_address() {
        assert_eq!(quads("void f(int *p, int x) { *p = x; p = &x; x = *p; }"), vec![
            "*p = x",
            "_t0 = &x",
            "p = _t0",
            "_t1 = *p",
            "x = _t1",
        ]);
        // &*p is p itself
        assert_eq!(quads("int *f(int *p) { return &*p; }"), vec!["return p"]);
    }

    #[test]
    fn test_indexing() {
        assert_eq!(quads("void f() { int a[4]; a[1] = a[2]; }"), vec![
            "_t0 = cast a to int*",
            "_t1 = 1",
            "_t2 = _t0 +ptr _t1",
            "_t3 = cast a to int*",
            "_t4 = 2",
            "_t5 = _t3 +ptr _t4",
            "_t6 = *_t5",
            "*_t2 = _t6",
        ]);
    }

    #[test]
    fn test_pointer_arithmetic() {
        assert_eq!(quads("int *f(int *p, int n) { return n + p; }"), vec![
            "_t0 = p +ptr n",
            "return _t0",
        ]);
        assert_eq!(quads("int *f(int *p, int n) { return p - n; }"), vec![
            "_t1 = -n",
            "_t0 = p +ptr _t1",
            "return _t0",
        ]);
    }

    #[test]
    fn test_char_promotion_casts() {
        assert_eq!(quads("char f(char c) { return c + 1; }"), vec![
            "_t0 = cast c to int",
            "_t1 = 1",
            "_t2 = _t0 + _t1",
            "_t3 = cast _t2 to char",
            "return _t3",
        ]);
    }

    #[test]
    fn test_calls_push_params_left_to_right() {
        assert_eq!(
            quads("int g(int a, char b); void f(int x) { g(x, 'c'); } int g(int a, char b) { return a; }"),
            vec!["param x", "_t0 = 99", "param _t0", "_t1 = call g, 2"]
        );
        assert_eq!(quads("void g(); void f() { g(); } void g() {}"), vec!["call g, 0"]);
    }

    #[test]
    fn test_boolean_value_is_materialized() {
        assert_eq!(quads("int f(int a, int b) { return a < b; }"), vec![
            "if (a < b) goto __L0__",
            "goto __L1__",
            "__L0__:",
            "_t0 = 1",
            "goto __L2__",
            "__L1__:",
            "_t0 = 0",
            "__L2__:",
            "return _t0",
        ]);
    }

    #[test]
    fn test_short_circuit_and() {
        assert_eq!(quads("void f(int a, int b) { if (a && b) ; }"), vec![
            "if (a != 0) goto __L2__",
            "goto __L1__",
            "__L2__:",
            "if (b != 0) goto __L0__",
            "goto __L1__",
            "__L0__:",
            "__L1__:",
        ]);
    }

    #[test]
    fn test_not_swaps_targets() {
        assert_eq!(quads("void f(int a, int b) { if (!(a || b)) ; }"), vec![
            "if (a != 0) goto __L1__",
            "goto __L2__",
            "__L2__:",
            "if (b != 0) goto __L1__",
            "goto __L0__",
            "__L0__:",
            "__L1__:",
        ]);
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(quads("char *f() { return \"a\\tb\"; }"), vec![
            "_t0 = string \"a\\tb\"",
            "return _t0",
        ]);
    }
}
