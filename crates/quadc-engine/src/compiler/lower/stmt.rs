//! Statement Lowering

use super::control_flow::{IfLabels, LoopLabels};
use super::expr::LValue;
use super::{LowerError, Lowerer};
use crate::compiler::ir::{Operand, Quad, QuadOp};
use crate::parser::ast::*;

impl<'a> Lowerer<'a> {
    pub(super) fn lower_statement(&mut self, stmt: &Statement) -> Result<(), LowerError> {
        match stmt {
            Statement::Block(block) => self.lower_block(block),
            Statement::VarDecl(decl) => self.lower_var_decl(decl),
            Statement::If(s) => self.lower_if(s),
            Statement::While(s) => self.lower_while(s),
            Statement::For(s) => self.lower_for(s),
            Statement::Return(s) => {
                let value = match &s.value {
                    Some(value) => Some(self.lower_value(value)?),
                    None => None,
                };
                self.emit(Quad::ret(value));
                Ok(())
            }
            Statement::Expression(s) => self.lower_effect(&s.expression),
            Statement::Empty(_) => Ok(()),
        }
    }

    fn lower_block(&mut self, block: &Block) -> Result<(), LowerError> {
        let outer = self.scope;
        self.scope = self.analysis.scope_of(block.id).ok_or_else(|| LowerError::Internal {
            message: format!("block at {} has no scope", block.span),
        })?;
        let result = block
            .statements
            .iter()
            .try_for_each(|stmt| self.lower_statement(stmt));
        self.scope = outer;
        result
    }

    /// Initializers are lowered as plain assignments; bare declarations emit nothing
    fn lower_var_decl(&mut self, decl: &VarDecl) -> Result<(), LowerError> {
        for d in &decl.declarators {
            if let Some(init) = &d.init {
                let location = LValue::Direct(Operand::Variable(self.binding(d.id)?));
                let value = self.lower_value(init)?;
                self.emit(location.store(value));
            }
        }
        Ok(())
    }

    fn lower_if(&mut self, s: &IfStatement) -> Result<(), LowerError> {
        let labels = IfLabels::new(&mut self.labels, s.else_branch.is_some());

        self.lower_condition(&s.condition, labels.then_label, labels.false_target())?;
        self.emit(Quad::label(labels.then_label));
        self.lower_statement(&s.then_branch)?;

        if let (Some(else_branch), Some(else_label)) = (&s.else_branch, labels.else_label) {
            if !self.ends_with(&[QuadOp::Return, QuadOp::Goto]) {
                self.emit(Quad::goto(labels.end_label));
            }
            self.emit(Quad::label(else_label));
            self.lower_statement(else_branch)?;
        }

        self.emit(Quad::label(labels.end_label));
        Ok(())
    }

    fn lower_while(&mut self, s: &WhileStatement) -> Result<(), LowerError> {
        let labels = LoopLabels::new(&mut self.labels);

        self.emit(Quad::goto(labels.eval));
        self.emit(Quad::label(labels.top));
        self.lower_statement(&s.body)?;
        self.emit(Quad::label(labels.eval));
        self.lower_condition(&s.condition, labels.top, labels.end)?;
        self.emit(Quad::label(labels.end));
        Ok(())
    }

    /// Like `while`, with the init before the loop and the update after the body
    fn lower_for(&mut self, s: &ForStatement) -> Result<(), LowerError> {
        if let Some(init) = &s.init {
            self.lower_effect(init)?;
        }

        let labels = LoopLabels::new(&mut self.labels);
        self.emit(Quad::goto(labels.eval));
        self.emit(Quad::label(labels.top));
        self.lower_statement(&s.body)?;
        if let Some(update) = &s.update {
            self.lower_effect(update)?;
        }

        self.emit(Quad::label(labels.eval));
        match &s.condition {
            Some(cond) => self.lower_condition(cond, labels.top, labels.end)?,
            None => {
                self.emit(Quad::goto(labels.top));
            }
        }
        self.emit(Quad::label(labels.end));
        Ok(())
    }
}
