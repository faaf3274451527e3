//! Indented text dump of the AST
//!
//! Statements print one per line, indented by nesting; expressions print
//! inline as s-expressions, e.g. `(= x (+ x 1))`.

use super::*;
use crate::parser::interner::Interner;
use std::fmt::Write;

pub struct AstPrinter<'a> {
    interner: &'a Interner,
    out: String,
    indent: usize,
}

impl<'a> AstPrinter<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            out: String::new(),
            indent: 0,
        }
    }

    pub fn print_program(mut self, program: &Program) -> String {
        for item in &program.items {
            match item {
                Item::Function(func) => self.function(func),
                Item::Global(decl) => self.var_decl("global", decl),
            }
        }
        self.out
    }

    /// Render a single expression.
    pub fn print_expression(mut self, expr: &Expression) -> String {
        self.expression(expr);
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn name(&self, ident: &Identifier) -> &'a str {
        self.interner.resolve(ident.name)
    }

    fn function(&mut self, func: &FunctionDecl) {
        let params: Vec<String> = func
            .params
            .iter()
            .map(|p| {
                let suffix = if p.is_array { "[]" } else { "" };
                format!("{} {}{}", p.ty, self.name(&p.name), suffix)
            })
            .collect();
        let head = format!(
            "{}function {} {}({})",
            if func.is_extern { "extern " } else { "" },
            func.return_type,
            self.name(&func.name),
            params.join(", ")
        );

        match &func.body {
            Some(body) => {
                self.line(&head);
                self.indent += 1;
                self.block(body);
                self.indent -= 1;
            }
            None => self.line(&format!("{};", head)),
        }
    }

    fn var_decl(&mut self, keyword: &str, decl: &VarDecl) {
        for d in &decl.declarators {
            let mut text = format!("{} {}", keyword, decl.ty.with_pointers(d.pointer_depth));
            let _ = write!(text, " {}", self.name(&d.name));
            if let Some(len) = d.array_len {
                let _ = write!(text, "[{}]", len);
            }
            if let Some(init) = &d.init {
                text.push_str(" = ");
                text.push_str(&self.inline(init));
            }
            self.line(&text);
        }
    }

    fn block(&mut self, block: &Block) {
        self.line("block");
        self.indent += 1;
        for stmt in &block.statements {
            self.statement(stmt);
        }
        self.indent -= 1;
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => self.block(block),
            Statement::VarDecl(decl) => self.var_decl("local", decl),
            Statement::If(s) => {
                let cond = self.inline(&s.condition);
                self.line(&format!("if {}", cond));
                self.nested(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    self.line("else");
                    self.nested(else_branch);
                }
            }
            Statement::While(s) => {
                let cond = self.inline(&s.condition);
                self.line(&format!("while {}", cond));
                self.nested(&s.body);
            }
            Statement::For(s) => {
                let part = |p: &Option<Expression>, me: &Self| match p {
                    Some(e) => me.inline(e),
                    None => "_".to_string(),
                };
                let head = format!(
                    "for {}; {}; {}",
                    part(&s.init, self),
                    part(&s.condition, self),
                    part(&s.update, self)
                );
                self.line(&head);
                self.nested(&s.body);
            }
            Statement::Return(s) => match &s.value {
                Some(value) => {
                    let value = self.inline(value);
                    self.line(&format!("return {}", value));
                }
                None => self.line("return"),
            },
            Statement::Expression(s) => {
                let text = self.inline(&s.expression);
                self.line(&text);
            }
            Statement::Empty(_) => self.line(";"),
        }
    }

    fn nested(&mut self, stmt: &Statement) {
        self.indent += 1;
        self.statement(stmt);
        self.indent -= 1;
    }

    fn inline(&self, expr: &Expression) -> String {
        let mut printer = AstPrinter::new(self.interner);
        printer.expression(expr);
        printer.out
    }

    fn expression(&mut self, expr: &Expression) {
        match &expr.kind {
            ExprKind::IntLiteral(value) => {
                let _ = write!(self.out, "{}", value);
            }
            ExprKind::CharLiteral(c) => {
                let _ = write!(self.out, "{:?}", *c as char);
            }
            ExprKind::StringLiteral(sym) => {
                let _ = write!(self.out, "{:?}", self.interner.resolve(*sym));
            }
            ExprKind::Identifier(sym) => self.out.push_str(self.interner.resolve(*sym)),
            ExprKind::Unary { op, operand } => self.sexpr(op.symbol(), &[operand.as_ref()]),
            ExprKind::IncDec { op, operand } => {
                let tag = if op.is_prefix() {
                    format!("{}pre", op.symbol())
                } else {
                    format!("{}post", op.symbol())
                };
                self.sexpr(&tag, &[operand.as_ref()]);
            }
            ExprKind::Binary { op, left, right } => self.sexpr(op.symbol(), &[left.as_ref(), right.as_ref()]),
            ExprKind::Relational { op, left, right } => self.sexpr(op.symbol(), &[left.as_ref(), right.as_ref()]),
            ExprKind::Logical { op, left, right } => self.sexpr(op.symbol(), &[left.as_ref(), right.as_ref()]),
            ExprKind::Assign { op, target, value } => {
                let tag = match op {
                    Some(op) => format!("{}=", op.symbol()),
                    None => "=".to_string(),
                };
                self.sexpr(&tag, &[target.as_ref(), value.as_ref()]);
            }
            ExprKind::Index { base, index } => self.sexpr("[]", &[base.as_ref(), index.as_ref()]),
            ExprKind::Call { callee, args } => {
                let _ = write!(self.out, "(call {}", self.interner.resolve(callee.name));
                for arg in args {
                    self.out.push(' ');
                    self.expression(arg);
                }
                self.out.push(')');
            }
        }
    }

    fn sexpr(&mut self, tag: &str, children: &[&Expression]) {
        self.out.push('(');
        self.out.push_str(tag);
        for child in children {
            self.out.push(' ');
            self.expression(child);
        }
        self.out.push(')');
    }
}
