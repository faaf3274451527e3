//! Pretty-printing for IR
//!
//! Provides human-readable output for debugging IR structures. Operands
//! refer to symbols and types by id, so printing needs a [`PrintContext`].

use super::block::{BasicBlock, BasicBlockId};
use super::function::IrFunction;
use super::module::IrModule;
use super::operand::Operand;
use super::quad::{Quad, QuadList, QuadOp};
use crate::parser::checker::SymbolTable;
use crate::parser::TypeContext;
use std::fmt::{self, Write};

/// Symbol and type tables used to name operands
#[derive(Clone, Copy)]
pub struct PrintContext<'a> {
    pub symbols: &'a SymbolTable,
    pub types: &'a TypeContext,
}

impl<'a> PrintContext<'a> {
    pub fn new(symbols: &'a SymbolTable, types: &'a TypeContext) -> Self {
        Self { symbols, types }
    }

    pub fn operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::IntConst { value, .. } => value.to_string(),
            Operand::StrConst(text) => format!("{:?}", text),
            Operand::Variable(sym) => self.symbols.name(*sym).to_string(),
            Operand::Label(label) => label.to_string(),
            Operand::Type(ty) => self.types.display(*ty),
        }
    }

    fn slot(&self, operand: &Option<Operand>) -> String {
        operand
            .as_ref()
            .map(|op| self.operand(op))
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn write_pretty(&self, ctx: &PrintContext<'_>, out: &mut String) -> fmt::Result;

    fn pretty_print(&self, ctx: &PrintContext<'_>) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail
        let _ = self.write_pretty(ctx, &mut output);
        output
    }
}

impl PrettyPrint for Quad {
    fn write_pretty(&self, ctx: &PrintContext<'_>, out: &mut String) -> fmt::Result {
        out.push_str(&format_quad(self, ctx));
        Ok(())
    }
}

impl PrettyPrint for QuadList {
    fn write_pretty(&self, ctx: &PrintContext<'_>, out: &mut String) -> fmt::Result {
        for quad in self {
            write_line(out, quad, ctx, 2)?;
        }
        Ok(())
    }
}

impl PrettyPrint for IrFunction {
    fn write_pretty(&self, ctx: &PrintContext<'_>, out: &mut String) -> fmt::Result {
        write_signature(out, self, ctx)?;
        self.quads.write_pretty(ctx, out)?;
        writeln!(out, "}}")
    }
}

impl PrettyPrint for IrModule {
    fn write_pretty(&self, ctx: &PrintContext<'_>, out: &mut String) -> fmt::Result {
        for quad in &self.globals {
            writeln!(out, "{}", format_quad(quad, ctx))?;
        }
        if !self.globals.is_empty() {
            writeln!(out)?;
        }

        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            func.write_pretty(ctx, out)?;
        }
        Ok(())
    }
}

/// Block-structured view of a function or module
pub struct Cfg<'a, T>(pub &'a T);

impl PrettyPrint for Cfg<'_, IrFunction> {
    fn write_pretty(&self, ctx: &PrintContext<'_>, out: &mut String) -> fmt::Result {
        let func = self.0;
        write_signature(out, func, ctx)?;
        for block in &func.blocks {
            write_block(out, block, &func.quads, ctx)?;
        }
        writeln!(out, "}}")
    }
}

impl PrettyPrint for Cfg<'_, IrModule> {
    fn write_pretty(&self, ctx: &PrintContext<'_>, out: &mut String) -> fmt::Result {
        for (i, func) in self.0.functions.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            Cfg(func).write_pretty(ctx, out)?;
        }
        Ok(())
    }
}

fn write_signature(out: &mut String, func: &IrFunction, ctx: &PrintContext<'_>) -> fmt::Result {
    let params: Vec<&str> = func.params.iter().map(|&p| ctx.symbols.name(p)).collect();
    writeln!(
        out,
        "fn {}({}) -> {} {{",
        func.name,
        params.join(", "),
        ctx.types.display(func.return_ty)
    )
}

fn write_block(
    out: &mut String,
    block: &BasicBlock,
    quads: &QuadList,
    ctx: &PrintContext<'_>,
) -> fmt::Result {
    writeln!(
        out,
        "  {}: ; preds: {} ; succs: {}",
        block.id,
        format_edges(&block.preds),
        format_edges(&block.succs)
    )?;
    for quad in block.quads(quads) {
        write_line(out, quad, ctx, 4)?;
    }
    Ok(())
}

/// Labels hang two columns left of the quads around them
fn write_line(out: &mut String, quad: &Quad, ctx: &PrintContext<'_>, indent: usize) -> fmt::Result {
    let indent = if quad.op == QuadOp::Label {
        indent.saturating_sub(2)
    } else {
        indent
    };
    writeln!(out, "{}{}", " ".repeat(indent), format_quad(quad, ctx))
}

fn format_edges(edges: &[BasicBlockId]) -> String {
    if edges.is_empty() {
        return "-".to_string();
    }
    edges
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line rendering of a quad
pub fn format_quad(quad: &Quad, ctx: &PrintContext<'_>) -> String {
    let a = || ctx.slot(&quad.arg1);
    let b = || ctx.slot(&quad.arg2);
    let r = || ctx.slot(&quad.res);

    match quad.op {
        QuadOp::Global => match &quad.arg2 {
            Some(init) => format!("global {} = {}", a(), ctx.operand(init)),
            None => format!("global {}", a()),
        },
        QuadOp::String => format!("{} = string {}", r(), a()),
        QuadOp::Add | QuadOp::Sub | QuadOp::Mul | QuadOp::SDiv | QuadOp::SMod | QuadOp::AddPtr => {
            format!("{} = {} {} {}", r(), a(), quad.op.symbol().unwrap_or("?"), b())
        }
        QuadOp::Neg => format!("{} = -{}", r(), a()),
        QuadOp::Copy => format!("{} = {}", r(), a()),
        QuadOp::AddrOf => format!("{} = &{}", r(), a()),
        QuadOp::RDeref => format!("{} = *{}", r(), a()),
        QuadOp::LDeref => format!("*{} = {}", r(), a()),
        QuadOp::Label => format!("{}:", a()),
        QuadOp::Goto => format!("goto {}", a()),
        QuadOp::IfEq | QuadOp::IfNeq | QuadOp::IfLt | QuadOp::IfLeq | QuadOp::IfGt | QuadOp::IfGeq => {
            format!(
                "if ({} {} {}) goto {}",
                a(),
                quad.op.symbol().unwrap_or("?"),
                b(),
                r()
            )
        }
        QuadOp::Enter => format!("enter {}", a()),
        QuadOp::Param => format!("param {}", a()),
        QuadOp::Call => match &quad.res {
            Some(res) => format!("{} = call {}, {}", ctx.operand(res), a(), b()),
            None => format!("call {}, {}", a(), b()),
        },
        QuadOp::Return => match &quad.arg1 {
            Some(value) => format!("return {}", ctx.operand(value)),
            None => "return".to_string(),
        },
        QuadOp::Cast => format!("{} = cast {} to {}", r(), a(), b()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::block::BasicBlockId;
    use crate::compiler::ir::operand::Label;
    use crate::compiler::ir::quad::QuadId;
    use crate::parser::checker::{SymbolId, SymbolKind};
    use crate::parser::Span;

    fn setup() -> (SymbolTable, TypeContext, SymbolId, SymbolId) {
        let mut symbols = SymbolTable::new();
        let global = symbols.global_scope();
        let x = symbols
            .define(global, "x", SymbolKind::Global, TypeContext::INT, Span::default())
            .unwrap();
        let f = symbols
            .define(global, "f", SymbolKind::Function, TypeContext::INT, Span::default())
            .unwrap();
        (symbols, TypeContext::new(), x, f)
    }

    #[test]
    fn test_quad_templates() {
        let (symbols, types, x, f) = setup();
        let ctx = PrintContext::new(&symbols, &types);
        let v = Operand::Variable(x);

        let cases = vec![
            (Quad::global(x, None), "global x"),
            (Quad::global(x, Some(Operand::int(5, 4))), "global x = 5"),
            (Quad::binary(QuadOp::Add, v.clone(), Operand::int(1, 4), x), "x = x + 1"),
            (Quad::binary(QuadOp::SMod, v.clone(), v.clone(), x), "x = x % x"),
            (Quad::unary(QuadOp::Neg, v.clone(), x), "x = -x"),
            (Quad::copy(Operand::int(3, 4), v.clone()), "x = 3"),
            (Quad::store(Operand::int(3, 4), v.clone()), "*x = 3"),
            (Quad::label(Label(3)), "__L3__:"),
            (Quad::goto(Label(3)), "goto __L3__"),
            (
                Quad::branch(QuadOp::IfLeq, v.clone(), Operand::int(0, 4), Label(1)),
                "if (x <= 0) goto __L1__",
            ),
            (Quad::enter(f), "enter f"),
            (Quad::param(v.clone()), "param x"),
            (Quad::call(f, 2, Some(x)), "x = call f, 2"),
            (Quad::call(f, 0, None), "call f, 0"),
            (Quad::ret(None), "return"),
            (Quad::ret(Some(v.clone())), "return x"),
            (Quad::cast(v.clone(), TypeContext::CHAR, x), "x = cast x to char"),
            (Quad::string("hi\n", x), "x = string \"hi\\n\""),
        ];

        for (quad, expected) in cases {
            assert_eq!(quad.pretty_print(&ctx), expected);
        }
    }

    #[test]
    fn test_cfg_dump() {
        let (symbols, types, _, f) = setup();
        let ctx = PrintContext::new(&symbols, &types);

        let mut func = IrFunction::new("f", f, vec![], TypeContext::VOID, symbols.global_scope());
        func.quads.push(Quad::enter(f));
        func.quads.push(Quad::goto(Label(0)));
        func.quads.push(Quad::label(Label(0)));
        func.quads.push(Quad::ret(None));

        let mut entry = BasicBlock::new(BasicBlockId(0), QuadId(0), QuadId(1));
        let mut exit = BasicBlock::new(BasicBlockId(1), QuadId(2), QuadId(3));
        entry.add_succ(exit.id);
        exit.add_pred(entry.id);
        func.blocks = vec![entry, exit];

        let expected = "\
fn f() -> void {
  bb0: ; preds: - ; succs: bb1
    enter f
    goto __L0__
  bb1: ; preds: bb0 ; succs: -
  __L0__:
    return
}
";
        assert_eq!(Cfg(&func).pretty_print(&ctx), expected);

        let flat = "\
fn f() -> void {
  enter f
  goto __L0__
__L0__:
  return
}
";
        assert_eq!(func.pretty_print(&ctx), flat);
    }
}
