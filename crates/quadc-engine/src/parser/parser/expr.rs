//! Expression parsing
//!
//! Binary operators are parsed by precedence climbing over the table in
//! [`super::precedence`]; unary and postfix forms by plain recursion.

use super::guards::{with_depth, LoopGuard};
use super::precedence::{get_precedence, is_right_associative, Precedence};
use super::{ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::interner::Symbol;
use crate::parser::token::Token;

/// Parse an expression.
pub fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    with_depth(parser, "expression", |p| parse_binary(p, Precedence::Assignment))
}

/// Parse an infix chain whose operators bind at least as tight as `min`.
fn parse_binary(parser: &mut Parser, min: Precedence) -> Result<Expression, ParseError> {
    let mut left = parse_unary(parser)?;
    let mut guard = LoopGuard::new("binary_expression");

    loop {
        guard.check()?;
        let token = parser.current().clone();
        let prec = get_precedence(&token);
        if prec == Precedence::None || prec < min {
            break;
        }
        parser.advance();

        let next_min = if is_right_associative(&token) {
            prec
        } else {
            prec.next()
        };
        let right = with_depth(parser, "expression", |p| parse_binary(p, next_min))?;
        left = build_infix(parser, &token, left, right);
    }

    Ok(left)
}

fn build_infix(parser: &mut Parser, token: &Token, left: Expression, right: Expression) -> Expression {
    let span = parser.combine_spans(&left.span, &right.span);
    let left = Box::new(left);
    let right = Box::new(right);

    let kind = if let Some(op) = arithmetic_operator(token) {
        ExprKind::Binary { op, left, right }
    } else if let Some(op) = relational_operator(token) {
        ExprKind::Relational { op, left, right }
    } else if let Some(op) = logical_operator(token) {
        ExprKind::Logical { op, left, right }
    } else {
        ExprKind::Assign {
            op: compound_operator(token),
            target: left,
            value: right,
        }
    };
    Expression::new(parser.next_id(), kind, span)
}

fn arithmetic_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Subtract),
        Token::Star => Some(BinaryOperator::Multiply),
        Token::Slash => Some(BinaryOperator::Divide),
        Token::Percent => Some(BinaryOperator::Modulo),
        _ => None,
    }
}

fn relational_operator(token: &Token) -> Option<RelationalOperator> {
    match token {
        Token::EqualEqual => Some(RelationalOperator::Equal),
        Token::BangEqual => Some(RelationalOperator::NotEqual),
        Token::Less => Some(RelationalOperator::Less),
        Token::LessEqual => Some(RelationalOperator::LessEqual),
        Token::Greater => Some(RelationalOperator::Greater),
        Token::GreaterEqual => Some(RelationalOperator::GreaterEqual),
        _ => None,
    }
}

fn logical_operator(token: &Token) -> Option<LogicalOperator> {
    match token {
        Token::AmpAmp => Some(LogicalOperator::And),
        Token::PipePipe => Some(LogicalOperator::Or),
        _ => None,
    }
}

/// Arithmetic part of a compound assignment; `None` for plain `=`
fn compound_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::PlusEqual => Some(BinaryOperator::Add),
        Token::MinusEqual => Some(BinaryOperator::Subtract),
        Token::StarEqual => Some(BinaryOperator::Multiply),
        Token::SlashEqual => Some(BinaryOperator::Divide),
        Token::PercentEqual => Some(BinaryOperator::Modulo),
        _ => None,
    }
}

enum Prefix {
    Unary(UnaryOperator),
    IncDec(IncDecOperator),
}

/// Parse a prefix-operator expression.
fn parse_unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();

    let prefix = match parser.current() {
        Token::Minus => Prefix::Unary(UnaryOperator::Negate),
        Token::Bang => Prefix::Unary(UnaryOperator::Not),
        Token::Star => Prefix::Unary(UnaryOperator::Deref),
        Token::Amp => Prefix::Unary(UnaryOperator::AddrOf),
        Token::PlusPlus => Prefix::IncDec(IncDecOperator::PreIncrement),
        Token::MinusMinus => Prefix::IncDec(IncDecOperator::PreDecrement),
        _ => return parse_postfix(parser),
    };

    parser.advance();
    let operand = Box::new(with_depth(parser, "unary expression", parse_unary)?);
    let span = parser.combine_spans(&start_span, &operand.span);
    let kind = match prefix {
        Prefix::Unary(op) => ExprKind::Unary { op, operand },
        Prefix::IncDec(op) => ExprKind::IncDec { op, operand },
    };
    Ok(Expression::new(parser.next_id(), kind, span))
}

/// Parse a primary expression followed by calls, indexing and postfix `++`/`--`.
fn parse_postfix(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut expr = parse_primary(parser)?;
    let mut guard = LoopGuard::new("postfix_expression");

    loop {
        guard.check()?;
        match parser.current() {
            Token::LeftParen => {
                let callee = match expr.kind {
                    ExprKind::Identifier(name) => Identifier::new(name, expr.span),
                    _ => {
                        return Err(ParseError::invalid_syntax(
                            "only named functions can be called",
                            parser.current_span(),
                        ))
                    }
                };
                parser.advance();
                let args = parse_arguments(parser)?;
                let end = parser.current_span();
                parser.expect(Token::RightParen)?;
                let span = parser.combine_spans(&expr.span, &end);
                expr = Expression::new(parser.next_id(), ExprKind::Call { callee, args }, span);
            }
            Token::LeftBracket => {
                parser.advance();
                let index = parse_expression(parser)?;
                let end = parser.current_span();
                parser.expect(Token::RightBracket)?;
                let span = parser.combine_spans(&expr.span, &end);
                let kind = ExprKind::Index {
                    base: Box::new(expr),
                    index: Box::new(index),
                };
                expr = Expression::new(parser.next_id(), kind, span);
            }
            Token::PlusPlus | Token::MinusMinus => {
                let op = if parser.check(&Token::PlusPlus) {
                    IncDecOperator::PostIncrement
                } else {
                    IncDecOperator::PostDecrement
                };
                let end = parser.current_span();
                parser.advance();
                let span = parser.combine_spans(&expr.span, &end);
                let kind = ExprKind::IncDec {
                    op,
                    operand: Box::new(expr),
                };
                expr = Expression::new(parser.next_id(), kind, span);
            }
            _ => break,
        }
    }

    Ok(expr)
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expression>, ParseError> {
    let mut args = Vec::new();
    if parser.check(&Token::RightParen) {
        return Ok(args);
    }

    let mut guard = LoopGuard::new("call_arguments");
    loop {
        guard.check()?;
        args.push(parse_expression(parser)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    Ok(args)
}

/// Parse a primary expression (literal, identifier, parenthesized expression).
pub fn parse_primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let span = parser.current_span();

    let kind = match *parser.current() {
        Token::IntLiteral(value) => ExprKind::IntLiteral(value),
        Token::CharLiteral(value) => ExprKind::CharLiteral(value),
        Token::StringLiteral(sym) => ExprKind::StringLiteral(sym),
        Token::Identifier(sym) => ExprKind::Identifier(sym),
        Token::LeftParen => {
            parser.advance();
            let inner = parse_expression(parser)?;
            parser.expect(Token::RightParen)?;
            return Ok(inner);
        }
        _ => {
            return Err(parser.unexpected_token(&[
                Token::IntLiteral(0),
                Token::CharLiteral(0),
                Token::StringLiteral(Symbol::dummy()),
                Token::Identifier(Symbol::dummy()),
                Token::LeftParen,
            ]))
        }
    };

    parser.advance();
    Ok(Expression::new(parser.next_id(), kind, span))
}
