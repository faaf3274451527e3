//! Statement and top-level item parsing

use super::expr::parse_expression;
use super::guards::{with_depth, LoopGuard};
use super::{ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::{Span, Token};

// ============================================================================
// Top-level Items
// ============================================================================

/// Parse one function definition, prototype or global declaration.
pub fn parse_item(parser: &mut Parser) -> Result<Item, ParseError> {
    let start_span = parser.current_span();
    let is_extern = parser.eat(&Token::Extern);
    let ty = parse_type(parser)?;
    let stars = parse_stars(parser);
    let name = parser.expect_identifier()?;

    if parser.check(&Token::LeftParen) {
        let func = parse_function_rest(parser, start_span, is_extern, ty.with_pointers(stars), name)?;
        return Ok(Item::Function(func));
    }

    if is_extern {
        return Err(ParseError::invalid_syntax(
            "'extern' is only allowed on function declarations",
            start_span,
        ));
    }

    let first = parse_declarator_rest(parser, name, stars)?;
    let decl = parse_declarator_list(parser, ty, first, start_span)?;
    Ok(Item::Global(decl))
}

fn parse_function_rest(
    parser: &mut Parser,
    start_span: Span,
    is_extern: bool,
    return_type: TypeExpr,
    name: Identifier,
) -> Result<FunctionDecl, ParseError> {
    let id = parser.next_id();
    parser.expect(Token::LeftParen)?;
    let params = parse_parameters(parser)?;
    parser.expect(Token::RightParen)?;

    let body = if parser.check(&Token::LeftBrace) {
        if is_extern {
            return Err(ParseError::invalid_syntax(
                "an 'extern' function cannot have a body",
                parser.current_span(),
            ));
        }
        Some(parse_block(parser)?)
    } else {
        parser.expect(Token::Semicolon)?;
        None
    };

    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(FunctionDecl {
        id,
        name,
        return_type,
        params,
        body,
        is_extern,
        span,
    })
}

/// Parse a parameter list: empty, `void`, or comma-separated parameters.
fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, ParseError> {
    let mut params = Vec::new();

    if parser.check(&Token::RightParen) {
        return Ok(params);
    }
    if parser.check(&Token::Void) && matches!(parser.peek(), Some(Token::RightParen)) {
        parser.advance();
        return Ok(params);
    }

    let mut guard = LoopGuard::new("function_parameters");
    loop {
        guard.check()?;
        let start_span = parser.current_span();
        let ty = parse_type(parser)?;
        let name = parser.expect_identifier()?;

        let is_array = if parser.eat(&Token::LeftBracket) {
            parser.expect(Token::RightBracket)?;
            true
        } else {
            false
        };

        let span = parser.combine_spans(&start_span, &parser.previous_span());
        params.push(Parameter {
            id: parser.next_id(),
            name,
            ty,
            is_array,
            span,
        });

        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    Ok(params)
}

// ============================================================================
// Types and Declarators
// ============================================================================

/// Parse a type specifier: `void`, `int` or `char`, then any number of `*`.
pub fn parse_type(parser: &mut Parser) -> Result<TypeExpr, ParseError> {
    let start_span = parser.current_span();
    let base = match parser.current() {
        Token::Void => BaseType::Void,
        Token::Int => BaseType::Int,
        Token::Char => BaseType::Char,
        _ => return Err(parser.unexpected_token(&[Token::Void, Token::Int, Token::Char])),
    };
    parser.advance();

    let stars = parse_stars(parser);
    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(TypeExpr::new(base, stars, span))
}

fn parse_stars(parser: &mut Parser) -> u8 {
    let mut count: u8 = 0;
    while parser.eat(&Token::Star) {
        count = count.saturating_add(1);
    }
    count
}

/// Parse a declarator: `'*'* IDENT ('[' INT ']')? ('=' expr)?`
fn parse_declarator(parser: &mut Parser) -> Result<Declarator, ParseError> {
    let stars = parse_stars(parser);
    let name = parser.expect_identifier()?;
    parse_declarator_rest(parser, name, stars)
}

/// Finish a declarator whose stars and name are already consumed.
fn parse_declarator_rest(
    parser: &mut Parser,
    name: Identifier,
    pointer_depth: u8,
) -> Result<Declarator, ParseError> {
    let id = parser.next_id();
    let start_span = name.span;

    let array_len = if parser.eat(&Token::LeftBracket) {
        let len_span = parser.current_span();
        let len = match *parser.current() {
            Token::IntLiteral(n) if n > 0 && n <= u32::MAX as i64 => n as u32,
            Token::IntLiteral(_) => {
                return Err(ParseError::invalid_syntax(
                    "array length must be a positive integer",
                    len_span,
                ))
            }
            _ => return Err(parser.unexpected_token(&[Token::IntLiteral(0)])),
        };
        parser.advance();
        parser.expect(Token::RightBracket)?;
        Some(len)
    } else {
        None
    };

    let init = if parser.eat(&Token::Equal) {
        Some(parse_expression(parser)?)
    } else {
        None
    };

    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(Declarator {
        id,
        name,
        pointer_depth,
        array_len,
        init,
        span,
    })
}

/// Parse `(',' declarator)* ';'` after the first declarator.
fn parse_declarator_list(
    parser: &mut Parser,
    ty: TypeExpr,
    first: Declarator,
    start_span: Span,
) -> Result<VarDecl, ParseError> {
    let mut declarators = vec![first];
    let mut guard = LoopGuard::new("declarators");

    while parser.eat(&Token::Comma) {
        guard.check()?;
        declarators.push(parse_declarator(parser)?);
    }
    parser.expect(Token::Semicolon)?;

    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(VarDecl {
        ty,
        declarators,
        span,
    })
}

// ============================================================================
// Statements
// ============================================================================

/// Parse a statement.
pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    with_depth(parser, "statement", parse_statement_inner)
}

fn parse_statement_inner(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.current() {
        Token::LeftBrace => Ok(Statement::Block(parse_block(parser)?)),
        Token::Void | Token::Int | Token::Char => parse_variable_declaration(parser),
        Token::If => parse_if_statement(parser),
        Token::While => parse_while_statement(parser),
        Token::For => parse_for_statement(parser),
        Token::Return => parse_return_statement(parser),
        Token::Semicolon => {
            let span = parser.current_span();
            parser.advance();
            Ok(Statement::Empty(span))
        }
        _ => {
            let start_span = parser.current_span();
            let expression = parse_expression(parser)?;
            parser.expect(Token::Semicolon)?;
            let span = parser.combine_spans(&start_span, &parser.previous_span());
            Ok(Statement::Expression(ExpressionStatement { expression, span }))
        }
    }
}

/// Parse a braced block.
pub fn parse_block(parser: &mut Parser) -> Result<Block, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBrace)?;
    let id = parser.next_id();

    let mut statements = Vec::new();
    let mut guard = LoopGuard::new("block_statements");
    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        guard.check()?;
        statements.push(parse_statement(parser)?);
    }
    parser.expect(Token::RightBrace)?;

    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(Block {
        id,
        statements,
        span,
    })
}

fn parse_variable_declaration(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    let ty = parse_type(parser)?;
    let first = parse_declarator(parser)?;
    let decl = parse_declarator_list(parser, ty, first, start_span)?;
    Ok(Statement::VarDecl(decl))
}

fn parse_if_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::If)?;
    parser.expect(Token::LeftParen)?;
    let condition = parse_expression(parser)?;
    parser.expect(Token::RightParen)?;

    let then_branch = Box::new(parse_statement(parser)?);
    let else_branch = if parser.eat(&Token::Else) {
        Some(Box::new(parse_statement(parser)?))
    } else {
        None
    };

    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(Statement::If(IfStatement {
        condition,
        then_branch,
        else_branch,
        span,
    }))
}

fn parse_while_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::While)?;
    parser.expect(Token::LeftParen)?;
    let condition = parse_expression(parser)?;
    parser.expect(Token::RightParen)?;
    let body = Box::new(parse_statement(parser)?);

    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(Statement::While(WhileStatement {
        condition,
        body,
        span,
    }))
}

fn parse_for_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::For)?;
    parser.expect(Token::LeftParen)?;

    let init = parse_optional_expression(parser, Token::Semicolon)?;
    parser.expect(Token::Semicolon)?;
    let condition = parse_optional_expression(parser, Token::Semicolon)?;
    parser.expect(Token::Semicolon)?;
    let update = parse_optional_expression(parser, Token::RightParen)?;
    parser.expect(Token::RightParen)?;

    let body = Box::new(parse_statement(parser)?);

    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(Statement::For(ForStatement {
        init,
        condition,
        update,
        body,
        span,
    }))
}

fn parse_optional_expression(
    parser: &mut Parser,
    terminator: Token,
) -> Result<Option<Expression>, ParseError> {
    if parser.check(&terminator) {
        Ok(None)
    } else {
        parse_expression(parser).map(Some)
    }
}

fn parse_return_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Return)?;

    let value = parse_optional_expression(parser, Token::Semicolon)?;
    parser.expect(Token::Semicolon)?;

    let span = parser.combine_spans(&start_span, &parser.previous_span());
    Ok(Statement::Return(ReturnStatement { value, span }))
}
