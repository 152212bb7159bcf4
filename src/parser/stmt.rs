use crate::{
    ast::statements::{
        AssignmentStmt, BlockStmt, ExpressionStmt, IfStmt, ReturnStmt, Stmt, VarDeclStmt, WhileStmt,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Semicolon)?;

        return Ok(Stmt::Assignment(AssignmentStmt {
            span: parser.span_from(expr.get_span().start.clone()),
            assignee: expr,
            value,
        }));
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: parser.span_from(expr.get_span().start.clone()),
        expression: expr,
    }))
}

/// Parses statements until one of `terminators` is the current token.
///
/// The terminator itself is left for the caller to consume.
pub fn parse_block_until(parser: &mut Parser, terminators: &[TokenKind]) -> Result<BlockStmt, Error> {
    let start = parser.get_position();

    let mut statements = Vec::new();
    while !parser.current_token().is_one_of_many(terminators) {
        if parser.current_token_kind() == TokenKind::EOF {
            return Err(parser.unexpected("expected `end` before end of file"));
        }
        statements.push(parse_stmt(parser)?);
    }

    Ok(BlockStmt {
        body: statements,
        span: Span::new(start, parser.get_position()),
    })
}

/// Parses `do ... end` with the cursor on `do`.
pub fn parse_do_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    parser.expect(TokenKind::Do)?;
    let block = parse_block_until(parser, &[TokenKind::End])?;
    parser.expect(TokenKind::End)?;

    Ok(block)
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let identifier = match parser.current_token_kind() {
        TokenKind::Identifier => parser.advance().value.clone(),
        _ => return Err(parser.unexpected("expected identifier during variable declaration")),
    };

    parser.expect(TokenKind::Colon)?;
    let explicit_type = parse_type(parser, BindingPower::Default)?;

    let assigned_value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        identifier,
        explicit_type,
        assigned_value,
        span: parser.span_from(start),
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Then)?;
    let then_body = parse_block_until(parser, &[TokenKind::Else, TokenKind::End])?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block_until(parser, &[TokenKind::End])?)
    } else {
        None
    };

    parser.expect(TokenKind::End)?;

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_do_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_nested_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let mut block = parse_do_block(parser)?;
    block.span = parser.span_from(start);

    Ok(Stmt::Block(block))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(start),
    }))
}
