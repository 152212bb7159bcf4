//! Recursive-descent parsing of top-level declarations.
//!
//! ```text
//! class Counter
//!     value: Integer;
//!     inc(by: Integer) do ... end
//!     reset();
//! end
//! ```

use crate::{
    ast::{
        ast::{Argument, ClassDecl, Feature, FieldDecl, MethodDecl},
        statements::BlockStmt,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_do_block, types::parse_type};

pub fn parse_class_decl(parser: &mut Parser) -> Result<ClassDecl, Error> {
    let start = parser.expect(TokenKind::Class)?.span.start;
    let name = parser.expect(TokenKind::Identifier)?.value;

    let mut features = Vec::new();
    while parser.current_token_kind() != TokenKind::End {
        if parser.current_token_kind() != TokenKind::Identifier {
            return Err(parser.unexpected("expected a field or method declaration"));
        }

        let feature = match parser.peek_kind() {
            TokenKind::Colon => Feature::Field(parse_field_decl(parser)?),
            TokenKind::OpenParen => Feature::Method(parse_method_decl(parser)?),
            _ => {
                parser.advance();
                return Err(parser.unexpected("expected `:` or `(` after feature name"));
            }
        };
        features.push(feature);
    }

    parser.expect(TokenKind::End)?;

    Ok(ClassDecl {
        name,
        features,
        span: parser.span_from(start),
    })
}

fn parse_field_decl(parser: &mut Parser) -> Result<FieldDecl, Error> {
    let name_token = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;
    let type_name = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(FieldDecl {
        name: name_token.value,
        type_name,
        span: parser.span_from(name_token.span.start),
    })
}

/// Parses a method or free function: `name(args)[: T]` followed by a
/// `do ... end` body, or by `;` for an externally linked one.
pub fn parse_method_decl(parser: &mut Parser) -> Result<MethodDecl, Error> {
    let name_token = parser.expect(TokenKind::Identifier)?;
    let arguments = parse_arguments(parser)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body: Option<BlockStmt> = match parser.current_token_kind() {
        TokenKind::Do => Some(parse_do_block(parser)?),
        TokenKind::Semicolon => {
            parser.advance();
            None
        },
        _ => return Err(parser.unexpected("expected `do` or `;` after method signature")),
    };

    Ok(MethodDecl {
        name: name_token.value,
        return_type,
        arguments,
        body,
        span: parser.span_from(name_token.span.start),
    })
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<Argument>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let name_token = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let type_name = parse_type(parser, BindingPower::Default)?;
        arguments.push(Argument {
            name: name_token.value,
            type_name,
            span: parser.span_from(name_token.span.start),
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(arguments)
}
