//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Named types (`Integer`, `Counter`)
//! - Array types (`T[]`)
//! - Pointer types (`T*`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers for parsing suffixed type expressions.

use std::collections::HashMap;

use crate::{
    ast::types::{TypeName, TypeNameKind},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeName, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, TypeName, BindingPower) -> Result<TypeName, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_array_type);
    parser.type_led(TokenKind::Star, BindingPower::Call, parse_pointer_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeName, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(TypeName::named(token.value, token.span))
}

pub fn parse_array_type(
    parser: &mut Parser,
    left: TypeName,
    _bp: BindingPower,
) -> Result<TypeName, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeName {
        span: parser.span_from(left.span.start.clone()),
        kind: TypeNameKind::Array(Box::new(left)),
    })
}

pub fn parse_pointer_type(
    parser: &mut Parser,
    left: TypeName,
    _bp: BindingPower,
) -> Result<TypeName, Error> {
    parser.expect(TokenKind::Star)?;

    Ok(TypeName {
        span: parser.span_from(left.span.start.clone()),
        kind: TypeNameKind::Pointer(Box::new(left)),
    })
}

/// Whether the current token continues the type being parsed.
///
/// `[` only starts an array suffix when it is immediately closed, so that
/// `new Integer[n]` leaves the size for the caller. `*` is a multiplication
/// rather than a pointer suffix when an operand follows it, as in `x as Integer * 2`.
fn continues_type(parser: &Parser) -> bool {
    match parser.current_token_kind() {
        TokenKind::OpenBracket => parser.peek_kind() == TokenKind::CloseBracket,
        TokenKind::Star => !parser.get_nud_lookup().contains_key(&parser.peek_kind()),
        _ => true,
    }
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeName, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected("expected a type")),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while *parser
        .get_type_bp_lookup()
        .get(&parser.current_token_kind())
        .unwrap_or(&BindingPower::Default)
        > bp
        && continues_type(parser)
    {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_type_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected("expected a type suffix")),
        };
        let led_bp = *parser.get_type_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);

        left = led(parser, left, led_bp)?;
    }

    Ok(left)
}
