use crate::{
    ast::expressions::{
        AddressOfExpr, ArrayNewExpr, BinaryExpr, BinaryOperator, BooleanExpr, CallExpr, CastExpr,
        Expr, IndexExpr, MemberExpr, NumberExpr, PrefixExpr, SymbolExpr, UnaryOperator,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected("expected an expression")),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while *parser.get_bp_lookup().get(&parser.current_token_kind()).unwrap_or(&BindingPower::Default) > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected("expected an operator")),
        };
        let led_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);

        left = led(parser, left, led_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance().clone();
            match token.value.parse::<u64>() {
                Ok(value) if value <= i64::MIN.unsigned_abs() => {
                    Ok(Expr::Number(NumberExpr { value, span: token.span }))
                },
                _ => Err(Error::new(ErrorImpl::NumberParseError { token: token.value }, token.span)),
            }
        },
        TokenKind::Identifier => {
            if parser.peek_kind() == TokenKind::OpenParen {
                return parse_call(parser, None);
            }
            let token = parser.advance().clone();
            Ok(Expr::Symbol(SymbolExpr { value: token.value, span: token.span }))
        },
        TokenKind::True | TokenKind::False => {
            let token = parser.advance().clone();
            Ok(Expr::Boolean(BooleanExpr { value: token.kind == TokenKind::True, span: token.span }))
        },
        TokenKind::This => {
            Ok(Expr::This(parser.advance().span.clone()))
        },
        _ => {
            Err(parser.unexpected("expected a literal or a name"))
        }
    }
}

/// Parses `name(args)` with the cursor on `name`; `target` is the receiver for `target.name(args)`.
fn parse_call(parser: &mut Parser, target: Option<Box<Expr>>) -> Result<Expr, Error> {
    let name_token = parser.expect(TokenKind::Identifier)?;
    let start = match &target {
        Some(target) => target.get_span().start.clone(),
        None => name_token.span.start.clone(),
    };

    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        target,
        name: name_token.value,
        arguments,
        span: parser.span_from(start),
    }))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Dash => Some(BinaryOperator::Subtract),
        TokenKind::Star => Some(BinaryOperator::Multiply),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::Percent => Some(BinaryOperator::Modulo),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEquals => Some(BinaryOperator::LessEquals),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEquals => Some(BinaryOperator::GreaterEquals),
        TokenKind::Equals => Some(BinaryOperator::Equals),
        TokenKind::NotEquals => Some(BinaryOperator::NotEquals),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = match binary_operator(parser.current_token_kind()) {
        Some(operator) => operator,
        None => return Err(parser.unexpected("expected a binary operator")),
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = if operator_token.kind == TokenKind::Not {
        UnaryOperator::Not
    } else {
        UnaryOperator::Negate
    };
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: operator_token.span.to(rhs.get_span()),
        operator,
        right_expr: Box::new(rhs),
    }))
}

pub fn parse_address_of_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::AddressOf(AddressOfExpr {
        span: parser.span_from(start),
        operand: Box::new(operand),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_array_new_expr(parser: &mut Parser) -> Result<Expr, Error> {
    // new Integer[size]
    let start = parser.advance().span.start.clone();
    let element_type = parse_type(parser, BindingPower::Default)?;

    parser.expect(TokenKind::OpenBracket)?;
    let size = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::ArrayNew(ArrayNewExpr {
        element_type,
        size: Box::new(size),
        span: parser.span_from(start),
    }))
}

pub fn parse_cast_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let target = parse_type(parser, BindingPower::Default)?;

    Ok(Expr::Cast(CastExpr {
        span: parser.span_from(left.get_span().start.clone()),
        value: Box::new(left),
        target,
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    if parser.peek_kind() == TokenKind::OpenParen {
        return parse_call(parser, Some(Box::new(left)));
    }

    let member = parser.expect(TokenKind::Identifier)?;

    Ok(Expr::Member(MemberExpr {
        span: left.get_span().to(&member.span),
        target: Box::new(left),
        name: member.value,
    }))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Index(IndexExpr {
        span: parser.span_from(left.get_span().start.clone()),
        array: Box::new(left),
        index: Box::new(index),
    }))
}
