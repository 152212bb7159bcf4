//! Unit tests for the lexer module.

use super::lexer::tokenize;
use super::tokens::TokenKind;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.cls".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_identifiers_and_numbers() {
    let tokens = tokenize("counter 42".to_string(), None).unwrap();

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "counter");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].value, "42");
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("class do end if then else while return var new as this true false and or not"),
        vec![
            TokenKind::Class,
            TokenKind::Do,
            TokenKind::End,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Return,
            TokenKind::Var,
            TokenKind::New,
            TokenKind::As,
            TokenKind::This,
            TokenKind::True,
            TokenKind::False,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_multi_character_operators() {
    assert_eq!(
        kinds("n := a <= b >= c == d != e : f"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Identifier,
            TokenKind::LessEquals,
            TokenKind::Identifier,
            TokenKind::GreaterEquals,
            TokenKind::Identifier,
            TokenKind::Equals,
            TokenKind::Identifier,
            TokenKind::NotEquals,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("a.b(c, &d)[1]; x * y / z % w - v + u"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::Ampersand,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::OpenBracket,
            TokenKind::Number,
            TokenKind::CloseBracket,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::Star,
            TokenKind::Identifier,
            TokenKind::Slash,
            TokenKind::Identifier,
            TokenKind::Percent,
            TokenKind::Identifier,
            TokenKind::Dash,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("x // the rest is ignored := 5\ny"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EOF]
    );
}

#[test]
fn test_positions_track_lines_and_columns() {
    let tokens = tokenize("class A\n  n: Integer;\nend".to_string(), Some("a.cls".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[0].span.start.column, 1);
    assert_eq!(tokens[1].span.start.column, 7);

    let n = &tokens[2];
    assert_eq!(n.value, "n");
    assert_eq!(n.span.start.line, 2);
    assert_eq!(n.span.start.column, 3);
    assert_eq!(n.span.end.column, 4);

    let end = &tokens[6];
    assert_eq!(end.kind, TokenKind::End);
    assert_eq!(end.span.start.line, 3);
    assert_eq!(*end.span.start.file, "a.cls");
}

#[test]
fn test_unrecognised_token() {
    let result = tokenize("x := #".to_string(), None);

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_span().first_column(), 6);
}
