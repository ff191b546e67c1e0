use chemlang_lexer::{RawToken, lex};

#[test]
fn lexes_a_quantity_literal() {
    let tokens = lex("10.00 g H2O").unwrap();
    let values: Vec<_> = tokens.into_iter().map(|t| t.value).collect();
    assert_eq!(
        values,
        vec![
            RawToken::Number("10.00".to_string()),
            RawToken::Word("g".to_string()),
            RawToken::Word("H2O".to_string()),
        ]
    );
}

#[test]
fn lexes_formula_with_braces_and_parens() {
    let tokens = lex("Fe(NO3)_{2}").unwrap();
    let values: Vec<_> = tokens.into_iter().map(|t| t.value).collect();
    assert_eq!(
        values,
        vec![
            RawToken::Word("Fe".to_string()),
            RawToken::LParen,
            RawToken::Word("NO3".to_string()),
            RawToken::RParen,
            RawToken::Underscore,
            RawToken::LBrace,
            RawToken::Number("2".to_string()),
            RawToken::RBrace,
        ]
    );
}

#[test]
fn comment_runs_to_end_of_line() {
    let tokens = lex("1 + 1 ps this is ignored\n2").unwrap();
    let values: Vec<_> = tokens.into_iter().map(|t| t.value).collect();
    assert_eq!(
        values,
        vec![
            RawToken::Number("1".to_string()),
            RawToken::Plus,
            RawToken::Number("1".to_string()),
            RawToken::Newline,
            RawToken::Number("2".to_string()),
        ]
    );
}

#[test]
fn escaped_identifier_strips_backticks() {
    let tokens = lex("`s`").unwrap();
    let values: Vec<_> = tokens.into_iter().map(|t| t.value).collect();
    assert_eq!(values, vec![RawToken::EscapedWord("s".to_string())]);
}

#[test]
fn arrow_is_a_single_token_not_minus_then_gt() {
    let tokens = lex("5 m -> cm").unwrap();
    let values: Vec<_> = tokens.into_iter().map(|t| t.value).collect();
    assert_eq!(
        values,
        vec![
            RawToken::Number("5".to_string()),
            RawToken::Word("m".to_string()),
            RawToken::Arrow,
            RawToken::Word("cm".to_string()),
        ]
    );
}

#[test]
fn unexpected_character_is_an_error() {
    assert!(lex("5 @ 2").is_err());
}
