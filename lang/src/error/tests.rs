use std::io;

use super::*;
use crate::parser::ParseError;
use expect_test::expect;

fn parse_error(message: &str, line: u32, column: u32) -> ParseError {
    ParseError {
        message: message.to_string(),
        line,
        column,
    }
}

#[test]
fn parse_error_display() {
    let err = FernError::Parse(vec![parse_error(
        "expected next token to be IDENTIFIER, got ASSIGN instead",
        1,
        5,
    )]);
    let display = format!("{}", err);
    expect![[r#"expected next token to be IDENTIFIER, got ASSIGN instead"#]].assert_eq(&display);
}

#[test]
fn parse_errors_display_one_per_line() {
    let err = FernError::Parse(vec![
        parse_error("no prefix parse function for ASSIGN found", 1, 3),
        parse_error("expected next token to be RIGHT_PARENTHESIS, got EOF instead", 1, 9),
    ]);
    let display = format!("{}", err);
    expect![[r#"
        no prefix parse function for ASSIGN found
        expected next token to be RIGHT_PARENTHESIS, got EOF instead"#]]
    .assert_eq(&display);
}

#[test]
fn io_error_display() {
    let err = FernError::from(io::Error::new(io::ErrorKind::NotFound, "missing.fern"));
    let display = format!("{}", err);
    expect![[r#"I/O error: missing.fern"#]].assert_eq(&display);
}

#[test]
fn error_kinds() {
    assert_eq!(FernError::Parse(Vec::new()).kind(), "ParseError");
    let io_err = FernError::from(io::Error::new(io::ErrorKind::NotFound, "nope"));
    assert_eq!(io_err.kind(), "IoError");
}

#[test]
fn from_parse_error_list() {
    let errors = vec![parse_error("no prefix parse function for ILLEGAL found", 2, 1)];
    let err = FernError::from(errors);
    assert_eq!(err.kind(), "ParseError");
}
