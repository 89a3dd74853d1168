//! End-to-end lexer tests over small Clarion samples
//!
//! These exercise the full pipeline: base tokenization, line splicing,
//! keyword recognition, and the comment side channel.

use clarion_parser::clarion::token::{Keyword, TokenKind};
use clarion_parser::tokenize;
use rstest::rstest;

#[test]
fn test_window_header_tokens() {
    let output = tokenize("MyWin WINDOW('Title'),AT(0,0,100,50),CENTER\n");
    assert!(output.errors.is_empty());

    let kinds: Vec<TokenKind> = output.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,               // MyWin
            TokenKind::Keyword(Keyword::Window), // WINDOW
            TokenKind::LeftParen,
            TokenKind::StringLit, // 'Title'
            TokenKind::RightParen,
            TokenKind::Comma,
            TokenKind::Keyword(Keyword::At),
            TokenKind::LeftParen,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::RightParen,
            TokenKind::Comma,
            TokenKind::Identifier, // CENTER is not a keyword
            TokenKind::LineBreak,
            TokenKind::Eof,
        ]
    );
}

#[rstest]
#[case("window")]
#[case("Window")]
#[case("WINDOW")]
#[case("wInDoW")]
fn test_keyword_recognition_ignores_case(#[case] spelling: &str) {
    let output = tokenize(spelling);
    assert_eq!(output.tokens[0].kind, TokenKind::Keyword(Keyword::Window));
    assert_eq!(output.tokens[0].text, spelling);
}

#[test]
fn test_continuation_splices_lines() {
    let source = "Win WINDOW('T'),AT(1,2), |\n    CENTER\nEND\n";
    let output = tokenize(source);
    assert!(output.errors.is_empty());

    // The break after the continuation is gone; CENTER joins the header line
    let break_count = output
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::LineBreak)
        .count();
    assert_eq!(break_count, 2);
}

#[test]
fn test_comments_never_reach_parser_stream() {
    let source = "x = 1 ! assign\n! full-line comment\ny = 2\n";
    let output = tokenize(source);

    assert_eq!(output.comments.len(), 2);
    assert!(output.tokens.iter().all(|t| t.kind != TokenKind::Comment));
    assert_eq!(output.comments[0].text, "! assign");
    assert_eq!(output.comments[1].text, "! full-line comment");
}

#[test]
fn test_comment_positions_preserved() {
    let output = tokenize("a\n! note\n");
    assert_eq!(output.comments[0].range.start.line, 2);
    assert_eq!(output.comments[0].range.start.column, 0);
}

#[test]
fn test_string_escaping() {
    let output = tokenize("'don''t panic'");
    assert_eq!(output.tokens[0].kind, TokenKind::StringLit);
    assert_eq!(
        output.tokens[0].string_value().as_deref(),
        Some("don't panic")
    );
}

#[test]
fn test_unterminated_string_recovers_at_line_end() {
    let output = tokenize("s = 'oops\nt = 'fine'\n");
    assert_eq!(output.errors.len(), 1);

    // The next line still lexes normally
    let strings: Vec<_> = output
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::StringLit)
        .collect();
    assert_eq!(strings.len(), 2);
    assert_eq!(strings[1].text, "'fine'");
}

#[test]
fn test_unrecognized_bytes_become_unhandled_tokens() {
    let output = tokenize("x @ $ y");
    assert_eq!(output.errors.len(), 2);
    let unhandled = output
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Unhandled)
        .count();
    assert_eq!(unhandled, 2);
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("'unterminated")]
#[case("@@@@")]
#[case("END END END")]
fn test_eof_token_for_any_input(#[case] source: &str) {
    let output = tokenize(source);
    assert!(output.tokens.last().unwrap().is_eof());
}

#[test]
fn test_one_based_lines_zero_based_columns() {
    let output = tokenize("A\n  B");
    let b = output.tokens.iter().find(|t| t.text == "B").unwrap();
    assert_eq!(b.range.start.line, 2);
    assert_eq!(b.range.start.column, 2);
}
