//! Base tokenization using the logos lexer
//!
//!     First stage of the lexing pipeline: raw source text to a flat token
//!     stream with byte-accurate ranges. No keyword knowledge lives here —
//!     identifiers come out as identifiers and are resolved against the
//!     keyword table in a later transformation, so the lexer states never
//!     change when the keyword set does.
//!
//!     Newlines are significant and tokenized individually; whitespace and
//!     comments are kept in the stream at this stage so the line-splicing
//!     transformation can see them, and are routed off the parser stream at
//!     the end of the pipeline.
//!
//! String Literals
//!
//!     Single-quote delimited with doubled-quote escaping (`''` is a literal
//!     quote). An unterminated literal still yields a token spanning to end
//!     of line, plus a [`LexError::UnterminatedString`].

use logos::Logos;

use super::common::LexError;
use crate::clarion::ast::range::SourceLocation;
use crate::clarion::token::{Token, TokenKind};

/// Raw terminals recognized by the generated lexer.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum RawToken {
    #[regex(r"[ \t\r\x0c]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    // Comments run from the marker to end of line
    #[regex(r"![^\n]*")]
    Comment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"'([^'\n]|'')*'", priority = 3)]
    StringLit,

    #[regex(r"'([^'\n]|'')*", priority = 2)]
    UnterminatedString,

    // Trailing `|` splices physical lines; handled by the line-splicing
    // transformation
    #[token("|")]
    Continuation,

    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Equals,
    #[token("<=")]
    LessOrEqual,
    #[token(">=")]
    GreaterOrEqual,
    #[token("<>")]
    NotEqual,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,
    #[token("&")]
    Ampersand,
    #[token("?")]
    QuestionMark,
}

/// Marker kind used between pipeline stages for the continuation token.
/// It never reaches the parser: line splicing either consumes it or downgrades
/// it to [`TokenKind::Unhandled`].
pub(super) const CONTINUATION_TEXT: &str = "|";

pub(super) fn is_continuation(token: &Token) -> bool {
    token.kind == TokenKind::Unhandled && token.text == CONTINUATION_TEXT
}

/// Tokenize source text into a flat stream.
///
/// Total: any input produces a token vector; malformed pieces become
/// [`TokenKind::Unhandled`] tokens with a matching [`LexError`].
pub(super) fn tokenize_base(
    source: &str,
    locations: &SourceLocation,
) -> (Vec<Token>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (result, span) in RawToken::lexer(source).spanned() {
        let text = &source[span.clone()];
        let range = locations.byte_range_to_range(&span);

        let kind = match result {
            // Whitespace carries no information later stages need beyond
            // adjacency, which byte spans already give.
            Ok(RawToken::Whitespace) => continue,
            Ok(RawToken::Newline) => TokenKind::LineBreak,
            Ok(RawToken::Comment) => TokenKind::Comment,
            Ok(RawToken::Identifier) => TokenKind::Identifier,
            Ok(RawToken::Number) => TokenKind::Number,
            Ok(RawToken::StringLit) => TokenKind::StringLit,
            Ok(RawToken::UnterminatedString) => {
                errors.push(LexError::UnterminatedString {
                    range: range.clone(),
                });
                TokenKind::StringLit
            }
            Ok(RawToken::Continuation) => TokenKind::Unhandled,
            Ok(RawToken::Comma) => TokenKind::Comma,
            Ok(RawToken::Semicolon) => TokenKind::Semicolon,
            Ok(RawToken::LeftParen) => TokenKind::LeftParen,
            Ok(RawToken::RightParen) => TokenKind::RightParen,
            Ok(RawToken::LeftBrace) => TokenKind::LeftBrace,
            Ok(RawToken::RightBrace) => TokenKind::RightBrace,
            Ok(RawToken::Colon) => TokenKind::Colon,
            Ok(RawToken::Dot) => TokenKind::Dot,
            Ok(RawToken::Plus) => TokenKind::Plus,
            Ok(RawToken::Minus) => TokenKind::Minus,
            Ok(RawToken::Star) => TokenKind::Star,
            Ok(RawToken::Slash) => TokenKind::Slash,
            Ok(RawToken::Equals) => TokenKind::Equals,
            Ok(RawToken::LessOrEqual) => TokenKind::LessOrEqual,
            Ok(RawToken::GreaterOrEqual) => TokenKind::GreaterOrEqual,
            Ok(RawToken::NotEqual) => TokenKind::NotEqual,
            Ok(RawToken::LessThan) => TokenKind::LessThan,
            Ok(RawToken::GreaterThan) => TokenKind::GreaterThan,
            Ok(RawToken::Ampersand) => TokenKind::Ampersand,
            Ok(RawToken::QuestionMark) => TokenKind::QuestionMark,
            Err(()) => {
                errors.push(LexError::UnrecognizedCharacter {
                    text: text.to_string(),
                    range: range.clone(),
                });
                TokenKind::Unhandled
            }
        };

        tokens.push(Token::new(kind, text, range));
    }

    (tokens, errors)
}
