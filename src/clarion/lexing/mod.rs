//! Lexer
//!
//!     This module orchestrates the complete tokenization pipeline for
//!     Clarion source text. Lexing runs transformations over tokens: the
//!     base stage produces a flat stream with byte-accurate ranges, then
//!     each transformation receives a token vector and returns a token
//!     vector.
//!
//! The Lexing Pipeline
//!
//!     1. Core tokenization using the logos lexer. See
//!        [base_tokenization](base_tokenization). Each newline is a
//!        significant token — block termination in several grammar rules
//!        depends on seeing it — and whitespace is dropped here.
//!
//!     2. Line splicing. See [line_splicing](transformations::line_splicing).
//!        A trailing `|` continuation marker suppresses the following line
//!        break so physical lines splice into one logical line.
//!
//!     3. Keyword recognition. See
//!        [keyword_recognition](transformations::keyword_recognition).
//!        Identifier tokens are resolved against the case-insensitive
//!        keyword table; misses stay identifiers.
//!
//!     4. Channel split: comments are diverted onto a side channel so the
//!        parser stream never contains them and no parse rule has to
//!        special-case a comment in the middle of a clause. Hover tooling
//!        consumes the side channel directly.
//!
//!     The pipeline always terminates and always ends the parser stream
//!     with a well-formed EOF token, whatever the input.

pub mod base_tokenization;
pub mod common;
pub mod transformations;

pub use common::{LexError, LexerOutput};

use crate::clarion::ast::range::{Range, SourceLocation};
use crate::clarion::token::{Token, TokenKind};

/// Tokenize Clarion source text.
///
/// Total and terminating: malformed input produces unhandled tokens and lex
/// errors, never a failure. The returned token stream ends with an EOF
/// token.
pub fn tokenize(source: &str) -> LexerOutput {
    let locations = SourceLocation::new(source);

    let (tokens, mut errors) = base_tokenization::tokenize_base(source, &locations);
    let tokens = transformations::splice_lines(tokens, &mut errors);
    let tokens = transformations::recognize_keywords(tokens);

    let (mut tokens, comments): (Vec<Token>, Vec<Token>) = tokens
        .into_iter()
        .partition(|token| token.kind != TokenKind::Comment);

    let end = source.len();
    let eof_position = locations.byte_to_position(end);
    tokens.push(Token::new(
        TokenKind::Eof,
        "",
        Range::new(end..end, eof_position, eof_position),
    ));

    LexerOutput {
        tokens,
        comments,
        errors,
    }
}
