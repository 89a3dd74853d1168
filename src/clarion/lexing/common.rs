//! Common lexer module
//!
//! Shared output and error types for the lexing pipeline.

use serde::Serialize;
use std::fmt;

use crate::clarion::ast::range::Range;
use crate::clarion::token::Token;

/// Output from the lexing pipeline.
///
/// `tokens` is the significant stream the parser consumes: line breaks are
/// kept (block termination depends on them), comments and whitespace are
/// not. Comments travel on their own channel so the parser never has to
/// special-case them; hover tooling reads them from here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LexerOutput {
    pub tokens: Vec<Token>,
    pub comments: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Errors that can occur during lexing.
///
/// Lexing is total: every error still yields a best-effort token, so the
/// parser can attempt recovery instead of aborting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LexError {
    /// A string literal with no closing quote before end of line
    UnterminatedString { range: Range },
    /// A byte sequence matching no token rule
    UnrecognizedCharacter { text: String, range: Range },
}

impl LexError {
    pub fn range(&self) -> &Range {
        match self {
            LexError::UnterminatedString { range } => range,
            LexError::UnrecognizedCharacter { range, .. } => range,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedString { range } => {
                write!(f, "Unterminated string literal at {}", range.start)
            }
            LexError::UnrecognizedCharacter { text, range } => {
                write!(f, "Unrecognized character {:?} at {}", text, range.start)
            }
        }
    }
}

impl std::error::Error for LexError {}
