//! Diagnostic collection for syntax errors
//!
//! Structured error and warning information shaped for LSP consumption:
//! the hosting tool maps these directly onto editor squiggles.
//!
//! The taxonomy mirrors how the engine recovers:
//! - lex errors (unterminated string, unrecognized character) always leave
//!   a best-effort token behind and are mirrored here;
//! - syntax errors (expected token not found, missing end-marker) are
//!   recovered by resynchronization, so the tree is still produced;
//! - structural errors (an END closing the wrong block) are recovered by
//!   closing the innermost block and letting a later END or end-of-file
//!   close the outer one.
//!
//! There are no fatal errors: a parse always returns a tree plus this list.

use serde::Serialize;
use std::fmt;

use super::range::Range;
use crate::clarion::lexing::LexError;
use crate::clarion::token::TokenKind;

/// Diagnostic severity levels matching the LSP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
            DiagnosticSeverity::Hint => write!(f, "hint"),
        }
    }
}

/// Stable diagnostic codes, one per defect class.
pub mod codes {
    pub const UNTERMINATED_STRING: &str = "unterminated-string";
    pub const UNRECOGNIZED_CHARACTER: &str = "unrecognized-character";
    pub const EXPECTED_TOKEN: &str = "expected-token";
    pub const MISSING_END: &str = "missing-end";
    pub const STRAY_END: &str = "stray-end";
    pub const UNKNOWN_CONTENT: &str = "unknown-content";
}

/// Structured diagnostic for LSP consumption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub code: Option<String>,
    /// Token kind the failing rule expected, when one applies
    pub expected: Option<String>,
    /// Token kind actually found at the failure position
    pub found: Option<String>,
    pub source: String,
}

impl Diagnostic {
    pub fn new(range: Range, severity: DiagnosticSeverity, message: String) -> Self {
        Self {
            range,
            severity,
            message,
            code: None,
            expected: None,
            found: None,
            source: "clarion-parser".to_string(),
        }
    }

    pub fn error(range: Range, message: impl Into<String>) -> Self {
        Self::new(range, DiagnosticSeverity::Error, message.into())
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_expected_found(mut self, expected: &TokenKind, found: &TokenKind) -> Self {
        self.expected = Some(expected.to_string());
        self.found = Some(found.to_string());
        self
    }

    pub fn with_found(mut self, found: &TokenKind) -> Self {
        self.found = Some(found.to_string());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} at {}",
            self.severity, self.source, self.message, self.range.start
        )
    }
}

impl From<&LexError> for Diagnostic {
    fn from(error: &LexError) -> Self {
        let code = match error {
            LexError::UnterminatedString { .. } => codes::UNTERMINATED_STRING,
            LexError::UnrecognizedCharacter { .. } => codes::UNRECOGNIZED_CHARACTER,
        };
        Diagnostic::error(error.range().clone(), error.to_string()).with_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarion::ast::range::Position;

    #[test]
    fn test_diagnostic_builder() {
        let range = Range::new(0..10, Position::new(1, 0), Position::new(1, 10));
        let diag = Diagnostic::error(range, "expected END")
            .with_code(codes::MISSING_END)
            .with_expected_found(
                &TokenKind::Keyword(crate::clarion::token::Keyword::End),
                &TokenKind::Eof,
            );

        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.code.as_deref(), Some("missing-end"));
        assert_eq!(diag.expected.as_deref(), Some("keyword END"));
        assert_eq!(diag.found.as_deref(), Some("end of file"));
        assert_eq!(diag.source, "clarion-parser");
    }

    #[test]
    fn test_lex_error_conversion() {
        let range = Range::new(3..8, Position::new(1, 3), Position::new(1, 8));
        let error = LexError::UnterminatedString {
            range: range.clone(),
        };
        let diag = Diagnostic::from(&error);
        assert_eq!(diag.code.as_deref(), Some("unterminated-string"));
        assert_eq!(diag.range, range);
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
    }

    #[test]
    fn test_display_format() {
        let range = Range::new(0..1, Position::new(2, 4), Position::new(2, 5));
        let diag = Diagnostic::error(range, "unexpected token");
        assert_eq!(
            diag.to_string(),
            "error [clarion-parser]: unexpected token at 2:4"
        );
    }
}
