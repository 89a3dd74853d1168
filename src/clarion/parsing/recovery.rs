//! Diagnostics emission and resynchronization
//!
//! Every rule that fails to match its expected leading tokens goes through
//! one of these helpers: emit a structured diagnostic, then either skip to
//! a safe boundary (next line break, END, or recognized top-level keyword)
//! and hand back an opaque node, or let the enclosing block rule close
//! early on a synthetic end.

use log::trace;

use super::Parser;
use crate::clarion::ast::diagnostics::{codes, Diagnostic, DiagnosticSeverity};
use crate::clarion::ast::elements::UnknownContent;
use crate::clarion::ast::range::Range;
use crate::clarion::ast::traits::AstNode;
use crate::clarion::token::{Keyword, TokenKind};

impl Parser<'_> {
    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    pub(crate) fn error_expected(&mut self, expected: TokenKind, context: &str) {
        let found = self.cursor.peek();
        let diagnostic = Diagnostic::error(
            found.range.clone(),
            format!("Expected {expected} in {context}, found {}", found.kind),
        )
        .with_code(codes::EXPECTED_TOKEN)
        .with_expected_found(&expected, &found.kind);
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn error_missing_end(&mut self, construct: &str) {
        let found = self.cursor.peek();
        let diagnostic = Diagnostic::error(
            found.range.clone(),
            format!("{construct} has no matching END; inserted a synthetic end"),
        )
        .with_code(codes::MISSING_END)
        .with_expected_found(&TokenKind::Keyword(Keyword::End), &found.kind);
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn error_stray_end(&mut self, range: Range) {
        let diagnostic = Diagnostic::error(range, "END does not close any open block".to_string())
            .with_code(codes::STRAY_END);
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn warn_unknown_content(&mut self, node: &UnknownContent, context: &str) {
        let diagnostic = Diagnostic::new(
            node.location.clone(),
            DiagnosticSeverity::Warning,
            format!("Unrecognized content in {context}: {}", node.display_label()),
        )
        .with_code(codes::UNKNOWN_CONTENT);
        self.diagnostics.push(diagnostic);
    }

    // ------------------------------------------------------------------
    // Token expectations
    // ------------------------------------------------------------------

    /// Consume the expected token, or emit a diagnostic and stay put.
    pub(crate) fn expect(&mut self, kind: TokenKind, context: &str) -> Option<Range> {
        if let Some(token) = self.cursor.consume(kind) {
            return Some(token.range);
        }
        self.error_expected(kind, context);
        None
    }

    /// Close a block: consume END, or record the missing end and return a
    /// zero-width synthetic end at the current position. The block node is
    /// always terminated either way.
    pub(crate) fn expect_end(&mut self, construct: &str) -> Range {
        if let Some(token) = self.cursor.consume_keyword(Keyword::End) {
            return token.range;
        }
        trace!("missing END for {construct}, inserting synthetic end");
        self.error_missing_end(construct);
        self.cursor.prev_range()
    }

    // ------------------------------------------------------------------
    // Resynchronization
    // ------------------------------------------------------------------

    /// Consume tokens up to (not including) the next statement separator
    /// and wrap them as an opaque node. Consumes nothing when already at a
    /// separator, so callers must have made progress of their own first.
    pub(crate) fn unknown_to_line_end(&mut self) -> UnknownContent {
        self.skip_unknown(|parser| parser.cursor.peek().is_statement_separator())
    }

    /// Like [`Parser::unknown_to_line_end`] but also stops before END and
    /// list separators, so an enclosing block rule can still close itself.
    pub(crate) fn unknown_in_block(&mut self) -> UnknownContent {
        self.skip_unknown(|parser| {
            parser.cursor.peek().is_list_separator()
                || parser.cursor.peek().is_keyword(Keyword::End)
        })
    }

    fn skip_unknown(&mut self, stop: impl Fn(&Parser<'_>) -> bool) -> UnknownContent {
        let first = self.cursor.peek().range.clone();
        let mut end = first.clone();
        let mut consumed = false;

        while !self.cursor.at_eof() && !stop(self) {
            end = self.cursor.bump().range;
            consumed = true;
        }

        let location = if consumed {
            first.through(&end)
        } else {
            Range::new(first.span.start..first.span.start, first.start, first.start)
        };
        let text = location
            .source_slice(self.source)
            .unwrap_or_default()
            .to_string();
        UnknownContent::new(text, location)
    }

    // ------------------------------------------------------------------
    // Span helpers
    // ------------------------------------------------------------------

    /// Bounding range from a node's opening range to the most recently
    /// consumed token.
    pub(crate) fn close_span(&self, open: &Range) -> Range {
        open.through(&self.cursor.prev_range())
    }
}
