//! Token cursor with bounded lookahead and rollback
//!
//! The parser's only view of the token stream. Disambiguation is done by
//! peeking a fixed number of tokens ahead; where peeking cannot decide, a
//! rule saves the cursor position, tries an alternative, and restores on a
//! mismatch — try/rollback over a position, never exceptions for control
//! flow.
//!
//! The cursor never runs past the trailing EOF token: `bump` at the end is
//! a no-op, so every loop terminates by checking [`TokenCursor::at_eof`].

use crate::clarion::ast::range::Range;
use crate::clarion::token::{Keyword, Token, TokenKind};

pub(crate) struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Fallback for an empty stream; `tokenize` always appends an EOF token,
    /// so this only matters for cursors built in tests.
    eof: Token,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, "", Range::default()),
        }
    }

    pub fn peek(&self) -> &Token {
        self.token_at(self.pos)
    }

    /// Look `n` tokens ahead; clamped to the trailing EOF.
    pub fn peek_at(&self, n: usize) -> &Token {
        self.token_at(self.pos + n)
    }

    fn token_at(&self, index: usize) -> &Token {
        if self.tokens.is_empty() {
            return &self.eof;
        }
        let clamped = index.min(self.tokens.len() - 1);
        &self.tokens[clamped]
    }

    pub fn kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub fn at_keyword(&self, keyword: Keyword) -> bool {
        self.kind() == TokenKind::Keyword(keyword)
    }

    /// Consume and return the current token. At EOF this returns the EOF
    /// token without moving.
    pub fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        } else if !self.tokens.is_empty() {
            self.pos = self.tokens.len() - 1;
        }
        token
    }

    pub fn consume(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) && !self.at_eof() {
            Some(self.bump())
        } else {
            None
        }
    }

    pub fn consume_keyword(&mut self, keyword: Keyword) -> Option<Token> {
        self.consume(TokenKind::Keyword(keyword))
    }

    /// Current position, for [`TokenCursor::restore`].
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Roll back to a previously saved position.
    pub fn restore(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len().saturating_sub(1));
    }

    /// Range of the most recently consumed token; zero-width at the current
    /// token when nothing has been consumed yet.
    pub fn prev_range(&self) -> Range {
        if self.pos == 0 {
            let start = self.peek().range.clone();
            return Range::new(
                start.span.start..start.span.start,
                start.start,
                start.start,
            );
        }
        self.tokens[self.pos - 1].range.clone()
    }

    /// Skip line breaks and semicolons.
    pub fn skip_statement_separators(&mut self) {
        while self.peek().is_statement_separator() && !self.at_eof() {
            self.bump();
        }
    }

    /// Skip commas, line breaks, and semicolons.
    pub fn skip_list_separators(&mut self) {
        while self.peek().is_list_separator() && !self.at_eof() {
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarion::lexing::tokenize;

    fn cursor_for(tokens: &[Token]) -> TokenCursor<'_> {
        TokenCursor::new(tokens)
    }

    #[test]
    fn test_bump_stops_at_eof() {
        let output = tokenize("A");
        let mut cursor = cursor_for(&output.tokens);
        cursor.bump(); // A
        assert!(cursor.at_eof());
        let eof = cursor.bump();
        assert!(eof.is_eof());
        assert!(cursor.at_eof());
    }

    #[test]
    fn test_peek_at_clamps() {
        let output = tokenize("A B");
        let cursor = cursor_for(&output.tokens);
        assert_eq!(cursor.peek_at(0).text, "A");
        assert_eq!(cursor.peek_at(1).text, "B");
        assert!(cursor.peek_at(10).is_eof());
    }

    #[test]
    fn test_save_restore() {
        let output = tokenize("A B C");
        let mut cursor = cursor_for(&output.tokens);
        let saved = cursor.position();
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.peek().text, "C");
        cursor.restore(saved);
        assert_eq!(cursor.peek().text, "A");
    }

    #[test]
    fn test_consume_keyword() {
        let output = tokenize("END x");
        let mut cursor = cursor_for(&output.tokens);
        assert!(cursor.consume_keyword(Keyword::Loop).is_none());
        assert!(cursor.consume_keyword(Keyword::End).is_some());
        assert_eq!(cursor.peek().text, "x");
    }

    #[test]
    fn test_empty_stream_is_total() {
        let tokens: Vec<Token> = Vec::new();
        let mut cursor = cursor_for(&tokens);
        assert!(cursor.at_eof());
        assert!(cursor.bump().is_eof());
        assert_eq!(cursor.prev_range(), Range::default());
    }

    #[test]
    fn test_skip_separators() {
        let output = tokenize("\n;\n,A");
        let mut cursor = cursor_for(&output.tokens);
        cursor.skip_statement_separators();
        assert!(cursor.at(TokenKind::Comma));
        cursor.skip_list_separators();
        assert_eq!(cursor.peek().text, "A");
    }
}
