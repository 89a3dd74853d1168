//! Line splicing transformation
//!
//!     A `|` at the end of a physical line continues the logical line: the
//!     continuation marker and the following line break are both removed
//!     from the stream, so the parser sees one logical line. A comment may
//!     sit between the marker and the line break and survives the splice.
//!
//!     A `|` anywhere else matches no Clarion construct; it stays in the
//!     stream as an unhandled token and is reported as a lex error, which
//!     keeps the lexer total.

use super::super::base_tokenization::is_continuation;
use super::super::common::LexError;
use crate::clarion::token::{Token, TokenKind};

pub fn splice_lines(tokens: Vec<Token>, errors: &mut Vec<LexError>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    let mut pending: Vec<Token> = Vec::new();

    while let Some(token) = iter.next() {
        if !is_continuation(&token) {
            out.push(token);
            continue;
        }

        // Collect comments between the marker and the line break; they stay.
        pending.clear();
        while matches!(iter.peek(), Some(t) if t.kind == TokenKind::Comment) {
            if let Some(comment) = iter.next() {
                pending.push(comment);
            }
        }

        match iter.peek() {
            Some(t) if t.kind == TokenKind::LineBreak => {
                iter.next(); // drop the line break: lines are spliced
                out.append(&mut pending);
            }
            None => {
                // Continuation at end of input: nothing to splice, drop it.
                out.append(&mut pending);
            }
            Some(_) => {
                errors.push(LexError::UnrecognizedCharacter {
                    text: token.text.clone(),
                    range: token.range.clone(),
                });
                out.push(token);
                out.append(&mut pending);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarion::ast::range::SourceLocation;
    use crate::clarion::lexing::base_tokenization::tokenize_base;

    fn splice(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let locations = SourceLocation::new(source);
        let (tokens, mut errors) = tokenize_base(source, &locations);
        let tokens = splice_lines(tokens, &mut errors);
        (tokens, errors)
    }

    #[test]
    fn test_trailing_continuation_splices_lines() {
        let (tokens, errors) = splice("WINDOW('t'),AT(1,2), |\n  CENTER\n");
        assert!(errors.is_empty());
        // No line break between the comma and CENTER
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        let center_pos = tokens.iter().position(|t| t.text == "CENTER").unwrap();
        assert!(!kinds[..center_pos].contains(&TokenKind::LineBreak));
        // The final line break survives
        assert_eq!(tokens.last().unwrap().kind, TokenKind::LineBreak);
    }

    #[test]
    fn test_continuation_with_trailing_comment() {
        let (tokens, errors) = splice("a + |  ! carry on\nb\n");
        assert!(errors.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Plus,
                TokenKind::Comment,
                TokenKind::Identifier,
                TokenKind::LineBreak,
            ]
        );
    }

    #[test]
    fn test_mid_line_pipe_is_unhandled() {
        let (tokens, errors) = splice("a | b\n");
        assert_eq!(errors.len(), 1);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Unhandled));
        // Line break is untouched
        assert!(tokens.iter().any(|t| t.kind == TokenKind::LineBreak));
    }

    #[test]
    fn test_continuation_at_end_of_input() {
        let (tokens, errors) = splice("a |");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "a");
    }
}
