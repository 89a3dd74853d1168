//! Keyword recognition transformation
//!
//!     Resolves identifier tokens against the keyword table. The match is
//!     case-insensitive and purely table-driven: the base lexer knows
//!     nothing about keywords, so dialect additions never touch lexer
//!     states. Identifiers that match no table row pass through unchanged.

use crate::clarion::token::{Keyword, Token, TokenKind};

pub fn recognize_keywords(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|mut token| {
            if token.kind == TokenKind::Identifier {
                if let Some(keyword) = Keyword::lookup(&token.text) {
                    token.kind = TokenKind::Keyword(keyword);
                }
            }
            token
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarion::ast::range::Range;

    fn ident(text: &str) -> Token {
        Token::new(TokenKind::Identifier, text, Range::default())
    }

    #[test]
    fn test_keywords_recognized_case_insensitively() {
        let tokens = recognize_keywords(vec![ident("window"), ident("End"), ident("LOOP")]);
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Window));
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::End));
        assert_eq!(tokens[2].kind, TokenKind::Keyword(Keyword::Loop));
    }

    #[test]
    fn test_plain_identifiers_untouched() {
        let tokens = recognize_keywords(vec![ident("MyWin"), ident("ENTRY")]);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_original_text_preserved() {
        let tokens = recognize_keywords(vec![ident("window")]);
        assert_eq!(tokens[0].text, "window");
    }

    #[test]
    fn test_non_identifiers_skipped() {
        let tokens = recognize_keywords(vec![Token::new(
            TokenKind::StringLit,
            "'window'",
            Range::default(),
        )]);
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
    }
}
