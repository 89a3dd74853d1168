//! Core token types shared across the lexer, parser, and tooling.
//!
//!     A token is a tagged unit produced by the lexer: a kind, the literal
//!     source text, and the range it was cut from. Tokens are immutable once
//!     produced.
//!
//! Keyword Handling
//!
//!     Clarion keywords are case-insensitive and double as ordinary
//!     identifiers in many contexts. The lexer therefore never hardcodes
//!     keywords into its states: identifiers are matched maximal-munch and
//!     then resolved against the keyword table below. Adding a dialect
//!     keyword means adding one table row, nothing else.
//!
//!     The parser is the one that decides whether a keyword token acts as a
//!     keyword or as a plain name at any given position; see
//!     [`Token::identifier_text`].

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::clarion::ast::range::Range;

/// All recognized Clarion keywords.
///
/// One variant per keyword; the table in [`Keyword::lookup`] is the single
/// source of truth for spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    // Program structure
    Program,
    Member,
    Map,
    Module,
    Procedure,
    Function,
    Routine,
    Data,
    Code,
    End,
    Return,
    Do,
    // Control flow
    If,
    Then,
    Elsif,
    Else,
    Case,
    Of,
    Loop,
    // Reserved expression roots
    SelfRef,
    ParentRef,
    // Data declarations
    Group,
    Queue,
    Class,
    File,
    Record,
    Key,
    Equate,
    Include,
    // UI structures
    Window,
    Application,
    Menubar,
    Menu,
    Item,
    Separator,
    Toolbar,
    Button,
    Sheet,
    Tab,
    Option,
    // Attribute clauses
    At,
    Use,
    Msg,
    Std,
    Font,
    Pre,
}

static KEYWORD_TABLE: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    use Keyword::*;
    HashMap::from([
        ("PROGRAM", Program),
        ("MEMBER", Member),
        ("MAP", Map),
        ("MODULE", Module),
        ("PROCEDURE", Procedure),
        ("FUNCTION", Function),
        ("ROUTINE", Routine),
        ("DATA", Data),
        ("CODE", Code),
        ("END", End),
        ("RETURN", Return),
        ("DO", Do),
        ("IF", If),
        ("THEN", Then),
        ("ELSIF", Elsif),
        ("ELSE", Else),
        ("CASE", Case),
        ("OF", Of),
        ("LOOP", Loop),
        ("SELF", SelfRef),
        ("PARENT", ParentRef),
        ("GROUP", Group),
        ("QUEUE", Queue),
        ("CLASS", Class),
        ("FILE", File),
        ("RECORD", Record),
        ("KEY", Key),
        ("EQUATE", Equate),
        ("INCLUDE", Include),
        ("WINDOW", Window),
        ("APPLICATION", Application),
        ("MENUBAR", Menubar),
        ("MENU", Menu),
        ("ITEM", Item),
        ("SEPARATOR", Separator),
        ("TOOLBAR", Toolbar),
        ("BUTTON", Button),
        ("SHEET", Sheet),
        ("TAB", Tab),
        ("OPTION", Option),
        ("AT", At),
        ("USE", Use),
        ("MSG", Msg),
        ("STD", Std),
        ("FONT", Font),
        ("PRE", Pre),
    ])
});

impl Keyword {
    /// Case-insensitive lookup of an identifier against the keyword table.
    pub fn lookup(ident: &str) -> Option<Keyword> {
        KEYWORD_TABLE
            .get(ident.to_ascii_uppercase().as_str())
            .copied()
    }

    /// Canonical (uppercase) spelling of the keyword.
    pub fn as_str(&self) -> &'static str {
        use Keyword::*;
        match self {
            Program => "PROGRAM",
            Member => "MEMBER",
            Map => "MAP",
            Module => "MODULE",
            Procedure => "PROCEDURE",
            Function => "FUNCTION",
            Routine => "ROUTINE",
            Data => "DATA",
            Code => "CODE",
            End => "END",
            Return => "RETURN",
            Do => "DO",
            If => "IF",
            Then => "THEN",
            Elsif => "ELSIF",
            Else => "ELSE",
            Case => "CASE",
            Of => "OF",
            Loop => "LOOP",
            SelfRef => "SELF",
            ParentRef => "PARENT",
            Group => "GROUP",
            Queue => "QUEUE",
            Class => "CLASS",
            File => "FILE",
            Record => "RECORD",
            Key => "KEY",
            Equate => "EQUATE",
            Include => "INCLUDE",
            Window => "WINDOW",
            Application => "APPLICATION",
            Menubar => "MENUBAR",
            Menu => "MENU",
            Item => "ITEM",
            Separator => "SEPARATOR",
            Toolbar => "TOOLBAR",
            Button => "BUTTON",
            Sheet => "SHEET",
            Tab => "TAB",
            Option => "OPTION",
            At => "AT",
            Use => "USE",
            Msg => "MSG",
            Std => "STD",
            Font => "FONT",
            Pre => "PRE",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal categories produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    StringLit,
    Number,
    Comment,
    LineBreak,
    Comma,
    Semicolon,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Colon,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Equals,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    NotEqual,
    Ampersand,
    QuestionMark,
    Unhandled,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "keyword {kw}"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::StringLit => write!(f, "string literal"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::Comment => write!(f, "comment"),
            TokenKind::LineBreak => write!(f, "line break"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::LeftBrace => write!(f, "'{{'"),
            TokenKind::RightBrace => write!(f, "'}}'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::LessThan => write!(f, "'<'"),
            TokenKind::GreaterThan => write!(f, "'>'"),
            TokenKind::LessOrEqual => write!(f, "'<='"),
            TokenKind::GreaterOrEqual => write!(f, "'>='"),
            TokenKind::NotEqual => write!(f, "'<>'"),
            TokenKind::Ampersand => write!(f, "'&'"),
            TokenKind::QuestionMark => write!(f, "'?'"),
            TokenKind::Unhandled => write!(f, "unhandled input"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A lexed token: kind, literal text, and source range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub range: Range,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, range: Range) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self.kind, TokenKind::LineBreak)
    }

    /// Line breaks and semicolons terminate statements interchangeably.
    pub fn is_statement_separator(&self) -> bool {
        matches!(self.kind, TokenKind::LineBreak | TokenKind::Semicolon)
    }

    /// Commas, line breaks, and semicolons separate attribute-list entries
    /// interchangeably; the AST does not record which one was used.
    pub fn is_list_separator(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Comma | TokenKind::LineBreak | TokenKind::Semicolon
        )
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// The token's text when it can act as a plain name.
    ///
    /// Keywords double as identifiers in label and member positions, so both
    /// `Identifier` and `Keyword` tokens qualify.
    pub fn identifier_text(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Identifier | TokenKind::Keyword(_) => Some(&self.text),
            _ => None,
        }
    }

    /// The decoded value of a string literal token (`''` unescaped, quotes
    /// stripped). Unterminated literals decode to their partial content.
    pub fn string_value(&self) -> Option<String> {
        if self.kind != TokenKind::StringLit {
            return None;
        }
        let inner = self.text.strip_prefix('\'').unwrap_or(&self.text);
        let inner = inner.strip_suffix('\'').unwrap_or(inner);
        Some(inner.replace("''", "'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(Keyword::lookup("window"), Some(Keyword::Window));
        assert_eq!(Keyword::lookup("Window"), Some(Keyword::Window));
        assert_eq!(Keyword::lookup("WINDOW"), Some(Keyword::Window));
        assert_eq!(Keyword::lookup("WiNdOw"), Some(Keyword::Window));
    }

    #[test]
    fn test_keyword_lookup_miss() {
        assert_eq!(Keyword::lookup("MyVariable"), None);
        assert_eq!(Keyword::lookup("ENTRY"), None);
        assert_eq!(Keyword::lookup(""), None);
    }

    #[test]
    fn test_keyword_roundtrip_through_table() {
        // Every canonical spelling must resolve to its own variant.
        for (spelling, keyword) in [
            ("END", Keyword::End),
            ("SELF", Keyword::SelfRef),
            ("PARENT", Keyword::ParentRef),
            ("MENUBAR", Keyword::Menubar),
        ] {
            assert_eq!(Keyword::lookup(spelling), Some(keyword));
            assert_eq!(keyword.as_str(), spelling);
        }
    }

    #[test]
    fn test_identifier_text_accepts_keywords() {
        let token = Token::new(
            TokenKind::Keyword(Keyword::Item),
            "Item",
            Range::default(),
        );
        assert_eq!(token.identifier_text(), Some("Item"));

        let token = Token::new(TokenKind::Comma, ",", Range::default());
        assert_eq!(token.identifier_text(), None);
    }

    #[test]
    fn test_string_value_unescapes_doubled_quotes() {
        let token = Token::new(TokenKind::StringLit, "'it''s'", Range::default());
        assert_eq!(token.string_value(), Some("it's".to_string()));
    }

    #[test]
    fn test_string_value_unterminated() {
        let token = Token::new(TokenKind::StringLit, "'oops", Range::default());
        assert_eq!(token.string_value(), Some("oops".to_string()));
    }

    #[test]
    fn test_separator_predicates() {
        let newline = Token::new(TokenKind::LineBreak, "\n", Range::default());
        let comma = Token::new(TokenKind::Comma, ",", Range::default());
        let semi = Token::new(TokenKind::Semicolon, ";", Range::default());

        assert!(newline.is_statement_separator());
        assert!(semi.is_statement_separator());
        assert!(!comma.is_statement_separator());

        assert!(newline.is_list_separator());
        assert!(comma.is_list_separator());
        assert!(semi.is_list_separator());
    }
}
