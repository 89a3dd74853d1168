//! Attribute list rules
//!
//! Two list shapes share one clause rule:
//!
//! - the comma-led list after data declarations and leaf controls, which a
//!   line break always terminates;
//! - the header list of block UI structures, where commas and line breaks
//!   are interchangeable separators. A line break only ends that list when
//!   what follows starts the block body (a structural keyword, or an
//!   identifier with an argument list on its own line) or closes the block.
//!
//! Deeply optional clause chains (`FONT(name, size, color, style)`,
//! `AT(x, y, width, height)`) are parsed as one loop over the fixed slot
//! order: adjacent commas mark omitted slots, so the clause rule stays
//! linear instead of nesting one optional production per field.

use super::Parser;
use crate::clarion::ast::elements::{
    AtClause, Attribute, Expression, FontClause, GenericAttr, MsgClause, StdClause, UseClause,
};
use crate::clarion::token::{Keyword, TokenKind};

/// Keywords that always open a block-body element, ending any attribute
/// list in progress.
pub(crate) const UI_STRUCTURAL_KEYWORDS: &[Keyword] = &[
    Keyword::Menubar,
    Keyword::Toolbar,
    Keyword::Sheet,
    Keyword::Tab,
    Keyword::Option,
    Keyword::Button,
    Keyword::Menu,
    Keyword::Item,
    Keyword::Separator,
];

/// Clause keywords that continue an attribute list across a line break.
const UI_CLAUSE_KEYWORDS: &[Keyword] = &[
    Keyword::At,
    Keyword::Use,
    Keyword::Msg,
    Keyword::Std,
    Keyword::Font,
    Keyword::Pre,
];

impl Parser<'_> {
    /// Parenthesized clause arguments with positional omitted slots:
    /// `(,,100,50)` keeps four positions. Assumes the cursor is at `(`.
    pub(crate) fn parse_clause_args(&mut self) -> Vec<Option<Expression>> {
        self.cursor.bump(); // '('
        let mut args = Vec::new();
        let mut expect_value = true;

        loop {
            match self.cursor.kind() {
                TokenKind::RightParen => {
                    if expect_value && !args.is_empty() {
                        args.push(None);
                    }
                    self.cursor.bump();
                    break;
                }
                TokenKind::Comma => {
                    if expect_value {
                        args.push(None);
                    }
                    self.cursor.bump();
                    expect_value = true;
                }
                TokenKind::LineBreak | TokenKind::Eof => {
                    self.error_expected(TokenKind::RightParen, "clause arguments");
                    break;
                }
                _ => {
                    if !expect_value {
                        self.error_expected(TokenKind::Comma, "clause arguments");
                    }
                    let before = self.cursor.position();
                    args.push(Some(self.parse_condition()));
                    expect_value = false;
                    if self.cursor.position() == before {
                        // Token matched no expression form; skip it so the
                        // loop advances.
                        self.cursor.bump();
                    }
                }
            }
        }

        args
    }

    /// One attribute clause. Returns `None` without consuming when the
    /// cursor is not at a name.
    pub(crate) fn parse_attribute(&mut self) -> Option<Attribute> {
        let token = self.cursor.peek().clone();
        let name = token.identifier_text()?.to_string();
        self.cursor.bump();

        let has_args = self.cursor.at(TokenKind::LeftParen);
        let args = if has_args {
            self.parse_clause_args()
        } else {
            Vec::new()
        };
        let location = self.close_span(&token.range);

        let attribute = match token.kind {
            TokenKind::Keyword(Keyword::At) if has_args => {
                let mut slots = args.into_iter();
                Attribute::At(AtClause {
                    x: slots.next().flatten(),
                    y: slots.next().flatten(),
                    width: slots.next().flatten(),
                    height: slots.next().flatten(),
                    location,
                })
            }
            TokenKind::Keyword(Keyword::Use) if has_args => {
                let mut slots = args.into_iter();
                Attribute::Use(UseClause {
                    target: slots.next().flatten(),
                    location,
                })
            }
            TokenKind::Keyword(Keyword::Msg) if has_args => {
                let mut slots = args.into_iter();
                Attribute::Msg(MsgClause {
                    text: slots.next().flatten(),
                    location,
                })
            }
            TokenKind::Keyword(Keyword::Std) if has_args => {
                let mut slots = args.into_iter();
                Attribute::Std(StdClause {
                    id: slots.next().flatten(),
                    location,
                })
            }
            TokenKind::Keyword(Keyword::Font) if has_args => {
                let mut slots = args.into_iter();
                Attribute::Font(FontClause {
                    typeface: slots.next().flatten(),
                    size: slots.next().flatten(),
                    color: slots.next().flatten(),
                    style: slots.next().flatten(),
                    location,
                })
            }
            _ => Attribute::Generic(GenericAttr {
                name,
                args,
                location,
            }),
        };

        Some(attribute)
    }

    /// Comma-led attribute list: `,ATTR[(args)]` repeated until anything
    /// else. A line break terminates it.
    pub(crate) fn parse_comma_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();

        while self.cursor.at(TokenKind::Comma) {
            self.cursor.bump();
            match self.parse_attribute() {
                Some(attribute) => attributes.push(attribute),
                None => {
                    self.error_expected(TokenKind::Identifier, "attribute list");
                    break;
                }
            }
        }

        attributes
    }

    /// Header attribute list of a block UI structure: commas and line
    /// breaks are interchangeable. Ends at the block body or END.
    pub(crate) fn parse_ui_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();

        loop {
            match self.cursor.kind() {
                TokenKind::Comma => {
                    self.cursor.bump();
                    self.cursor.skip_statement_separators();
                    match self.parse_attribute() {
                        Some(attribute) => attributes.push(attribute),
                        None => {
                            self.error_expected(TokenKind::Identifier, "attribute list");
                            break;
                        }
                    }
                }
                TokenKind::LineBreak | TokenKind::Semicolon => {
                    if !self.continues_attribute_list() {
                        break;
                    }
                    self.cursor.skip_list_separators();
                    match self.parse_attribute() {
                        Some(attribute) => attributes.push(attribute),
                        None => break,
                    }
                }
                TokenKind::Keyword(Keyword::End) => break,
                TokenKind::Identifier | TokenKind::Keyword(_) => {
                    if self.at_ui_structural_keyword(0) {
                        break;
                    }
                    match self.parse_attribute() {
                        Some(attribute) => attributes.push(attribute),
                        None => break,
                    }
                }
                _ => break,
            }
        }

        attributes
    }

    /// Decide whether the line after a break is still part of the
    /// attribute list: a known clause keyword always is, a bare name with
    /// no argument list is a flag attribute, and anything else — a
    /// structural keyword, a name opening its own argument list, END —
    /// starts the body instead.
    fn continues_attribute_list(&self) -> bool {
        let mut n = 0;
        while self.cursor.peek_at(n).is_list_separator() {
            n += 1;
        }
        let next = self.cursor.peek_at(n);

        match next.kind {
            TokenKind::Keyword(Keyword::End) | TokenKind::Eof => false,
            TokenKind::Keyword(keyword) if UI_STRUCTURAL_KEYWORDS.contains(&keyword) => false,
            TokenKind::Keyword(keyword) if UI_CLAUSE_KEYWORDS.contains(&keyword) => true,
            TokenKind::Identifier | TokenKind::Keyword(_) => {
                self.cursor.peek_at(n + 1).kind != TokenKind::LeftParen
            }
            _ => false,
        }
    }

    pub(crate) fn at_ui_structural_keyword(&self, n: usize) -> bool {
        match self.cursor.peek_at(n).kind {
            TokenKind::Keyword(keyword) => UI_STRUCTURAL_KEYWORDS.contains(&keyword),
            _ => false,
        }
    }

    /// Optional parenthesized header arguments of a UI element.
    pub(crate) fn parse_header_args(&mut self) -> Vec<Option<Expression>> {
        if self.cursor.at(TokenKind::LeftParen) {
            self.parse_clause_args()
        } else {
            Vec::new()
        }
    }
}

/// First argument slot as a decoded string, when it is a string literal.
pub(crate) fn first_string(args: &[Option<Expression>]) -> Option<String> {
    match args.first() {
        Some(Some(Expression::String(literal))) => Some(literal.value.clone()),
        _ => None,
    }
}
