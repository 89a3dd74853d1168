//! Expression rules
//!
//! Precedence climbing with exactly two arithmetic tiers:
//!
//!     condition  := expression (cmp-op expression)?
//!     expression := term (('+' | '-') term)*
//!     term       := factor (('*' | '/') factor)*
//!     factor     := functionCall | dottedIdentifier | propertyAccess
//!                 | fieldEquate | integer | string | '(' condition ')'
//!
//! All binary operators are left-associative. `propertyAccess` is tried
//! before a plain identifier whenever the lookahead shows `{` after the
//! head. A factor that matches nothing yields an `Invalid` placeholder and
//! consumes nothing at statement boundaries, so enclosing rules stay in
//! control of recovery.

use log::trace;

use super::Parser;
use crate::clarion::ast::elements::{
    BinaryExpr, BinaryOp, DottedIdentifier, Expression, FieldEquate, FunctionCall, IntegerLiteral,
    Parenthesized, PropertyAccess, PropertyBase, StringLiteral, UnknownContent,
};
use crate::clarion::ast::range::Range;
use crate::clarion::token::{Keyword, TokenKind};

/// Keywords that terminate the construct an expression sits in; a factor
/// never consumes these as names.
const EXPRESSION_STOP_KEYWORDS: &[Keyword] = &[
    Keyword::End,
    Keyword::Else,
    Keyword::Elsif,
    Keyword::Of,
    Keyword::Then,
];

impl Parser<'_> {
    /// `expression (cmp-op expression)?` — comparisons only appear at the
    /// top of a condition, they do not nest.
    pub(crate) fn parse_condition(&mut self) -> Expression {
        let left = self.parse_expression();

        let op = match self.cursor.kind() {
            TokenKind::Equals => BinaryOp::Equal,
            TokenKind::LessThan => BinaryOp::LessThan,
            TokenKind::GreaterThan => BinaryOp::GreaterThan,
            TokenKind::LessOrEqual => BinaryOp::LessOrEqual,
            TokenKind::GreaterOrEqual => BinaryOp::GreaterOrEqual,
            TokenKind::NotEqual => BinaryOp::NotEqual,
            _ => return left,
        };
        self.cursor.bump();

        let right = self.parse_expression();
        let location = left.location().through(right.location());
        Expression::Comparison(Box::new(BinaryExpr {
            op,
            left,
            right,
            location,
        }))
    }

    /// `term (('+' | '-') term)*`
    pub(crate) fn parse_expression(&mut self) -> Expression {
        let mut left = self.parse_term();

        loop {
            let op = match self.cursor.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.cursor.bump();

            let right = self.parse_term();
            let location = left.location().through(right.location());
            left = Expression::Additive(Box::new(BinaryExpr {
                op,
                left,
                right,
                location,
            }));
        }

        left
    }

    /// `factor (('*' | '/') factor)*`
    fn parse_term(&mut self) -> Expression {
        let mut left = self.parse_factor();

        loop {
            let op = match self.cursor.kind() {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                _ => break,
            };
            self.cursor.bump();

            let right = self.parse_factor();
            let location = left.location().through(right.location());
            left = Expression::Multiplicative(Box::new(BinaryExpr {
                op,
                left,
                right,
                location,
            }));
        }

        left
    }

    pub(crate) fn parse_factor(&mut self) -> Expression {
        let token = self.cursor.peek().clone();

        match token.kind {
            TokenKind::Number => {
                self.cursor.bump();
                Expression::Integer(IntegerLiteral {
                    value: token.text.parse().unwrap_or_default(),
                    location: token.range,
                })
            }
            // Negative literal: the grammar has no unary tier, but signed
            // coordinates and equate values are valid source
            TokenKind::Minus if self.cursor.peek_at(1).kind == TokenKind::Number => {
                let minus = self.cursor.bump();
                let number = self.cursor.bump();
                Expression::Integer(IntegerLiteral {
                    value: -number.text.parse::<i64>().unwrap_or_default(),
                    location: minus.range.through(&number.range),
                })
            }
            TokenKind::StringLit => {
                self.cursor.bump();
                Expression::String(StringLiteral {
                    value: token.string_value().unwrap_or_default(),
                    location: token.range,
                })
            }
            TokenKind::LeftParen => {
                let open = self.cursor.bump().range;
                let inner = self.parse_condition();
                let _ = self.expect(TokenKind::RightParen, "parenthesized expression");
                Expression::Parenthesized(Box::new(Parenthesized {
                    inner,
                    location: self.close_span(&open),
                }))
            }
            TokenKind::QuestionMark => self.parse_field_equate(),
            TokenKind::Identifier | TokenKind::Keyword(_) if !self.at_expression_stop() => {
                self.parse_identifier_factor()
            }
            _ => {
                // Nothing matched. Consume the offending token unless it is
                // a boundary the enclosing rule needs to see.
                let consumes = !matches!(
                    token.kind,
                    TokenKind::RightParen
                        | TokenKind::RightBrace
                        | TokenKind::Comma
                        | TokenKind::Semicolon
                        | TokenKind::LineBreak
                        | TokenKind::Eof
                        | TokenKind::Keyword(_)
                        | TokenKind::Plus
                        | TokenKind::Minus
                        | TokenKind::Star
                        | TokenKind::Slash
                        | TokenKind::Equals
                        | TokenKind::LessThan
                        | TokenKind::GreaterThan
                        | TokenKind::LessOrEqual
                        | TokenKind::GreaterOrEqual
                        | TokenKind::NotEqual
                );
                if consumes {
                    self.error_expected(TokenKind::Identifier, "expression");
                    self.cursor.bump();
                }
                Expression::Invalid(UnknownContent::new(token.text, token.range))
            }
        }
    }

    fn at_expression_stop(&self) -> bool {
        match self.cursor.kind() {
            TokenKind::Keyword(keyword) => EXPRESSION_STOP_KEYWORDS.contains(&keyword),
            _ => false,
        }
    }

    /// `'?' ID` with an optional property tail.
    fn parse_field_equate(&mut self) -> Expression {
        let question = self.cursor.bump();

        let Some(name) = self.cursor.peek().identifier_text().map(str::to_string) else {
            self.error_expected(TokenKind::Identifier, "field equate");
            return Expression::Invalid(UnknownContent::new(question.text, question.range));
        };
        let name_token = self.cursor.bump();
        let location = question.range.through(&name_token.range);

        if self.cursor.at(TokenKind::LeftBrace) {
            return self.parse_property_tail(PropertyBase::FieldEquate(name), location);
        }

        Expression::FieldEquate(FieldEquate { name, location })
    }

    /// Factor starting with a name: a reserved-root path, a property
    /// access, a function call, or a dotted/prefixed identifier.
    fn parse_identifier_factor(&mut self) -> Expression {
        let head = self.cursor.bump();
        let head_range = head.range.clone();
        let head_text = head.text.clone();

        // SELF/PARENT take exactly one member
        if matches!(
            head.kind,
            TokenKind::Keyword(Keyword::SelfRef) | TokenKind::Keyword(Keyword::ParentRef)
        ) {
            let mut parts = vec![head_text];
            if self.cursor.at(TokenKind::Dot) && self.cursor.peek_at(1).identifier_text().is_some()
            {
                self.cursor.bump();
                parts.push(self.cursor.bump().text);
            }
            return Expression::Dotted(DottedIdentifier {
                parts,
                location: self.close_span(&head_range),
            });
        }

        if self.cursor.at(TokenKind::LeftBrace) {
            return self.parse_property_tail(PropertyBase::Identifier(head_text), head_range);
        }

        if self.cursor.at(TokenKind::LeftParen) {
            trace!("call: {head_text}");
            let args = self.parse_call_args();
            return Expression::FunctionCall(FunctionCall {
                name: head_text,
                args,
                location: self.close_span(&head_range),
            });
        }

        // Dotted or prefix-joined name: A.B, LOC:Total
        let mut parts = vec![head_text];
        while matches!(self.cursor.kind(), TokenKind::Dot | TokenKind::Colon)
            && self.cursor.peek_at(1).identifier_text().is_some()
        {
            self.cursor.bump();
            parts.push(self.cursor.bump().text);
        }

        Expression::Dotted(DottedIdentifier {
            parts,
            location: self.close_span(&head_range),
        })
    }

    /// `'{' ID (':' ID)* '}'` after a property base.
    fn parse_property_tail(&mut self, base: PropertyBase, open: Range) -> Expression {
        self.cursor.bump(); // '{'

        let mut parts = Vec::new();
        match self.cursor.peek().identifier_text() {
            Some(first) => {
                parts.push(first.to_string());
                self.cursor.bump();
            }
            None => self.error_expected(TokenKind::Identifier, "property qualifier"),
        }

        while self.cursor.at(TokenKind::Colon) && self.cursor.peek_at(1).identifier_text().is_some()
        {
            self.cursor.bump();
            parts.push(self.cursor.bump().text);
        }

        let _ = self.expect(TokenKind::RightBrace, "property qualifier");

        Expression::Property(PropertyAccess {
            base,
            parts,
            location: self.close_span(&open),
        })
    }

    /// Argument list of a function call: `'(' [condition (',' condition)*] ')'`.
    /// Empty slots between adjacent commas are skipped — calls, unlike
    /// clauses, do not keep omitted positions.
    pub(crate) fn parse_call_args(&mut self) -> Vec<Expression> {
        self.cursor.bump(); // '('
        let mut args = Vec::new();

        loop {
            match self.cursor.kind() {
                TokenKind::RightParen => {
                    self.cursor.bump();
                    break;
                }
                TokenKind::Comma => {
                    self.cursor.bump();
                }
                TokenKind::LineBreak | TokenKind::Eof => {
                    self.error_expected(TokenKind::RightParen, "argument list");
                    break;
                }
                _ => {
                    let before = self.cursor.position();
                    args.push(self.parse_condition());
                    if self.cursor.position() == before {
                        // The token matched no expression form; skip it so
                        // the loop advances.
                        self.error_expected(TokenKind::RightParen, "argument list");
                        self.cursor.bump();
                    }
                }
            }
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarion::lexing::tokenize;

    fn parse_expr(source: &str) -> (Expression, usize) {
        let output = tokenize(source);
        let mut parser = Parser::new(&output.tokens, source);
        let expression = parser.parse_condition();
        (expression, parser.diagnostics.len())
    }

    #[test]
    fn test_precedence_two_tiers() {
        let (expression, diagnostics) = parse_expr("1 + 2 * 3");
        assert_eq!(diagnostics, 0);
        let Expression::Additive(add) = expression else {
            panic!("expected additive at the top");
        };
        assert_eq!(add.op, BinaryOp::Add);
        assert!(matches!(add.right, Expression::Multiplicative(_)));
    }

    #[test]
    fn test_left_associativity() {
        let (expression, _) = parse_expr("1 - 2 - 3");
        let Expression::Additive(outer) = expression else {
            panic!("expected additive");
        };
        // (1 - 2) - 3
        assert!(matches!(outer.left, Expression::Additive(_)));
        assert!(matches!(outer.right, Expression::Integer(_)));
    }

    #[test]
    fn test_comparison_tier() {
        let (expression, diagnostics) = parse_expr("x + 1 = 2");
        assert_eq!(diagnostics, 0);
        let Expression::Comparison(cmp) = expression else {
            panic!("expected comparison");
        };
        assert_eq!(cmp.op, BinaryOp::Equal);
        assert!(matches!(cmp.left, Expression::Additive(_)));
    }

    #[test]
    fn test_function_call() {
        let (expression, diagnostics) = parse_expr("CLIP(Name, 2)");
        assert_eq!(diagnostics, 0);
        let Expression::FunctionCall(call) = expression else {
            panic!("expected call");
        };
        assert_eq!(call.name, "CLIP");
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn test_self_single_member() {
        let (expression, _) = parse_expr("SELF.Init");
        let Expression::Dotted(dotted) = expression else {
            panic!("expected dotted");
        };
        assert_eq!(dotted.parts, vec!["SELF", "Init"]);
    }

    #[test]
    fn test_prefixed_name_uses_colon() {
        let (expression, diagnostics) = parse_expr("LOC:Total");
        assert_eq!(diagnostics, 0);
        let Expression::Dotted(dotted) = expression else {
            panic!("expected dotted");
        };
        assert_eq!(dotted.parts, vec!["LOC", "Total"]);
    }

    #[test]
    fn test_property_access_on_field_equate() {
        let (expression, diagnostics) = parse_expr("?OkButton{PROP:Text}");
        assert_eq!(diagnostics, 0);
        let Expression::Property(property) = expression else {
            panic!("expected property access");
        };
        assert_eq!(
            property.base,
            PropertyBase::FieldEquate("OkButton".to_string())
        );
        assert_eq!(property.parts, vec!["PROP", "Text"]);
    }

    #[test]
    fn test_property_access_preferred_over_dotted() {
        let (expression, diagnostics) = parse_expr("Win{PROP:Hide}");
        assert_eq!(diagnostics, 0);
        assert!(matches!(expression, Expression::Property(_)));
    }

    #[test]
    fn test_parenthesized() {
        let (expression, diagnostics) = parse_expr("(1 + 2) * 3");
        assert_eq!(diagnostics, 0);
        let Expression::Multiplicative(mul) = expression else {
            panic!("expected multiplicative");
        };
        assert!(matches!(mul.left, Expression::Parenthesized(_)));
    }

    #[test]
    fn test_negative_literal() {
        let (expression, diagnostics) = parse_expr("-5");
        assert_eq!(diagnostics, 0);
        let Expression::Integer(integer) = expression else {
            panic!("expected integer");
        };
        assert_eq!(integer.value, -5);
    }

    #[test]
    fn test_string_literal_decoded() {
        let (expression, _) = parse_expr("'it''s'");
        let Expression::String(string) = expression else {
            panic!("expected string");
        };
        assert_eq!(string.value, "it's");
    }

    #[test]
    fn test_invalid_factor_recovers() {
        let (expression, diagnostics) = parse_expr("@");
        assert!(diagnostics <= 1);
        assert!(matches!(expression, Expression::Invalid(_)));
    }

    #[test]
    fn test_unclosed_call_stops_at_line_break() {
        let (expression, diagnostics) = parse_expr("FOO(1, 2\nx");
        assert_eq!(diagnostics, 1);
        assert!(matches!(expression, Expression::FunctionCall(_)));
    }
}
