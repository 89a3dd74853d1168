//! Expression nodes
//!
//! The expression grammar is deliberately shallow: two binary precedence
//! tiers (additive over multiplicative) plus a comparison tier that only
//! appears in condition positions, and a closed set of leaf forms. Clarion
//! expressions in declarations and attribute clauses rarely go deeper than
//! a call or a qualified name.
//!
//! Examples:
//!     Total + Count * 2
//!     CLIP(LOC:Name)
//!     SELF.Init
//!     ?OkButton{PROP:Text}
//!     'literal'

use serde::Serialize;
use std::fmt;

use super::super::range::Range;
use super::super::traits::{AstNode, Visitor};
use super::UnknownContent;

/// Any expression form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Additive(Box<BinaryExpr>),
    Multiplicative(Box<BinaryExpr>),
    Comparison(Box<BinaryExpr>),
    FunctionCall(FunctionCall),
    Dotted(DottedIdentifier),
    Property(PropertyAccess),
    FieldEquate(FieldEquate),
    Integer(IntegerLiteral),
    String(StringLiteral),
    Parenthesized(Box<Parenthesized>),
    /// Placeholder produced by error recovery
    Invalid(UnknownContent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    NotEqual,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equal => "=",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::NotEqual => "<>",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A binary operation; which tier it belongs to is recorded by the wrapping
/// [`Expression`] variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Expression,
    pub right: Expression,
    pub location: Range,
}

/// `Name(arg, arg, ...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expression>,
    pub location: Range,
}

/// A qualified name: parts joined by `.` or `:` in the source.
///
/// The reserved roots `SELF` and `PARENT` accept exactly one member
/// (`SELF.Init`); prefix-joined field names (`LOC:Total`) land here too.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DottedIdentifier {
    pub parts: Vec<String>,
    pub location: Range,
}

impl DottedIdentifier {
    pub fn joined(&self) -> String {
        self.parts.join(".")
    }
}

/// `target{PROP:Name}` — a bracketed multi-part property qualifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyAccess {
    pub base: PropertyBase,
    pub parts: Vec<String>,
    pub location: Range,
}

/// What a property access is applied to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyBase {
    Identifier(String),
    FieldEquate(String),
}

impl PropertyBase {
    pub fn name(&self) -> &str {
        match self {
            PropertyBase::Identifier(name) => name,
            PropertyBase::FieldEquate(name) => name,
        }
    }
}

/// `?Name` — a field equate label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEquate {
    /// Name without the leading `?`
    pub name: String,
    pub location: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegerLiteral {
    pub value: i64,
    pub location: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    /// Decoded value: quotes stripped, `''` unescaped
    pub value: String,
    pub location: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parenthesized {
    pub inner: Expression,
    pub location: Range,
}

impl Expression {
    pub fn location(&self) -> &Range {
        match self {
            Expression::Additive(e) | Expression::Multiplicative(e) | Expression::Comparison(e) => {
                &e.location
            }
            Expression::FunctionCall(e) => &e.location,
            Expression::Dotted(e) => &e.location,
            Expression::Property(e) => &e.location,
            Expression::FieldEquate(e) => &e.location,
            Expression::Integer(e) => &e.location,
            Expression::String(e) => &e.location,
            Expression::Parenthesized(e) => &e.location,
            Expression::Invalid(e) => &e.location,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Additive(e) | Expression::Multiplicative(e) | Expression::Comparison(e) => {
                write!(f, "{} {} {}", e.left, e.op, e.right)
            }
            Expression::FunctionCall(e) => {
                let args: Vec<String> = e.args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", e.name, args.join(", "))
            }
            Expression::Dotted(e) => write!(f, "{}", e.joined()),
            Expression::Property(e) => {
                write!(f, "{}{{{}}}", e.base.name(), e.parts.join(":"))
            }
            Expression::FieldEquate(e) => write!(f, "?{}", e.name),
            Expression::Integer(e) => write!(f, "{}", e.value),
            Expression::String(e) => write!(f, "'{}'", e.value),
            Expression::Parenthesized(e) => write!(f, "({})", e.inner),
            Expression::Invalid(_) => write!(f, "<invalid>"),
        }
    }
}

impl AstNode for Expression {
    fn node_type(&self) -> &'static str {
        match self {
            Expression::Additive(_) => "Additive",
            Expression::Multiplicative(_) => "Multiplicative",
            Expression::Comparison(_) => "Comparison",
            Expression::FunctionCall(_) => "FunctionCall",
            Expression::Dotted(_) => "DottedIdentifier",
            Expression::Property(_) => "PropertyAccess",
            Expression::FieldEquate(_) => "FieldEquate",
            Expression::Integer(_) => "IntegerLiteral",
            Expression::String(_) => "StringLiteral",
            Expression::Parenthesized(_) => "Parenthesized",
            Expression::Invalid(_) => "UnknownContent",
        }
    }

    fn display_label(&self) -> String {
        self.to_string()
    }

    fn range(&self) -> &Range {
        self.location()
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_expression(self);
        for child in self.child_nodes() {
            child.accept(visitor);
        }
    }

    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        match self {
            Expression::Additive(e) | Expression::Multiplicative(e) | Expression::Comparison(e) => {
                vec![&e.left, &e.right]
            }
            Expression::FunctionCall(e) => {
                e.args.iter().map(|a| a as &dyn AstNode).collect()
            }
            Expression::Parenthesized(e) => vec![&e.inner],
            _ => Vec::new(),
        }
    }
}
