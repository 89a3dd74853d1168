//! Attribute clauses and the unknown-content fallback
//!
//! Attribute lists follow a construct's header: a comma/line-break
//! separated sequence of optional modifier clauses (`AT`, `USE`, `MSG`,
//! `FONT`, `CENTER`, ...). A handful of clauses get typed nodes because
//! tooling reads their fields; everything else is a [`GenericAttr`].
//!
//! The AST does not record which separator was used between entries —
//! commas and line breaks are semantically interchangeable.
//!
//! Unknown Content
//!
//!     Vendor and unsupported syntax inside a block is captured as an
//!     [`UnknownContent`] node instead of failing the enclosing block. The
//!     node keeps the raw text and range so tooling can still show and
//!     fold it.

use serde::Serialize;
use std::fmt;

use super::super::range::Range;
use super::super::traits::{AstNode, Visitor};
use super::expressions::Expression;

/// One entry of an attribute list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Attribute {
    At(AtClause),
    Use(UseClause),
    Msg(MsgClause),
    Std(StdClause),
    Font(FontClause),
    Generic(GenericAttr),
}

/// `AT(x, y, width, height)` — every field independently optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtClause {
    pub x: Option<Expression>,
    pub y: Option<Expression>,
    pub width: Option<Expression>,
    pub height: Option<Expression>,
    pub location: Range,
}

/// `USE(target)` — binds a control to a variable or field equate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UseClause {
    pub target: Option<Expression>,
    pub location: Range,
}

/// `MSG(text)` — status-bar text for a control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MsgClause {
    pub text: Option<Expression>,
    pub location: Range,
}

/// `STD(id)` — standard-behavior identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StdClause {
    pub id: Option<Expression>,
    pub location: Range,
}

/// `FONT(typeface, size, color, style)` — every field independently
/// optional, adjacent commas marking omitted slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontClause {
    pub typeface: Option<Expression>,
    pub size: Option<Expression>,
    pub color: Option<Expression>,
    pub style: Option<Expression>,
    pub location: Range,
}

/// Any other clause: a name and its optional argument list.
///
/// An omitted slot between adjacent commas is `None`, preserving argument
/// positions (`ICON(,'x.ico')` keeps the icon in slot 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericAttr {
    pub name: String,
    pub args: Vec<Option<Expression>>,
    pub location: Range,
}

/// Opaque node for content the grammar does not model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnknownContent {
    /// Raw source text of the skipped region
    pub text: String,
    pub location: Range,
}

impl Attribute {
    pub fn location(&self) -> &Range {
        match self {
            Attribute::At(a) => &a.location,
            Attribute::Use(a) => &a.location,
            Attribute::Msg(a) => &a.location,
            Attribute::Std(a) => &a.location,
            Attribute::Font(a) => &a.location,
            Attribute::Generic(a) => &a.location,
        }
    }

    /// Clause name as written in canonical form.
    pub fn name(&self) -> &str {
        match self {
            Attribute::At(_) => "AT",
            Attribute::Use(_) => "USE",
            Attribute::Msg(_) => "MSG",
            Attribute::Std(_) => "STD",
            Attribute::Font(_) => "FONT",
            Attribute::Generic(a) => &a.name,
        }
    }
}

impl AstNode for Attribute {
    fn node_type(&self) -> &'static str {
        match self {
            Attribute::At(_) => "AtClause",
            Attribute::Use(_) => "UseClause",
            Attribute::Msg(_) => "MsgClause",
            Attribute::Std(_) => "StdClause",
            Attribute::Font(_) => "FontClause",
            Attribute::Generic(_) => "GenericAttr",
        }
    }

    fn display_label(&self) -> String {
        self.name().to_string()
    }

    fn range(&self) -> &Range {
        self.location()
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_attribute(self);
        for child in self.child_nodes() {
            child.accept(visitor);
        }
    }

    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        match self {
            Attribute::At(a) => [&a.x, &a.y, &a.width, &a.height]
                .into_iter()
                .flatten()
                .map(|e| e as &dyn AstNode)
                .collect(),
            Attribute::Use(a) => a.target.iter().map(|e| e as &dyn AstNode).collect(),
            Attribute::Msg(a) => a.text.iter().map(|e| e as &dyn AstNode).collect(),
            Attribute::Std(a) => a.id.iter().map(|e| e as &dyn AstNode).collect(),
            Attribute::Font(a) => [&a.typeface, &a.size, &a.color, &a.style]
                .into_iter()
                .flatten()
                .map(|e| e as &dyn AstNode)
                .collect(),
            Attribute::Generic(a) => a
                .args
                .iter()
                .flatten()
                .map(|e| e as &dyn AstNode)
                .collect(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl UnknownContent {
    pub fn new(text: impl Into<String>, location: Range) -> Self {
        Self {
            text: text.into(),
            location,
        }
    }
}

impl AstNode for UnknownContent {
    fn node_type(&self) -> &'static str {
        "UnknownContent"
    }

    fn display_label(&self) -> String {
        let text = self.text.trim();
        if text.chars().count() > 40 {
            format!("{}…", text.chars().take(40).collect::<String>())
        } else {
            text.to_string()
        }
    }

    fn range(&self) -> &Range {
        &self.location
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_unknown_content(self);
    }
}
