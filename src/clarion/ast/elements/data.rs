//! Data declaration nodes
//!
//! Everything the declarations-only grammar can produce: global variables,
//! equates, includes, group/queue structures, forward class declarations,
//! and file/record/key structures. The full program grammar reuses these
//! nodes for local data sections.
//!
//! Syntax examples:
//!     Count      LONG
//!     Name       STRING(30),STATIC
//!     RefField   &CSTRING
//!     Q          QUEUE
//!     Pos          LONG
//!                END
//!     Customers  FILE,DRIVER('TOPSPEED'),PRE(Cus)
//!     NameKey      KEY(Cus:Name)
//!     Record       RECORD
//!     Name           STRING(20)
//!                  END
//!                END

use serde::Serialize;
use std::fmt;

use super::super::range::Range;
use super::super::traits::{AstNode, Visitor};
use super::attributes::{Attribute, UnknownContent};
use super::controls::WindowDefinition;
use super::expressions::Expression;
use super::program::Prototype;

/// Root node of the declarations-only entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalDataSection {
    pub entries: Vec<Declaration>,
    pub location: Range,
}

/// One top-level declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    Variable(GlobalVariable),
    Group(GroupBlock),
    Queue(QueueBlock),
    Class(ClassDeclaration),
    Equate(EquateDefinition),
    Include(IncludeDirective),
    Window(WindowDefinition),
    File(FileDeclaration),
    Unknown(UnknownContent),
}

/// `Name [&]Type[(size[,decimals])] [,attributes]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalVariable {
    pub name: String,
    /// Leading `&` marks a reference/alias field
    pub is_reference: bool,
    pub field_type: FieldType,
    pub attributes: Vec<Attribute>,
    pub location: Range,
}

/// A type name with optional size arguments: `STRING(30)`, `DECIMAL(7,2)`,
/// or a bare `LONG`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldType {
    pub name: String,
    pub size: Option<Expression>,
    pub decimals: Option<Expression>,
    pub location: Range,
}

/// A prefix-qualified field name: `Cus:Name`, or a bare `Total`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReference {
    pub parts: Vec<String>,
    pub location: Range,
}

impl FieldReference {
    pub fn joined(&self) -> String {
        self.parts.join(":")
    }
}

/// `Name GROUP[(base)] [,attrs] field* END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBlock {
    pub name: String,
    /// Base type for derived groups: `GROUP(TypeName)`
    pub base: Option<String>,
    pub attributes: Vec<Attribute>,
    pub fields: Vec<FieldEntry>,
    pub location: Range,
}

/// `Name QUEUE[(base)] [,attrs] field* END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueBlock {
    pub name: String,
    pub base: Option<String>,
    pub attributes: Vec<Attribute>,
    pub fields: Vec<FieldEntry>,
    pub location: Range,
}

/// One entry of a group/queue/record field list. Groups nest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldEntry {
    Field(FieldDefinition),
    Group(GroupBlock),
    Unknown(UnknownContent),
}

/// `Name [&]Type[(size[,decimals])] [,attrs]` inside a structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    pub is_reference: bool,
    pub field_type: FieldType,
    pub attributes: Vec<Attribute>,
    pub location: Range,
}

/// `Name EQUATE[(value)]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquateDefinition {
    pub name: String,
    pub value: Option<Expression>,
    pub location: Range,
}

/// `INCLUDE('file' [,'section'] [,ONCE])`
///
/// Recorded only; resolving the target is the host's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncludeDirective {
    pub path: String,
    pub section: Option<String>,
    pub once: bool,
    pub location: Range,
}

/// Forward class declaration: `Name CLASS[(parent)] [,attrs] member* END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDeclaration {
    pub name: String,
    pub parent: Option<String>,
    pub attributes: Vec<Attribute>,
    pub members: Vec<ClassMember>,
    pub location: Range,
}

/// One member of a class declaration body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ClassMember {
    Field(FieldDefinition),
    Method(Prototype),
    Unknown(UnknownContent),
}

/// `Name FILE [,attrs] (key | record)* END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDeclaration {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub entries: Vec<FileEntry>,
    pub location: Range,
}

/// One entry of a file structure body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FileEntry {
    Key(KeyDefinition),
    Record(RecordBlock),
    Unknown(UnknownContent),
}

/// `Name KEY[(component, ...)] [,attrs]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyDefinition {
    pub name: String,
    pub components: Vec<FieldReference>,
    pub attributes: Vec<Attribute>,
    pub location: Range,
}

/// `[Name] RECORD [,PRE(prefix)] [,attrs] field* END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordBlock {
    pub name: Option<String>,
    /// Extracted from the PRE attribute when present
    pub prefix: Option<String>,
    pub attributes: Vec<Attribute>,
    pub fields: Vec<FieldEntry>,
    pub location: Range,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.size, &self.decimals) {
            (Some(size), Some(decimals)) => write!(f, "{}({size},{decimals})", self.name),
            (Some(size), None) => write!(f, "{}({size})", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

// ----------------------------------------------------------------------------
// AstNode implementations
// ----------------------------------------------------------------------------

impl AstNode for GlobalDataSection {
    fn node_type(&self) -> &'static str {
        "GlobalDataSection"
    }
    fn display_label(&self) -> String {
        format!("{} declarations", self.entries.len())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_global_data_section(self);
        for entry in &self.entries {
            entry.accept(visitor);
        }
        visitor.leave_global_data_section(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.entries.iter().map(|e| e as &dyn AstNode).collect()
    }
}

impl Declaration {
    pub fn location(&self) -> &Range {
        match self {
            Declaration::Variable(d) => &d.location,
            Declaration::Group(d) => &d.location,
            Declaration::Queue(d) => &d.location,
            Declaration::Class(d) => &d.location,
            Declaration::Equate(d) => &d.location,
            Declaration::Include(d) => &d.location,
            Declaration::Window(d) => &d.location,
            Declaration::File(d) => &d.location,
            Declaration::Unknown(d) => &d.location,
        }
    }

    fn as_node(&self) -> &dyn AstNode {
        match self {
            Declaration::Variable(d) => d,
            Declaration::Group(d) => d,
            Declaration::Queue(d) => d,
            Declaration::Class(d) => d,
            Declaration::Equate(d) => d,
            Declaration::Include(d) => d,
            Declaration::Window(d) => d,
            Declaration::File(d) => d,
            Declaration::Unknown(d) => d,
        }
    }
}

impl AstNode for Declaration {
    fn node_type(&self) -> &'static str {
        self.as_node().node_type()
    }
    fn display_label(&self) -> String {
        self.as_node().display_label()
    }
    fn range(&self) -> &Range {
        self.as_node().range()
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.as_node().accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.as_node().child_nodes()
    }
}

impl AstNode for GlobalVariable {
    fn node_type(&self) -> &'static str {
        "GlobalVariable"
    }
    fn display_label(&self) -> String {
        format!("{} {}", self.name, self.field_type)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_global_variable(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.attributes.iter().map(|a| a as &dyn AstNode).collect()
    }
}

impl AstNode for FieldReference {
    fn node_type(&self) -> &'static str {
        "FieldReference"
    }
    fn display_label(&self) -> String {
        self.joined()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_field_reference(self);
    }
}

macro_rules! structure_block_node {
    ($ty:ident, $type_name:literal, $visit:ident, $leave:ident) => {
        impl AstNode for $ty {
            fn node_type(&self) -> &'static str {
                $type_name
            }
            fn display_label(&self) -> String {
                self.name.clone()
            }
            fn range(&self) -> &Range {
                &self.location
            }
            fn accept(&self, visitor: &mut dyn Visitor) {
                visitor.$visit(self);
                for attribute in &self.attributes {
                    attribute.accept(visitor);
                }
                for field in &self.fields {
                    field.accept(visitor);
                }
                visitor.$leave(self);
            }
            fn child_nodes(&self) -> Vec<&dyn AstNode> {
                self.attributes
                    .iter()
                    .map(|a| a as &dyn AstNode)
                    .chain(self.fields.iter().map(|f| f as &dyn AstNode))
                    .collect()
            }
        }
    };
}

structure_block_node!(GroupBlock, "GroupBlock", visit_group_block, leave_group_block);
structure_block_node!(QueueBlock, "QueueBlock", visit_queue_block, leave_queue_block);

impl FieldEntry {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            FieldEntry::Field(f) => f,
            FieldEntry::Group(g) => g,
            FieldEntry::Unknown(u) => u,
        }
    }
}

impl AstNode for FieldEntry {
    fn node_type(&self) -> &'static str {
        self.as_node().node_type()
    }
    fn display_label(&self) -> String {
        self.as_node().display_label()
    }
    fn range(&self) -> &Range {
        self.as_node().range()
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.as_node().accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.as_node().child_nodes()
    }
}

impl AstNode for FieldDefinition {
    fn node_type(&self) -> &'static str {
        "FieldDefinition"
    }
    fn display_label(&self) -> String {
        format!("{} {}", self.name, self.field_type)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_field_definition(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.attributes.iter().map(|a| a as &dyn AstNode).collect()
    }
}

impl AstNode for EquateDefinition {
    fn node_type(&self) -> &'static str {
        "EquateDefinition"
    }
    fn display_label(&self) -> String {
        self.name.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_equate_definition(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.value.iter().map(|e| e as &dyn AstNode).collect()
    }
}

impl AstNode for IncludeDirective {
    fn node_type(&self) -> &'static str {
        "IncludeDirective"
    }
    fn display_label(&self) -> String {
        self.path.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_include_directive(self);
    }
}

impl AstNode for ClassDeclaration {
    fn node_type(&self) -> &'static str {
        "ClassDeclaration"
    }
    fn display_label(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}({parent})", self.name),
            None => self.name.clone(),
        }
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_class_declaration(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for member in &self.members {
            member.accept(visitor);
        }
        visitor.leave_class_declaration(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.attributes
            .iter()
            .map(|a| a as &dyn AstNode)
            .chain(self.members.iter().map(|m| m as &dyn AstNode))
            .collect()
    }
}

impl ClassMember {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            ClassMember::Field(f) => f,
            ClassMember::Method(m) => m,
            ClassMember::Unknown(u) => u,
        }
    }
}

impl AstNode for ClassMember {
    fn node_type(&self) -> &'static str {
        self.as_node().node_type()
    }
    fn display_label(&self) -> String {
        self.as_node().display_label()
    }
    fn range(&self) -> &Range {
        self.as_node().range()
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.as_node().accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.as_node().child_nodes()
    }
}

impl AstNode for FileDeclaration {
    fn node_type(&self) -> &'static str {
        "FileDeclaration"
    }
    fn display_label(&self) -> String {
        self.name.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_file_declaration(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for entry in &self.entries {
            entry.accept(visitor);
        }
        visitor.leave_file_declaration(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.attributes
            .iter()
            .map(|a| a as &dyn AstNode)
            .chain(self.entries.iter().map(|e| e as &dyn AstNode))
            .collect()
    }
}

impl FileEntry {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            FileEntry::Key(k) => k,
            FileEntry::Record(r) => r,
            FileEntry::Unknown(u) => u,
        }
    }
}

impl AstNode for FileEntry {
    fn node_type(&self) -> &'static str {
        self.as_node().node_type()
    }
    fn display_label(&self) -> String {
        self.as_node().display_label()
    }
    fn range(&self) -> &Range {
        self.as_node().range()
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.as_node().accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.as_node().child_nodes()
    }
}

impl AstNode for KeyDefinition {
    fn node_type(&self) -> &'static str {
        "KeyDefinition"
    }
    fn display_label(&self) -> String {
        self.name.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_key_definition(self);
        for component in &self.components {
            component.accept(visitor);
        }
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.components
            .iter()
            .map(|c| c as &dyn AstNode)
            .chain(self.attributes.iter().map(|a| a as &dyn AstNode))
            .collect()
    }
}

impl AstNode for RecordBlock {
    fn node_type(&self) -> &'static str {
        "RecordBlock"
    }
    fn display_label(&self) -> String {
        self.name.clone().unwrap_or_else(|| "RECORD".to_string())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_record_block(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for field in &self.fields {
            field.accept(visitor);
        }
        visitor.leave_record_block(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.attributes
            .iter()
            .map(|a| a as &dyn AstNode)
            .chain(self.fields.iter().map(|f| f as &dyn AstNode))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_type(name: &str) -> FieldType {
        FieldType {
            name: name.to_string(),
            size: None,
            decimals: None,
            location: Range::default(),
        }
    }

    #[test]
    fn test_field_type_display() {
        use crate::clarion::ast::elements::expressions::IntegerLiteral;

        let bare = field_type("LONG");
        assert_eq!(bare.to_string(), "LONG");

        let sized = FieldType {
            name: "STRING".to_string(),
            size: Some(Expression::Integer(IntegerLiteral {
                value: 30,
                location: Range::default(),
            })),
            decimals: None,
            location: Range::default(),
        };
        assert_eq!(sized.to_string(), "STRING(30)");
    }

    #[test]
    fn test_field_reference_joined() {
        let reference = FieldReference {
            parts: vec!["Cus".to_string(), "Name".to_string()],
            location: Range::default(),
        };
        assert_eq!(reference.joined(), "Cus:Name");
        assert_eq!(reference.display_label(), "Cus:Name");
    }

    #[test]
    fn test_queue_block_visitation() {
        use crate::clarion::ast::traits::Visitor;

        let queue = QueueBlock {
            name: "Q".to_string(),
            base: None,
            attributes: Vec::new(),
            fields: vec![
                FieldEntry::Field(FieldDefinition {
                    name: "Name".to_string(),
                    is_reference: false,
                    field_type: field_type("STRING"),
                    attributes: Vec::new(),
                    location: Range::default(),
                }),
                FieldEntry::Field(FieldDefinition {
                    name: "Age".to_string(),
                    is_reference: false,
                    field_type: field_type("LONG"),
                    attributes: Vec::new(),
                    location: Range::default(),
                }),
            ],
            location: Range::default(),
        };

        struct Counter {
            queues: usize,
            fields: usize,
        }
        impl Visitor for Counter {
            fn visit_queue_block(&mut self, _: &QueueBlock) {
                self.queues += 1;
            }
            fn visit_field_definition(&mut self, _: &FieldDefinition) {
                self.fields += 1;
            }
        }

        let mut counter = Counter {
            queues: 0,
            fields: 0,
        };
        queue.accept(&mut counter);
        assert_eq!(counter.queues, 1);
        assert_eq!(counter.fields, 2);
    }

    #[test]
    fn test_declaration_dispatch() {
        let declaration = Declaration::Equate(EquateDefinition {
            name: "True".to_string(),
            value: None,
            location: Range::default(),
        });
        assert_eq!(declaration.node_type(), "EquateDefinition");
        assert_eq!(declaration.display_label(), "True");
    }
}
