//! Program structure nodes
//!
//! The full program grammar: a source unit is either a program or a member
//! module, optionally carrying a MAP of prototypes, global declarations,
//! and a sequence of procedure/method/class definitions. Procedures own
//! their local data, statements, and trailing routines.
//!
//! Syntax example:
//!       MEMBER('orders')
//!       MAP
//!         UpdateTotals PROCEDURE(LONG pId)
//!       END
//!     UpdateTotals PROCEDURE(LONG pId)
//!     Total LONG
//!       CODE
//!       Total = pId
//!       DO Refresh
//!     Refresh ROUTINE
//!       DATA
//!     X LONG
//!       CODE
//!       X = 1

use serde::Serialize;
use std::fmt;

use super::super::range::Range;
use super::super::traits::{AstNode, Visitor};
use super::attributes::{Attribute, UnknownContent};
use super::data::{ClassDeclaration, Declaration};
use super::statements::Statement;

/// Root node of the full-program entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// Present when the unit is a member module rather than a program
    pub member: Option<MemberModule>,
    pub map: Option<MapSection>,
    /// Global data between the prolog and the first definition
    pub declarations: Vec<Declaration>,
    pub definitions: Vec<Definition>,
    pub location: Range,
}

/// One top-level definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Definition {
    Procedure(ProcedureDefinition),
    Method(MethodDefinition),
    Class(ClassDefinition),
    Unknown(UnknownContent),
}

/// `MEMBER['(parent)']`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberModule {
    pub parent: Option<String>,
    pub location: Range,
}

/// `MAP (prototype | module)* END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSection {
    pub entries: Vec<MapEntry>,
    pub location: Range,
}

/// One entry of a MAP body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MapEntry {
    Prototype(Prototype),
    Module(ModuleBlock),
    Unknown(UnknownContent),
}

/// `MODULE('target') prototype* END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleBlock {
    pub target: String,
    pub prototypes: Vec<Prototype>,
    pub location: Range,
}

/// `Name PROCEDURE|FUNCTION['(params)'] [,returnType] [,attrs]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prototype {
    pub name: String,
    pub kind: PrototypeKind,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub attributes: Vec<Attribute>,
    pub location: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrototypeKind {
    Procedure,
    Function,
}

/// One prototype or definition parameter: `LONG pId`, `*CSTRING pName`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub type_name: String,
    pub name: Option<String>,
    /// Leading `*` marks a by-reference parameter
    pub is_reference: bool,
    pub location: Range,
}

/// A procedure with its local data, statements, and routines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureDefinition {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub attributes: Vec<Attribute>,
    pub data: LocalDataSection,
    pub statements: Vec<Statement>,
    pub routines: Vec<RoutineDefinition>,
    pub location: Range,
}

/// `Class.Method PROCEDURE(...)` with its body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDefinition {
    pub class_name: String,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub attributes: Vec<Attribute>,
    pub data: LocalDataSection,
    pub statements: Vec<Statement>,
    pub routines: Vec<RoutineDefinition>,
    pub location: Range,
}

/// A class declaration together with the method bodies defined for it in
/// the same source unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDefinition {
    pub declaration: ClassDeclaration,
    pub methods: Vec<MethodDefinition>,
    pub location: Range,
}

/// `Name ROUTINE [DATA decls] [CODE] statements`
///
/// All four DATA/CODE combinations are valid; `data` is present exactly
/// when a DATA section was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutineDefinition {
    pub name: String,
    pub data: Option<LocalDataSection>,
    pub statements: Vec<Statement>,
    pub location: Range,
}

/// Local declarations between a definition header and its CODE marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalDataSection {
    pub entries: Vec<Declaration>,
    pub location: Range,
}

impl fmt::Display for PrototypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrototypeKind::Procedure => write!(f, "PROCEDURE"),
            PrototypeKind::Function => write!(f, "FUNCTION"),
        }
    }
}

// ----------------------------------------------------------------------------
// AstNode implementations
// ----------------------------------------------------------------------------

impl AstNode for Program {
    fn node_type(&self) -> &'static str {
        "Program"
    }
    fn display_label(&self) -> String {
        match &self.member {
            Some(member) => match &member.parent {
                Some(parent) => format!("MEMBER('{parent}')"),
                None => "MEMBER".to_string(),
            },
            None => "PROGRAM".to_string(),
        }
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_program(self);
        if let Some(member) = &self.member {
            member.accept(visitor);
        }
        if let Some(map) = &self.map {
            map.accept(visitor);
        }
        for declaration in &self.declarations {
            declaration.accept(visitor);
        }
        for definition in &self.definitions {
            definition.accept(visitor);
        }
        visitor.leave_program(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> = Vec::new();
        if let Some(member) = &self.member {
            children.push(member);
        }
        if let Some(map) = &self.map {
            children.push(map);
        }
        children.extend(self.declarations.iter().map(|d| d as &dyn AstNode));
        children.extend(self.definitions.iter().map(|d| d as &dyn AstNode));
        children
    }
}

impl Definition {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            Definition::Procedure(d) => d,
            Definition::Method(d) => d,
            Definition::Class(d) => d,
            Definition::Unknown(d) => d,
        }
    }
}

impl AstNode for Definition {
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

impl AstNode for MemberModule {
    fn node_type(&self) -> &'static str {
        "MemberModule"
    }
    fn display_label(&self) -> String {
        match &self.parent {
            Some(parent) => format!("MEMBER('{parent}')"),
            None => "MEMBER".to_string(),
        }
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_member_module(self);
    }
}

impl AstNode for MapSection {
    fn node_type(&self) -> &'static str {
        "MapSection"
    }
    fn display_label(&self) -> String {
        "MAP".to_string()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_map_section(self);
        for entry in &self.entries {
            entry.accept(visitor);
        }
        visitor.leave_map_section(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.entries.iter().map(|e| e as &dyn AstNode).collect()
    }
}

impl MapEntry {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            MapEntry::Prototype(e) => e,
            MapEntry::Module(e) => e,
            MapEntry::Unknown(e) => e,
        }
    }
}

impl AstNode for MapEntry {
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

impl AstNode for ModuleBlock {
    fn node_type(&self) -> &'static str {
        "ModuleBlock"
    }
    fn display_label(&self) -> String {
        format!("MODULE('{}')", self.target)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_module_block(self);
        for prototype in &self.prototypes {
            prototype.accept(visitor);
        }
        visitor.leave_module_block(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.prototypes.iter().map(|p| p as &dyn AstNode).collect()
    }
}

impl AstNode for Prototype {
    fn node_type(&self) -> &'static str {
        "Prototype"
    }
    fn display_label(&self) -> String {
        format!("{} {}", self.name, self.kind)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_prototype(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.attributes.iter().map(|a| a as &dyn AstNode).collect()
    }
}

fn definition_children<'a>(
    attributes: &'a [Attribute],
    data: &'a LocalDataSection,
    statements: &'a [Statement],
    routines: &'a [RoutineDefinition],
) -> Vec<&'a dyn AstNode> {
    let mut children: Vec<&dyn AstNode> =
        attributes.iter().map(|a| a as &dyn AstNode).collect();
    children.push(data);
    children.extend(statements.iter().map(|s| s as &dyn AstNode));
    children.extend(routines.iter().map(|r| r as &dyn AstNode));
    children
}

impl AstNode for ProcedureDefinition {
    fn node_type(&self) -> &'static str {
        "ProcedureDefinition"
    }
    fn display_label(&self) -> String {
        self.name.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_procedure_definition(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        self.data.accept(visitor);
        for statement in &self.statements {
            statement.accept(visitor);
        }
        for routine in &self.routines {
            routine.accept(visitor);
        }
        visitor.leave_procedure_definition(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        definition_children(&self.attributes, &self.data, &self.statements, &self.routines)
    }
}

impl AstNode for MethodDefinition {
    fn node_type(&self) -> &'static str {
        "MethodDefinition"
    }
    fn display_label(&self) -> String {
        format!("{}.{}", self.class_name, self.name)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_method_definition(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        self.data.accept(visitor);
        for statement in &self.statements {
            statement.accept(visitor);
        }
        for routine in &self.routines {
            routine.accept(visitor);
        }
        visitor.leave_method_definition(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        definition_children(&self.attributes, &self.data, &self.statements, &self.routines)
    }
}

impl AstNode for ClassDefinition {
    fn node_type(&self) -> &'static str {
        "ClassDefinition"
    }
    fn display_label(&self) -> String {
        self.declaration.name.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_class_definition(self);
        self.declaration.accept(visitor);
        for method in &self.methods {
            method.accept(visitor);
        }
        visitor.leave_class_definition(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> = vec![&self.declaration];
        children.extend(self.methods.iter().map(|m| m as &dyn AstNode));
        children
    }
}

impl AstNode for RoutineDefinition {
    fn node_type(&self) -> &'static str {
        "RoutineDefinition"
    }
    fn display_label(&self) -> String {
        self.name.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_routine_definition(self);
        if let Some(data) = &self.data {
            data.accept(visitor);
        }
        for statement in &self.statements {
            statement.accept(visitor);
        }
        visitor.leave_routine_definition(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> = Vec::new();
        if let Some(data) = &self.data {
            children.push(data);
        }
        children.extend(self.statements.iter().map(|s| s as &dyn AstNode));
        children
    }
}

impl AstNode for LocalDataSection {
    fn node_type(&self) -> &'static str {
        "LocalDataSection"
    }
    fn display_label(&self) -> String {
        format!("{} declarations", self.entries.len())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_local_data_section(self);
        for entry in &self.entries {
            entry.accept(visitor);
        }
        visitor.leave_local_data_section(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.entries.iter().map(|e| e as &dyn AstNode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_data() -> LocalDataSection {
        LocalDataSection {
            entries: Vec::new(),
            location: Range::default(),
        }
    }

    #[test]
    fn test_program_label() {
        let program = Program {
            member: Some(MemberModule {
                parent: Some("orders".to_string()),
                location: Range::default(),
            }),
            map: None,
            declarations: Vec::new(),
            definitions: Vec::new(),
            location: Range::default(),
        };
        assert_eq!(program.display_label(), "MEMBER('orders')");
    }

    #[test]
    fn test_method_label() {
        let method = MethodDefinition {
            class_name: "Orders".to_string(),
            name: "Init".to_string(),
            parameters: Vec::new(),
            return_type: None,
            attributes: Vec::new(),
            data: empty_data(),
            statements: Vec::new(),
            routines: Vec::new(),
            location: Range::default(),
        };
        assert_eq!(method.display_label(), "Orders.Init");
    }

    #[test]
    fn test_procedure_children_include_routines() {
        let procedure = ProcedureDefinition {
            name: "Main".to_string(),
            parameters: Vec::new(),
            return_type: None,
            attributes: Vec::new(),
            data: empty_data(),
            statements: Vec::new(),
            routines: vec![RoutineDefinition {
                name: "Refresh".to_string(),
                data: None,
                statements: Vec::new(),
                location: Range::default(),
            }],
            location: Range::default(),
        };
        // data section + routine
        assert_eq!(procedure.child_nodes().len(), 2);
    }
}
