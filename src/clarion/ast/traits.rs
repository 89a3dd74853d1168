//! AST traits - Common interfaces for uniform node access
//!
//! This module defines the traversal contract handed to external tooling:
//! outline, folding, and hover providers see the tree exclusively through
//! these traits and [`find_nodes_at_position`](super::find_nodes_at_position).
//! Nothing internal to the parser leaks through this surface.

use super::elements::{
    AssignmentStatement, Attribute, ButtonDefinition, CaseBranch, CaseStatement, ClassDeclaration,
    ClassDefinition, ControlBlock, DoStatement, ElsifClause, EquateDefinition, Expression,
    FieldDefinition, FieldReference, FileDeclaration, FunctionCallStatement, GlobalDataSection,
    GlobalVariable, GroupBlock, IfStatement, IncludeDirective, ItemDefinition, KeyDefinition,
    LocalDataSection, LoopStatement, MapSection, MemberModule, MenuBlock, MenubarBlock,
    MethodDefinition, ModuleBlock, OptionBlock, ProcedureDefinition, Program, Prototype,
    QueueBlock, RecordBlock, ReturnStatement, RoutineDefinition, Separator, SheetBlock, TabBlock,
    ToolbarBlock, UnknownContent, WindowDefinition,
};
use super::range::{Position, Range};

/// Visitor trait for traversing the AST
///
/// Implement this trait to walk the tree. Block nodes get paired
/// `visit_*`/`leave_*` calls around their children; leaf nodes get a single
/// `visit_*`. Default implementations are empty, so implementors only
/// override the methods they care about.
pub trait Visitor {
    // Program structure
    fn visit_program(&mut self, _node: &Program) {}
    fn leave_program(&mut self, _node: &Program) {}
    fn visit_member_module(&mut self, _node: &MemberModule) {}
    fn visit_map_section(&mut self, _node: &MapSection) {}
    fn leave_map_section(&mut self, _node: &MapSection) {}
    fn visit_module_block(&mut self, _node: &ModuleBlock) {}
    fn leave_module_block(&mut self, _node: &ModuleBlock) {}
    fn visit_prototype(&mut self, _node: &Prototype) {}
    fn visit_procedure_definition(&mut self, _node: &ProcedureDefinition) {}
    fn leave_procedure_definition(&mut self, _node: &ProcedureDefinition) {}
    fn visit_method_definition(&mut self, _node: &MethodDefinition) {}
    fn leave_method_definition(&mut self, _node: &MethodDefinition) {}
    fn visit_class_definition(&mut self, _node: &ClassDefinition) {}
    fn leave_class_definition(&mut self, _node: &ClassDefinition) {}
    fn visit_routine_definition(&mut self, _node: &RoutineDefinition) {}
    fn leave_routine_definition(&mut self, _node: &RoutineDefinition) {}
    fn visit_local_data_section(&mut self, _node: &LocalDataSection) {}
    fn leave_local_data_section(&mut self, _node: &LocalDataSection) {}

    // Data declarations
    fn visit_global_data_section(&mut self, _node: &GlobalDataSection) {}
    fn leave_global_data_section(&mut self, _node: &GlobalDataSection) {}
    fn visit_global_variable(&mut self, _node: &GlobalVariable) {}
    fn visit_field_definition(&mut self, _node: &FieldDefinition) {}
    fn visit_field_reference(&mut self, _node: &FieldReference) {}
    fn visit_group_block(&mut self, _node: &GroupBlock) {}
    fn leave_group_block(&mut self, _node: &GroupBlock) {}
    fn visit_queue_block(&mut self, _node: &QueueBlock) {}
    fn leave_queue_block(&mut self, _node: &QueueBlock) {}
    fn visit_class_declaration(&mut self, _node: &ClassDeclaration) {}
    fn leave_class_declaration(&mut self, _node: &ClassDeclaration) {}
    fn visit_equate_definition(&mut self, _node: &EquateDefinition) {}
    fn visit_include_directive(&mut self, _node: &IncludeDirective) {}
    fn visit_file_declaration(&mut self, _node: &FileDeclaration) {}
    fn leave_file_declaration(&mut self, _node: &FileDeclaration) {}
    fn visit_record_block(&mut self, _node: &RecordBlock) {}
    fn leave_record_block(&mut self, _node: &RecordBlock) {}
    fn visit_key_definition(&mut self, _node: &KeyDefinition) {}

    // Statements
    fn visit_assignment_statement(&mut self, _node: &AssignmentStatement) {}
    fn visit_function_call_statement(&mut self, _node: &FunctionCallStatement) {}
    fn visit_return_statement(&mut self, _node: &ReturnStatement) {}
    fn visit_do_statement(&mut self, _node: &DoStatement) {}
    fn visit_if_statement(&mut self, _node: &IfStatement) {}
    fn leave_if_statement(&mut self, _node: &IfStatement) {}
    fn visit_elsif_clause(&mut self, _node: &ElsifClause) {}
    fn visit_loop_statement(&mut self, _node: &LoopStatement) {}
    fn leave_loop_statement(&mut self, _node: &LoopStatement) {}
    fn visit_case_statement(&mut self, _node: &CaseStatement) {}
    fn leave_case_statement(&mut self, _node: &CaseStatement) {}
    fn visit_case_branch(&mut self, _node: &CaseBranch) {}

    // Expressions (one hook for the whole family; the expression tree is
    // walked via child_nodes)
    fn visit_expression(&mut self, _node: &Expression) {}

    // UI structures
    fn visit_window_definition(&mut self, _node: &WindowDefinition) {}
    fn leave_window_definition(&mut self, _node: &WindowDefinition) {}
    fn visit_menubar_block(&mut self, _node: &MenubarBlock) {}
    fn leave_menubar_block(&mut self, _node: &MenubarBlock) {}
    fn visit_menu_block(&mut self, _node: &MenuBlock) {}
    fn leave_menu_block(&mut self, _node: &MenuBlock) {}
    fn visit_item_definition(&mut self, _node: &ItemDefinition) {}
    fn visit_separator(&mut self, _node: &Separator) {}
    fn visit_toolbar_block(&mut self, _node: &ToolbarBlock) {}
    fn leave_toolbar_block(&mut self, _node: &ToolbarBlock) {}
    fn visit_button_definition(&mut self, _node: &ButtonDefinition) {}
    fn visit_sheet_block(&mut self, _node: &SheetBlock) {}
    fn leave_sheet_block(&mut self, _node: &SheetBlock) {}
    fn visit_tab_block(&mut self, _node: &TabBlock) {}
    fn leave_tab_block(&mut self, _node: &TabBlock) {}
    fn visit_option_block(&mut self, _node: &OptionBlock) {}
    fn leave_option_block(&mut self, _node: &OptionBlock) {}
    fn visit_control_block(&mut self, _node: &ControlBlock) {}

    // Shared clause and fallback nodes
    fn visit_attribute(&mut self, _node: &Attribute) {}
    fn visit_unknown_content(&mut self, _node: &UnknownContent) {}
}

/// Common interface for all AST nodes
pub trait AstNode {
    /// Stable node kind name, e.g. `"WindowDefinition"`.
    fn node_type(&self) -> &'static str;

    /// Short human-readable label for outline views.
    fn display_label(&self) -> String;

    /// The source range the node was built from.
    fn range(&self) -> &Range;

    /// Accept a visitor for traversing this node and its children.
    fn accept(&self, visitor: &mut dyn Visitor);

    /// Direct children, type-erased, for generic traversal.
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        Vec::new()
    }
}

/// Find the deepest nodes whose range contains `position`.
///
/// Used by hover and cursor-mapping providers: the result is the innermost
/// node (or nodes, when ranges tie) under the cursor. The root itself is
/// never returned.
pub fn find_nodes_at_position<'a>(
    root: &'a dyn AstNode,
    position: Position,
) -> Vec<&'a dyn AstNode> {
    let mut found = Vec::new();
    collect_deepest(root, position, &mut found);
    found
}

fn collect_deepest<'a>(
    node: &'a dyn AstNode,
    position: Position,
    found: &mut Vec<&'a dyn AstNode>,
) {
    for child in node.child_nodes() {
        if child.range().contains(position) {
            let before = found.len();
            collect_deepest(child, position, found);
            if found.len() == before {
                found.push(child);
            }
        }
    }
}
