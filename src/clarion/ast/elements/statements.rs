//! Executable statement nodes
//!
//! Statements live inside CODE sections of procedures, methods, and
//! routines. Statement lists nest arbitrarily through the control-flow
//! constructs; every block construct (IF, LOOP, CASE) is closed by an
//! explicit END or, after recovery, by a synthetic end recorded in the
//! diagnostics.
//!
//! Syntax examples:
//!     LOC:Total = LOC:Total + 1
//!     DO RefreshWindow
//!     IF x = 1 THEN y = 2.
//!     CASE Choice
//!     OF 1
//!       DO First
//!     ELSE
//!       DO Fallback
//!     END

use serde::Serialize;

use super::super::range::Range;
use super::super::traits::{AstNode, Visitor};
use super::attributes::UnknownContent;
use super::expressions::{Expression, FunctionCall};

/// Any executable statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Assignment(AssignmentStatement),
    Call(FunctionCallStatement),
    Return(ReturnStatement),
    Do(DoStatement),
    If(IfStatement),
    Loop(LoopStatement),
    Case(CaseStatement),
    /// Placeholder produced by error recovery
    Unknown(UnknownContent),
}

/// `target = expression`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentStatement {
    pub target: Expression,
    pub value: Expression,
    pub location: Range,
}

/// A bare procedure/function call in statement position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCallStatement {
    pub call: FunctionCall,
    pub location: Range,
}

/// `RETURN [expression]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub location: Range,
}

/// `DO RoutineName`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoStatement {
    pub routine: String,
    pub location: Range,
}

/// `IF condition [THEN] ...`
///
/// Either the inline form (a single statement on the same line, no END) or
/// the block form (statement list, elsif/else branches, explicit END).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    pub elsif_branches: Vec<ElsifClause>,
    pub else_branch: Option<Vec<Statement>>,
    pub location: Range,
}

/// `ELSIF condition [THEN] statements`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElsifClause {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub location: Range,
}

/// `LOOP statements END` — unconditional; exits are ordinary statements
/// inside the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopStatement {
    pub body: Vec<Statement>,
    pub location: Range,
}

/// `CASE selector OF-branch* [ELSE statements] END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseStatement {
    pub selector: Expression,
    pub branches: Vec<CaseBranch>,
    pub else_branch: Option<Vec<Statement>>,
    pub location: Range,
}

/// One `OF` branch. The selector is captured as raw text up to the
/// statement boundary; it is not validated grammatically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseBranch {
    pub selector_text: String,
    pub body: Vec<Statement>,
    pub location: Range,
}

impl Statement {
    pub fn location(&self) -> &Range {
        match self {
            Statement::Assignment(s) => &s.location,
            Statement::Call(s) => &s.location,
            Statement::Return(s) => &s.location,
            Statement::Do(s) => &s.location,
            Statement::If(s) => &s.location,
            Statement::Loop(s) => &s.location,
            Statement::Case(s) => &s.location,
            Statement::Unknown(s) => &s.location,
        }
    }

    fn as_node(&self) -> &dyn AstNode {
        match self {
            Statement::Assignment(s) => s,
            Statement::Call(s) => s,
            Statement::Return(s) => s,
            Statement::Do(s) => s,
            Statement::If(s) => s,
            Statement::Loop(s) => s,
            Statement::Case(s) => s,
            Statement::Unknown(s) => s,
        }
    }
}

impl AstNode for Statement {
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

impl AstNode for AssignmentStatement {
    fn node_type(&self) -> &'static str {
        "AssignmentStatement"
    }
    fn display_label(&self) -> String {
        format!("{} = …", self.target)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_assignment_statement(self);
        self.target.accept(visitor);
        self.value.accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        vec![&self.target, &self.value]
    }
}

impl AstNode for FunctionCallStatement {
    fn node_type(&self) -> &'static str {
        "FunctionCallStatement"
    }
    fn display_label(&self) -> String {
        self.call.name.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_function_call_statement(self);
        for arg in &self.call.args {
            arg.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.call.args.iter().map(|a| a as &dyn AstNode).collect()
    }
}

impl AstNode for ReturnStatement {
    fn node_type(&self) -> &'static str {
        "ReturnStatement"
    }
    fn display_label(&self) -> String {
        "RETURN".to_string()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_return_statement(self);
        if let Some(value) = &self.value {
            value.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.value.iter().map(|e| e as &dyn AstNode).collect()
    }
}

impl AstNode for DoStatement {
    fn node_type(&self) -> &'static str {
        "DoStatement"
    }
    fn display_label(&self) -> String {
        format!("DO {}", self.routine)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_do_statement(self);
    }
}

fn statements_as_nodes(statements: &[Statement]) -> impl Iterator<Item = &dyn AstNode> {
    statements.iter().map(|s| s as &dyn AstNode)
}

impl AstNode for IfStatement {
    fn node_type(&self) -> &'static str {
        "IfStatement"
    }
    fn display_label(&self) -> String {
        format!("IF {}", self.condition)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_if_statement(self);
        self.condition.accept(visitor);
        for statement in &self.then_branch {
            statement.accept(visitor);
        }
        for elsif in &self.elsif_branches {
            elsif.accept(visitor);
        }
        if let Some(else_branch) = &self.else_branch {
            for statement in else_branch {
                statement.accept(visitor);
            }
        }
        visitor.leave_if_statement(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> = vec![&self.condition];
        children.extend(statements_as_nodes(&self.then_branch));
        children.extend(self.elsif_branches.iter().map(|e| e as &dyn AstNode));
        if let Some(else_branch) = &self.else_branch {
            children.extend(statements_as_nodes(else_branch));
        }
        children
    }
}

impl AstNode for ElsifClause {
    fn node_type(&self) -> &'static str {
        "ElsifClause"
    }
    fn display_label(&self) -> String {
        format!("ELSIF {}", self.condition)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_elsif_clause(self);
        self.condition.accept(visitor);
        for statement in &self.body {
            statement.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> = vec![&self.condition];
        children.extend(statements_as_nodes(&self.body));
        children
    }
}

impl AstNode for LoopStatement {
    fn node_type(&self) -> &'static str {
        "LoopStatement"
    }
    fn display_label(&self) -> String {
        "LOOP".to_string()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_loop_statement(self);
        for statement in &self.body {
            statement.accept(visitor);
        }
        visitor.leave_loop_statement(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        statements_as_nodes(&self.body).collect()
    }
}

impl AstNode for CaseStatement {
    fn node_type(&self) -> &'static str {
        "CaseStatement"
    }
    fn display_label(&self) -> String {
        format!("CASE {}", self.selector)
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_case_statement(self);
        self.selector.accept(visitor);
        for branch in &self.branches {
            branch.accept(visitor);
        }
        if let Some(else_branch) = &self.else_branch {
            for statement in else_branch {
                statement.accept(visitor);
            }
        }
        visitor.leave_case_statement(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        let mut children: Vec<&dyn AstNode> = vec![&self.selector];
        children.extend(self.branches.iter().map(|b| b as &dyn AstNode));
        if let Some(else_branch) = &self.else_branch {
            children.extend(statements_as_nodes(else_branch));
        }
        children
    }
}

impl AstNode for CaseBranch {
    fn node_type(&self) -> &'static str {
        "CaseBranch"
    }
    fn display_label(&self) -> String {
        format!("OF {}", self.selector_text.trim())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_case_branch(self);
        for statement in &self.body {
            statement.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        statements_as_nodes(&self.body).collect()
    }
}
