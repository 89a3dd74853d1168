//! AST node families
//!
//! One module per grammar rule group. Every node owns its children (tree
//! ownership, no cycles) and carries the source range of the tokens it was
//! built from.

pub mod attributes;
pub mod controls;
pub mod data;
pub mod expressions;
pub mod program;
pub mod statements;

pub use attributes::{
    AtClause, Attribute, FontClause, GenericAttr, MsgClause, StdClause, UnknownContent, UseClause,
};
pub use controls::{
    ButtonDefinition, ControlBlock, ItemDefinition, MenuBlock, MenuEntry, MenubarBlock,
    OptionBlock, Separator, SheetBlock, SheetEntry, TabBlock, ToolbarBlock, ToolbarEntry,
    UiElement, WindowDefinition, WindowKind,
};
pub use data::{
    ClassDeclaration, ClassMember, Declaration, EquateDefinition, FieldDefinition, FieldEntry,
    FieldReference, FieldType, FileDeclaration, FileEntry, GlobalDataSection, GlobalVariable,
    GroupBlock, IncludeDirective, KeyDefinition, QueueBlock, RecordBlock,
};
pub use expressions::{
    BinaryExpr, BinaryOp, DottedIdentifier, Expression, FieldEquate, FunctionCall, IntegerLiteral,
    Parenthesized, PropertyAccess, PropertyBase, StringLiteral,
};
pub use program::{
    ClassDefinition, Definition, LocalDataSection, MapEntry, MapSection, MemberModule,
    MethodDefinition, ModuleBlock, Parameter, ProcedureDefinition, Program, Prototype,
    PrototypeKind, RoutineDefinition,
};
pub use statements::{
    AssignmentStatement, CaseBranch, CaseStatement, DoStatement, ElsifClause,
    FunctionCallStatement, IfStatement, LoopStatement, ReturnStatement, Statement,
};
