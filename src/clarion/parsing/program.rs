//! Program structure rules
//!
//! The full-program grammar: PROGRAM/MEMBER prolog, MAP section, global
//! data, then procedure, method, and class definitions. Definition
//! boundaries are the grammar's coarsest disambiguation problem — a bare
//! identifier at column start may open a declaration or a definition — and
//! are resolved by peeking past the label (and an optional `.member`) for
//! the PROCEDURE/FUNCTION/ROUTINE keyword.
//!
//! Class declarations parsed in the global data section are assembled into
//! [`ClassDefinition`] nodes afterwards, with every `Class.Method
//! PROCEDURE` body in the unit attached to its class by name.

use log::trace;

use super::statements::StatementStop;
use super::{attributes::first_string, DeclarationStop, Parser};
use crate::clarion::ast::diagnostics::{codes, Diagnostic};
use crate::clarion::ast::elements::{
    Attribute, ClassDefinition, Declaration, Definition, LocalDataSection, MapEntry, MapSection,
    MemberModule, MethodDefinition, ModuleBlock, Parameter, ProcedureDefinition, Program,
    Prototype, PrototypeKind, RoutineDefinition, UnknownContent,
};
use crate::clarion::ast::range::Range;
use crate::clarion::ast::traits::AstNode;
use crate::clarion::token::{Keyword, TokenKind};

/// Comma-tail words that are prototype attributes rather than a return
/// type. Table-driven so dialect attributes are one row away.
const PROTOTYPE_ATTRIBUTES: &[&str] = &[
    "VIRTUAL", "DERIVED", "PROC", "PRIVATE", "PROTECTED", "STATIC", "PASCAL", "C", "RAW", "DLL",
    "NAME", "TYPE", "EXTENDS",
];

impl Parser<'_> {
    /// Entry point of the full program grammar.
    pub(crate) fn parse_program_root(&mut self) -> Program {
        let open = self.cursor.peek().range.clone();
        self.cursor.skip_list_separators();

        let member = self.parse_prolog();

        self.cursor.skip_list_separators();
        let map = if self.cursor.at_keyword(Keyword::Map) {
            Some(self.parse_map_section())
        } else {
            None
        };

        let mut declarations =
            self.parse_declaration_entries(DeclarationStop::program_globals());

        let mut parsed_definitions: Vec<Definition> = Vec::new();
        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() {
                break;
            }
            if self.cursor.at_keyword(Keyword::End) {
                let end = self.cursor.bump();
                self.error_stray_end(end.range);
                continue;
            }

            if self.at_definition_boundary() {
                if self.cursor.peek_at(1).kind == TokenKind::Dot {
                    parsed_definitions
                        .push(Definition::Method(self.parse_method_definition()));
                } else if self.cursor.peek_at(1).kind == TokenKind::Keyword(Keyword::Routine) {
                    self.orphan_routine(&mut parsed_definitions);
                } else {
                    parsed_definitions
                        .push(Definition::Procedure(self.parse_procedure_definition()));
                }
            } else {
                // Late declarations (data after the first definition block)
                declarations.push(self.parse_declaration());
            }
        }

        let definitions = assemble_definitions(&mut declarations, parsed_definitions);

        Program {
            member,
            map,
            declarations,
            definitions,
            location: open.through(&self.cursor.prev_range()),
        }
    }

    /// `[Name] PROGRAM` or `MEMBER['(parent)']`.
    fn parse_prolog(&mut self) -> Option<MemberModule> {
        if self.cursor.at_keyword(Keyword::Member) {
            let keyword = self.cursor.bump();
            let open = keyword.range;
            let args = self.parse_header_args();
            let parent = first_string(&args);
            return Some(MemberModule {
                parent,
                location: self.close_span(&open),
            });
        }

        if self.cursor.at_keyword(Keyword::Program) {
            self.cursor.bump();
        } else if self.cursor.peek().identifier_text().is_some()
            && self.cursor.peek_at(1).kind == TokenKind::Keyword(Keyword::Program)
        {
            self.cursor.bump();
            self.cursor.bump();
        }
        None
    }

    /// Does the cursor sit at a definition header? `Name PROCEDURE`,
    /// `Name FUNCTION`, `Name ROUTINE`, or `Class.Method PROCEDURE`.
    pub(crate) fn at_definition_boundary(&self) -> bool {
        if self.cursor.peek().identifier_text().is_none() {
            return false;
        }
        match self.cursor.peek_at(1).kind {
            TokenKind::Keyword(Keyword::Procedure)
            | TokenKind::Keyword(Keyword::Function)
            | TokenKind::Keyword(Keyword::Routine) => true,
            TokenKind::Dot => {
                self.cursor.peek_at(2).identifier_text().is_some()
                    && matches!(
                        self.cursor.peek_at(3).kind,
                        TokenKind::Keyword(Keyword::Procedure)
                            | TokenKind::Keyword(Keyword::Function)
                    )
            }
            _ => false,
        }
    }

    /// `MAP (prototype | module)* END`
    fn parse_map_section(&mut self) -> MapSection {
        let open = self.cursor.bump().range; // MAP
        trace!("parse MAP");

        let mut entries = Vec::new();
        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }

            if self.cursor.at_keyword(Keyword::Module) {
                entries.push(MapEntry::Module(self.parse_module_block()));
            } else if self.at_prototype_start() {
                entries.push(MapEntry::Prototype(self.parse_prototype()));
            } else {
                let unknown = self.unknown_in_block();
                self.warn_unknown_content(&unknown, "MAP section");
                entries.push(MapEntry::Unknown(unknown));
            }
        }
        self.expect_end("MAP");

        MapSection {
            entries,
            location: self.close_span(&open),
        }
    }

    fn at_prototype_start(&self) -> bool {
        self.cursor.peek().identifier_text().is_some()
            && matches!(
                self.cursor.peek_at(1).kind,
                TokenKind::Keyword(Keyword::Procedure) | TokenKind::Keyword(Keyword::Function)
            )
    }

    /// `MODULE('target') prototype* END`
    fn parse_module_block(&mut self) -> ModuleBlock {
        let open = self.cursor.bump().range; // MODULE
        let args = self.parse_header_args();
        let target = first_string(&args).unwrap_or_default();
        if target.is_empty() {
            self.error_expected(TokenKind::StringLit, "MODULE header");
        }

        let mut prototypes = Vec::new();
        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }
            if self.at_prototype_start() {
                prototypes.push(self.parse_prototype());
            } else {
                let unknown = self.unknown_in_block();
                self.warn_unknown_content(&unknown, "MODULE body");
            }
        }
        self.expect_end("MODULE");

        ModuleBlock {
            target,
            prototypes,
            location: self.close_span(&open),
        }
    }

    /// `Name (PROCEDURE|FUNCTION) ['(params)'] [,returnType] [,attrs]`
    pub(crate) fn parse_prototype(&mut self) -> Prototype {
        let label = self.cursor.bump();
        let open = label.range.clone();
        let kind_token = self.cursor.bump();
        let kind = if kind_token.is_keyword(Keyword::Function) {
            PrototypeKind::Function
        } else {
            PrototypeKind::Procedure
        };

        let (parameters, return_type, attributes) = self.parse_prototype_tail();

        Prototype {
            name: label.text,
            kind,
            parameters,
            return_type,
            attributes,
            location: self.close_span(&open),
        }
    }

    /// Parameter list plus the comma tail shared by prototypes and
    /// definition headers. The first comma item that is neither a known
    /// prototype attribute nor parenthesized is the return type.
    fn parse_prototype_tail(&mut self) -> (Vec<Parameter>, Option<String>, Vec<Attribute>) {
        let parameters = if self.cursor.at(TokenKind::LeftParen) {
            self.parse_parameter_list()
        } else {
            Vec::new()
        };

        let mut return_type = None;
        let mut attributes = Vec::new();
        while self.cursor.at(TokenKind::Comma) {
            self.cursor.bump();

            let Some(name) = self.cursor.peek().identifier_text() else {
                self.error_expected(TokenKind::Identifier, "prototype tail");
                break;
            };
            let is_known_attribute = PROTOTYPE_ATTRIBUTES
                .iter()
                .any(|attribute| name.eq_ignore_ascii_case(attribute));
            let has_parens = self.cursor.peek_at(1).kind == TokenKind::LeftParen;

            if return_type.is_none() && !is_known_attribute && !has_parens {
                return_type = Some(name.to_string());
                self.cursor.bump();
            } else if let Some(attribute) = self.parse_attribute() {
                attributes.push(attribute);
            } else {
                break;
            }
        }

        (parameters, return_type, attributes)
    }

    /// `'(' parameter (',' parameter)* ')'` where a parameter is
    /// `['*'] type [name]`.
    fn parse_parameter_list(&mut self) -> Vec<Parameter> {
        self.cursor.bump(); // '('
        let mut parameters = Vec::new();

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
                    self.error_expected(TokenKind::RightParen, "parameter list");
                    break;
                }
                _ => {
                    let open = self.cursor.peek().range.clone();
                    let is_reference = self.cursor.consume(TokenKind::Star).is_some();
                    match self.cursor.peek().identifier_text() {
                        Some(type_name) => {
                            let type_name = type_name.to_string();
                            self.cursor.bump();
                            if self.cursor.at(TokenKind::LeftParen) {
                                // Sized parameter type; the size is not
                                // recorded on parameters
                                self.parse_clause_args();
                            }
                            let name = match self.cursor.peek().identifier_text() {
                                Some(name) => {
                                    let name = name.to_string();
                                    self.cursor.bump();
                                    Some(name)
                                }
                                None => None,
                            };
                            parameters.push(Parameter {
                                type_name,
                                name,
                                is_reference,
                                location: self.close_span(&open),
                            });
                        }
                        None => {
                            self.error_expected(TokenKind::Identifier, "parameter list");
                            self.cursor.bump();
                        }
                    }
                }
            }
        }

        parameters
    }

    /// `Name PROCEDURE ... localData [CODE] statements routine*`
    fn parse_procedure_definition(&mut self) -> ProcedureDefinition {
        let label = self.cursor.bump();
        let open = label.range.clone();
        self.cursor.bump(); // PROCEDURE / FUNCTION
        trace!("parse procedure: {}", label.text);

        let (parameters, return_type, attributes) = self.parse_prototype_tail();
        let data = self.parse_local_data();
        self.cursor.skip_list_separators();
        let _ = self.cursor.consume_keyword(Keyword::Code);
        let statements = self.parse_statement_list(StatementStop::End, true);
        let routines = self.parse_routines();

        ProcedureDefinition {
            name: label.text,
            parameters,
            return_type,
            attributes,
            data,
            statements,
            routines,
            location: self.close_span(&open),
        }
    }

    /// `Class.Method PROCEDURE ...` — same body shape as a procedure.
    fn parse_method_definition(&mut self) -> MethodDefinition {
        let class_label = self.cursor.bump();
        let open = class_label.range.clone();
        self.cursor.bump(); // '.'
        let name_label = self.cursor.bump();
        self.cursor.bump(); // PROCEDURE / FUNCTION
        trace!("parse method: {}.{}", class_label.text, name_label.text);

        let (parameters, return_type, attributes) = self.parse_prototype_tail();
        let data = self.parse_local_data();
        self.cursor.skip_list_separators();
        let _ = self.cursor.consume_keyword(Keyword::Code);
        let statements = self.parse_statement_list(StatementStop::End, true);
        let routines = self.parse_routines();

        MethodDefinition {
            class_name: class_label.text,
            name: name_label.text,
            parameters,
            return_type,
            attributes,
            data,
            statements,
            routines,
            location: self.close_span(&open),
        }
    }

    fn parse_local_data(&mut self) -> LocalDataSection {
        let entries = self.parse_declaration_entries(DeclarationStop::local_data());
        let location = Range::bounding_box(entries.iter().map(|entry| entry.location()))
            .unwrap_or_else(|| self.cursor.prev_range());
        LocalDataSection { entries, location }
    }

    fn parse_routines(&mut self) -> Vec<RoutineDefinition> {
        let mut routines = Vec::new();
        loop {
            self.cursor.skip_list_separators();
            let at_routine = self.cursor.peek().identifier_text().is_some()
                && self.cursor.peek_at(1).kind == TokenKind::Keyword(Keyword::Routine);
            if !at_routine {
                break;
            }
            routines.push(self.parse_routine_definition());
        }
        routines
    }

    /// `Name ROUTINE [DATA decls] [CODE] statements` — all four DATA/CODE
    /// combinations are recognized.
    fn parse_routine_definition(&mut self) -> RoutineDefinition {
        let label = self.cursor.bump();
        let open = label.range.clone();
        self.cursor.bump(); // ROUTINE
        trace!("parse routine: {}", label.text);

        self.cursor.skip_statement_separators();
        let data = if self.cursor.consume_keyword(Keyword::Data).is_some() {
            Some(self.parse_local_data())
        } else {
            None
        };

        self.cursor.skip_list_separators();
        let _ = self.cursor.consume_keyword(Keyword::Code);
        let statements = self.parse_statement_list(StatementStop::End, true);

        RoutineDefinition {
            name: label.text,
            data,
            statements,
            location: self.close_span(&open),
        }
    }

    /// A ROUTINE with no enclosing procedure: parse it for recovery and
    /// attach it to the previous definition when one can own it.
    fn orphan_routine(&mut self, definitions: &mut Vec<Definition>) {
        let routine_open = self.cursor.peek().range.clone();
        let routine = self.parse_routine_definition();
        self.diagnostics.push(
            Diagnostic::error(
                routine_open,
                format!("ROUTINE {} has no enclosing PROCEDURE", routine.name),
            )
            .with_code(codes::EXPECTED_TOKEN),
        );

        match definitions.last_mut() {
            Some(Definition::Procedure(procedure)) => {
                procedure.location = procedure.location.through(&routine.location);
                procedure.routines.push(routine);
            }
            Some(Definition::Method(method)) => {
                method.location = method.location.through(&routine.location);
                method.routines.push(routine);
            }
            _ => {
                let location = routine.location.clone();
                let text = location
                    .source_slice(self.source)
                    .unwrap_or_default()
                    .to_string();
                definitions.push(Definition::Unknown(UnknownContent::new(text, location)));
            }
        }
    }
}

/// Move class declarations out of the data section, attach method bodies
/// to them by name, and order every definition by source position.
fn assemble_definitions(
    declarations: &mut Vec<Declaration>,
    parsed: Vec<Definition>,
) -> Vec<Definition> {
    let mut class_shells: Vec<ClassDefinition> = Vec::new();
    let mut data_entries = Vec::new();
    for declaration in declarations.drain(..) {
        match declaration {
            Declaration::Class(class) => class_shells.push(ClassDefinition {
                location: class.location.clone(),
                declaration: class,
                methods: Vec::new(),
            }),
            other => data_entries.push(other),
        }
    }
    *declarations = data_entries;

    let mut definitions: Vec<Definition> = Vec::new();
    for definition in parsed {
        match definition {
            Definition::Method(method) => {
                let owner = class_shells.iter_mut().find(|shell| {
                    shell
                        .declaration
                        .name
                        .eq_ignore_ascii_case(&method.class_name)
                });
                match owner {
                    Some(shell) => {
                        shell.location = shell.location.through(&method.location);
                        shell.methods.push(method);
                    }
                    None => definitions.push(Definition::Method(method)),
                }
            }
            other => definitions.push(other),
        }
    }

    definitions.extend(class_shells.into_iter().map(Definition::Class));
    definitions.sort_by_key(|definition| definition.range().span.start);
    definitions
}
