//! Data declaration rules
//!
//! Almost every declaration begins with a bare identifier label, so this
//! module is where the grammar's leading-identifier ambiguity is resolved:
//! the rule peeks one token past the label and dispatches on the first
//! distinguishing keyword (EQUATE, GROUP, QUEUE, CLASS, WINDOW,
//! APPLICATION, FILE) — anything else is a variable declaration and the
//! token in that position is its type name.

use log::trace;

use super::{DeclarationStop, Parser};
use crate::clarion::ast::elements::{
    Attribute, ClassDeclaration, ClassMember, Declaration, EquateDefinition, Expression,
    FieldDefinition, FieldEntry, FieldReference, FieldType, FileDeclaration, FileEntry,
    GlobalDataSection, GlobalVariable, GroupBlock, IncludeDirective, KeyDefinition, QueueBlock,
    RecordBlock, UnknownContent,
};
use crate::clarion::ast::range::Range;
use crate::clarion::token::{Keyword, TokenKind};

/// Parsed pieces shared by variable and field declarations.
struct VariableParts {
    name: String,
    is_reference: bool,
    field_type: FieldType,
    attributes: Vec<Attribute>,
    location: Range,
}

impl Parser<'_> {
    /// Entry point of the declarations-only grammar: declarations until
    /// end of file. A stray END is reported and skipped.
    pub(crate) fn parse_declarations_root(&mut self) -> GlobalDataSection {
        let open = self.cursor.peek().range.clone();
        let entries = self.parse_declaration_entries(DeclarationStop::at_eof_only());

        GlobalDataSection {
            entries,
            location: open.through(&self.cursor.prev_range()),
        }
    }

    /// Declaration list shared by the global section, local data sections,
    /// and MODULE-less contexts. Stops per `stop`, always stops at EOF.
    pub(crate) fn parse_declaration_entries(&mut self, stop: DeclarationStop) -> Vec<Declaration> {
        let mut entries = Vec::new();

        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() {
                break;
            }
            if self.cursor.at_keyword(Keyword::End) {
                if stop.at_end {
                    break;
                }
                let end = self.cursor.bump();
                self.error_stray_end(end.range);
                continue;
            }
            if stop.at_code && self.cursor.at_keyword(Keyword::Code) {
                break;
            }
            if stop.at_definitions && self.at_definition_boundary() {
                break;
            }
            entries.push(self.parse_declaration());
        }

        entries
    }

    /// One declaration; the cursor is at a significant token.
    pub(crate) fn parse_declaration(&mut self) -> Declaration {
        if self.cursor.at_keyword(Keyword::Include) {
            return Declaration::Include(self.parse_include());
        }

        if self.cursor.peek().identifier_text().is_none() {
            let unknown = self.unknown_to_line_end();
            self.warn_unknown_content(&unknown, "declarations");
            return Declaration::Unknown(unknown);
        }

        match self.cursor.peek_at(1).kind {
            TokenKind::Keyword(Keyword::Equate) => Declaration::Equate(self.parse_equate()),
            TokenKind::Keyword(Keyword::Group) => {
                Declaration::Group(self.parse_group_structure(Keyword::Group))
            }
            TokenKind::Keyword(Keyword::Queue) => {
                let group = self.parse_group_structure(Keyword::Queue);
                Declaration::Queue(QueueBlock {
                    name: group.name,
                    base: group.base,
                    attributes: group.attributes,
                    fields: group.fields,
                    location: group.location,
                })
            }
            TokenKind::Keyword(Keyword::Class) => {
                Declaration::Class(self.parse_class_declaration())
            }
            TokenKind::Keyword(Keyword::Window) | TokenKind::Keyword(Keyword::Application) => {
                Declaration::Window(self.parse_window_definition())
            }
            TokenKind::Keyword(Keyword::File) => {
                Declaration::File(self.parse_file_declaration())
            }
            _ => match self.parse_variable_parts() {
                Ok(parts) => Declaration::Variable(GlobalVariable {
                    name: parts.name,
                    is_reference: parts.is_reference,
                    field_type: parts.field_type,
                    attributes: parts.attributes,
                    location: parts.location,
                }),
                Err(unknown) => Declaration::Unknown(unknown),
            },
        }
    }

    /// `Name ['&'] type ['(' size [',' decimals] ')'] (',' attribute)*`
    fn parse_variable_parts(&mut self) -> Result<VariableParts, UnknownContent> {
        let label = self.cursor.bump();
        let open = label.range.clone();
        let is_reference = self.cursor.consume(TokenKind::Ampersand).is_some();

        let Some(type_name) = self.cursor.peek().identifier_text().map(str::to_string) else {
            self.error_expected(TokenKind::Identifier, "declaration type");
            let trailing = self.unknown_to_line_end();
            let location = open.through(&trailing.location);
            let text = location
                .source_slice(self.source)
                .unwrap_or_default()
                .to_string();
            return Err(UnknownContent::new(text, location));
        };
        let type_token = self.cursor.bump();
        let type_open = type_token.range;

        let (size, decimals) = if self.cursor.at(TokenKind::LeftParen) {
            let mut slots = self.parse_clause_args().into_iter();
            (slots.next().flatten(), slots.next().flatten())
        } else {
            (None, None)
        };
        let field_type = FieldType {
            name: type_name,
            size,
            decimals,
            location: self.close_span(&type_open),
        };

        let attributes = self.parse_comma_attributes();

        Ok(VariableParts {
            name: label.text,
            is_reference,
            field_type,
            attributes,
            location: self.close_span(&open),
        })
    }

    /// `Name (GROUP|QUEUE) ['(' base ')'] (',' attr)* field* END`
    pub(crate) fn parse_group_structure(&mut self, keyword: Keyword) -> GroupBlock {
        let label = self.cursor.bump();
        let open = label.range.clone();
        self.cursor.bump(); // GROUP / QUEUE
        trace!("parse {keyword}: {}", label.text);

        let base = self.parse_base_type();
        let attributes = self.parse_comma_attributes();
        let fields = self.parse_field_entries();
        self.expect_end(keyword.as_str());

        GroupBlock {
            name: label.text,
            base,
            attributes,
            fields,
            location: self.close_span(&open),
        }
    }

    /// `'(' ID ')'` after GROUP/QUEUE/CLASS, naming the base type.
    fn parse_base_type(&mut self) -> Option<String> {
        if !self.cursor.at(TokenKind::LeftParen) {
            return None;
        }
        self.cursor.bump();

        let base = match self.cursor.peek().identifier_text() {
            Some(name) => {
                let name = name.to_string();
                self.cursor.bump();
                Some(name)
            }
            None => {
                self.error_expected(TokenKind::Identifier, "base type");
                None
            }
        };
        let _ = self.expect(TokenKind::RightParen, "base type");
        base
    }

    /// Fields of a group/queue/record body until END. Groups nest.
    pub(crate) fn parse_field_entries(&mut self) -> Vec<FieldEntry> {
        let mut fields = Vec::new();

        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }

            if self.cursor.peek().identifier_text().is_some() {
                if self.cursor.peek_at(1).kind == TokenKind::Keyword(Keyword::Group) {
                    fields.push(FieldEntry::Group(self.parse_group_structure(Keyword::Group)));
                    continue;
                }
                match self.parse_variable_parts() {
                    Ok(parts) => fields.push(FieldEntry::Field(FieldDefinition {
                        name: parts.name,
                        is_reference: parts.is_reference,
                        field_type: parts.field_type,
                        attributes: parts.attributes,
                        location: parts.location,
                    })),
                    Err(unknown) => fields.push(FieldEntry::Unknown(unknown)),
                }
            } else {
                let unknown = self.unknown_in_block();
                self.warn_unknown_content(&unknown, "structure body");
                fields.push(FieldEntry::Unknown(unknown));
            }
        }

        fields
    }

    /// `Name CLASS ['(' parent ')'] (',' attr)* member* END`
    pub(crate) fn parse_class_declaration(&mut self) -> ClassDeclaration {
        let label = self.cursor.bump();
        let open = label.range.clone();
        self.cursor.bump(); // CLASS
        trace!("parse class: {}", label.text);

        let parent = self.parse_base_type();
        let attributes = self.parse_comma_attributes();

        let mut members = Vec::new();
        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }

            if self.cursor.peek().identifier_text().is_some() {
                match self.cursor.peek_at(1).kind {
                    TokenKind::Keyword(Keyword::Procedure)
                    | TokenKind::Keyword(Keyword::Function) => {
                        members.push(ClassMember::Method(self.parse_prototype()));
                    }
                    _ => match self.parse_variable_parts() {
                        Ok(parts) => members.push(ClassMember::Field(FieldDefinition {
                            name: parts.name,
                            is_reference: parts.is_reference,
                            field_type: parts.field_type,
                            attributes: parts.attributes,
                            location: parts.location,
                        })),
                        Err(unknown) => members.push(ClassMember::Unknown(unknown)),
                    },
                }
            } else {
                let unknown = self.unknown_in_block();
                self.warn_unknown_content(&unknown, "class body");
                members.push(ClassMember::Unknown(unknown));
            }
        }
        self.expect_end("CLASS");

        ClassDeclaration {
            name: label.text,
            parent,
            attributes,
            members,
            location: self.close_span(&open),
        }
    }

    /// `Name FILE (',' attr)* (key | record)* END`
    fn parse_file_declaration(&mut self) -> FileDeclaration {
        let label = self.cursor.bump();
        let open = label.range.clone();
        self.cursor.bump(); // FILE
        trace!("parse file: {}", label.text);

        let attributes = self.parse_comma_attributes();

        let mut entries = Vec::new();
        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }

            if self.cursor.at_keyword(Keyword::Record) {
                entries.push(FileEntry::Record(self.parse_record_block(false)));
            } else if self.cursor.peek().identifier_text().is_some() {
                match self.cursor.peek_at(1).kind {
                    TokenKind::Keyword(Keyword::Key) => {
                        entries.push(FileEntry::Key(self.parse_key_definition()));
                    }
                    TokenKind::Keyword(Keyword::Record) => {
                        entries.push(FileEntry::Record(self.parse_record_block(true)));
                    }
                    _ => {
                        let unknown = self.unknown_in_block();
                        self.warn_unknown_content(&unknown, "FILE body");
                        entries.push(FileEntry::Unknown(unknown));
                    }
                }
            } else {
                let unknown = self.unknown_in_block();
                self.warn_unknown_content(&unknown, "FILE body");
                entries.push(FileEntry::Unknown(unknown));
            }
        }
        self.expect_end("FILE");

        FileDeclaration {
            name: label.text,
            attributes,
            entries,
            location: self.close_span(&open),
        }
    }

    /// `[Name] RECORD (',' attr)* field* END`; the record prefix comes out
    /// of a PRE attribute when one is present.
    fn parse_record_block(&mut self, labeled: bool) -> RecordBlock {
        let name = if labeled {
            let label = self.cursor.bump();
            Some(label)
        } else {
            None
        };
        let record_kw = self.cursor.bump(); // RECORD
        let open = name
            .as_ref()
            .map(|label| label.range.clone())
            .unwrap_or_else(|| record_kw.range.clone());

        let attributes = self.parse_comma_attributes();
        let prefix = extract_prefix(&attributes);
        let fields = self.parse_field_entries();
        self.expect_end("RECORD");

        RecordBlock {
            name: name.map(|label| label.text),
            prefix,
            attributes,
            fields,
            location: self.close_span(&open),
        }
    }

    /// `Name KEY ['(' component (',' component)* ')'] (',' attr)*`
    fn parse_key_definition(&mut self) -> KeyDefinition {
        let label = self.cursor.bump();
        let open = label.range.clone();
        self.cursor.bump(); // KEY

        let mut components = Vec::new();
        if self.cursor.at(TokenKind::LeftParen) {
            self.cursor.bump();
            loop {
                match self.cursor.kind() {
                    TokenKind::RightParen => {
                        self.cursor.bump();
                        break;
                    }
                    TokenKind::Comma | TokenKind::Plus | TokenKind::Minus => {
                        // Commas separate components; sign markers order them
                        self.cursor.bump();
                    }
                    TokenKind::LineBreak | TokenKind::Eof => {
                        self.error_expected(TokenKind::RightParen, "key components");
                        break;
                    }
                    _ => {
                        if self.cursor.peek().identifier_text().is_some() {
                            components.push(self.parse_field_reference());
                        } else {
                            self.error_expected(TokenKind::Identifier, "key components");
                            self.cursor.bump();
                        }
                    }
                }
            }
        }

        let attributes = self.parse_comma_attributes();

        KeyDefinition {
            name: label.text,
            components,
            attributes,
            location: self.close_span(&open),
        }
    }

    /// `ID (':' ID)*`
    pub(crate) fn parse_field_reference(&mut self) -> FieldReference {
        let first = self.cursor.bump();
        let open = first.range.clone();
        let mut parts = vec![first.text];

        while self.cursor.at(TokenKind::Colon) && self.cursor.peek_at(1).identifier_text().is_some()
        {
            self.cursor.bump();
            parts.push(self.cursor.bump().text);
        }

        FieldReference {
            parts,
            location: self.close_span(&open),
        }
    }

    /// `Name EQUATE ['(' value ')']`
    fn parse_equate(&mut self) -> EquateDefinition {
        let label = self.cursor.bump();
        let open = label.range.clone();
        self.cursor.bump(); // EQUATE

        let value = if self.cursor.at(TokenKind::LeftParen) {
            self.parse_clause_args().into_iter().next().flatten()
        } else {
            None
        };

        EquateDefinition {
            name: label.text,
            value,
            location: self.close_span(&open),
        }
    }

    /// `INCLUDE('file' [,'section'] [,ONCE])`
    fn parse_include(&mut self) -> IncludeDirective {
        let keyword = self.cursor.bump();
        let open = keyword.range;

        let args = if self.cursor.at(TokenKind::LeftParen) {
            self.parse_clause_args()
        } else {
            self.error_expected(TokenKind::LeftParen, "INCLUDE directive");
            Vec::new()
        };

        let mut strings = args.iter().flatten().filter_map(|argument| match argument {
            Expression::String(literal) => Some(literal.value.clone()),
            _ => None,
        });
        let path = strings.next().unwrap_or_default();
        let section = strings.next();
        let once = args.iter().flatten().any(|argument| match argument {
            Expression::Dotted(dotted) => {
                dotted.parts.len() == 1 && dotted.parts[0].eq_ignore_ascii_case("ONCE")
            }
            _ => false,
        });

        if path.is_empty() {
            self.error_expected(TokenKind::StringLit, "INCLUDE directive");
        }

        IncludeDirective {
            path,
            section,
            once,
            location: self.close_span(&open),
        }
    }
}

/// Pull the record prefix out of a `PRE(...)` attribute.
fn extract_prefix(attributes: &[Attribute]) -> Option<String> {
    attributes.iter().find_map(|attribute| match attribute {
        Attribute::Generic(generic) if generic.name.eq_ignore_ascii_case("PRE") => {
            generic.args.first().and_then(|slot| slot.as_ref()).map(|argument| match argument {
                Expression::Dotted(dotted) => dotted.parts.join(":"),
                other => other.to_string(),
            })
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarion::lexing::tokenize;

    fn parse(source: &str) -> (GlobalDataSection, Vec<crate::clarion::ast::Diagnostic>) {
        let output = tokenize(source);
        let mut parser = Parser::new(&output.tokens, source);
        let root = parser.parse_declarations_root();
        (root, parser.diagnostics)
    }

    #[test]
    fn test_simple_variable() {
        let (root, diagnostics) = parse("Count LONG\n");
        assert!(diagnostics.is_empty());
        assert_eq!(root.entries.len(), 1);
        let Declaration::Variable(variable) = &root.entries[0] else {
            panic!("expected variable");
        };
        assert_eq!(variable.name, "Count");
        assert_eq!(variable.field_type.name, "LONG");
        assert!(!variable.is_reference);
    }

    #[test]
    fn test_sized_type_and_attributes() {
        let (root, diagnostics) = parse("Name STRING(30),STATIC,DIM(4)\n");
        assert!(diagnostics.is_empty());
        let Declaration::Variable(variable) = &root.entries[0] else {
            panic!("expected variable");
        };
        assert_eq!(variable.field_type.name, "STRING");
        assert!(variable.field_type.size.is_some());
        assert_eq!(variable.attributes.len(), 2);
    }

    #[test]
    fn test_reference_variable() {
        let (root, _) = parse("Ref &CSTRING\n");
        let Declaration::Variable(variable) = &root.entries[0] else {
            panic!("expected variable");
        };
        assert!(variable.is_reference);
        assert_eq!(variable.field_type.name, "CSTRING");
    }

    #[test]
    fn test_queue_with_fields() {
        let source = "Q QUEUE\n  Name STRING(30)\n  Age LONG\nEND\n";
        let (root, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        let Declaration::Queue(queue) = &root.entries[0] else {
            panic!("expected queue");
        };
        assert_eq!(queue.name, "Q");
        assert_eq!(queue.fields.len(), 2);
        let FieldEntry::Field(name_field) = &queue.fields[0] else {
            panic!("expected field");
        };
        assert_eq!(name_field.field_type.name, "STRING");
        let FieldEntry::Field(age) = &queue.fields[1] else {
            panic!("expected field");
        };
        assert_eq!(age.field_type.name, "LONG");
    }

    #[test]
    fn test_nested_group() {
        let source = "Outer GROUP\nInner GROUP\nX LONG\n END\nY LONG\nEND\n";
        let (root, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        let Declaration::Group(group) = &root.entries[0] else {
            panic!("expected group");
        };
        assert_eq!(group.fields.len(), 2);
        assert!(matches!(group.fields[0], FieldEntry::Group(_)));
    }

    #[test]
    fn test_group_missing_end_recovers() {
        let (root, diagnostics) = parse("G GROUP\nX LONG\n");
        assert_eq!(root.entries.len(), 1);
        assert!(diagnostics
            .iter()
            .any(|d| d.code.as_deref() == Some("missing-end")));
    }

    #[test]
    fn test_equate() {
        let (root, diagnostics) = parse("True EQUATE(1)\n");
        assert!(diagnostics.is_empty());
        let Declaration::Equate(equate) = &root.entries[0] else {
            panic!("expected equate");
        };
        assert_eq!(equate.name, "True");
        assert!(equate.value.is_some());
    }

    #[test]
    fn test_include_directive() {
        let (root, diagnostics) = parse("  INCLUDE('equates.clw','Colors',ONCE)\n");
        assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        let Declaration::Include(include) = &root.entries[0] else {
            panic!("expected include");
        };
        assert_eq!(include.path, "equates.clw");
        assert_eq!(include.section.as_deref(), Some("Colors"));
        assert!(include.once);
    }

    #[test]
    fn test_class_declaration_with_members() {
        let source = "Orders CLASS(BaseClass),TYPE\nTotal LONG\nInit PROCEDURE(LONG pId)\nEND\n";
        let (root, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        let Declaration::Class(class) = &root.entries[0] else {
            panic!("expected class");
        };
        assert_eq!(class.parent.as_deref(), Some("BaseClass"));
        assert_eq!(class.members.len(), 2);
        assert!(matches!(class.members[0], ClassMember::Field(_)));
        assert!(matches!(class.members[1], ClassMember::Method(_)));
    }

    #[test]
    fn test_file_with_key_and_record() {
        let source = "Customers FILE,DRIVER('TOPSPEED'),PRE(Cus)\n\
                      NameKey KEY(Cus:Name),DUP\n\
                      Record RECORD\n\
                      Name STRING(20)\n\
                      END\n\
                      END\n";
        let (root, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        let Declaration::File(file) = &root.entries[0] else {
            panic!("expected file");
        };
        assert_eq!(file.name, "Customers");
        assert_eq!(file.entries.len(), 2);
        let FileEntry::Key(key) = &file.entries[0] else {
            panic!("expected key");
        };
        assert_eq!(key.components.len(), 1);
        assert_eq!(key.components[0].parts, vec!["Cus", "Name"]);
        let FileEntry::Record(record) = &file.entries[1] else {
            panic!("expected record");
        };
        assert_eq!(record.name.as_deref(), Some("Record"));
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn test_record_prefix_extracted() {
        let source = "F FILE\nRec RECORD,PRE(Loc)\nX LONG\nEND\nEND\n";
        let (root, _) = parse(source);
        let Declaration::File(file) = &root.entries[0] else {
            panic!("expected file");
        };
        let FileEntry::Record(record) = &file.entries[0] else {
            panic!("expected record");
        };
        assert_eq!(record.prefix.as_deref(), Some("Loc"));
    }

    #[test]
    fn test_stray_end_reported_and_skipped() {
        let (root, diagnostics) = parse("END\nCount LONG\n");
        assert_eq!(root.entries.len(), 1);
        assert!(diagnostics
            .iter()
            .any(|d| d.code.as_deref() == Some("stray-end")));
    }

    #[test]
    fn test_unrecognized_content_becomes_unknown_node() {
        let (root, diagnostics) = parse("123 456\nCount LONG\n");
        assert_eq!(root.entries.len(), 2);
        assert!(matches!(root.entries[0], Declaration::Unknown(_)));
        assert!(matches!(root.entries[1], Declaration::Variable(_)));
        assert!(diagnostics
            .iter()
            .any(|d| d.code.as_deref() == Some("unknown-content")));
    }
}
