//! Statement and control-flow rules
//!
//! Statement lists nest arbitrarily; every list loop either consumes a
//! token or breaks, so parsing terminates on any input. Statement
//! separators (line breaks, semicolons, commas) are interchangeable and
//! skipped between statements.
//!
//! The IF/CASE inline shortcut: a single statement directly after
//! `THEN`/the condition, on the same line, ends the construct without an
//! END. Anything else takes the block form with an explicit (or, after
//! recovery, synthetic) END.

use log::trace;

use super::Parser;
use crate::clarion::ast::elements::{
    AssignmentStatement, CaseBranch, CaseStatement, DoStatement, ElsifClause, Expression,
    FunctionCallStatement, IfStatement, LoopStatement, ReturnStatement, Statement,
    UnknownContent,
};
use crate::clarion::ast::range::Range;
use crate::clarion::token::{Keyword, TokenKind};

/// Keywords that close the statement list they appear in.
#[derive(Clone, Copy, PartialEq)]
pub(crate) enum StatementStop {
    /// END only (LOOP bodies, ELSE branches)
    End,
    /// END, ELSE, ELSIF (IF then-branches)
    EndElseElsif,
    /// END, ELSE, OF (CASE branch bodies)
    EndElseOf,
}

impl StatementStop {
    fn stops_at(&self, keyword: Keyword) -> bool {
        match self {
            StatementStop::End => keyword == Keyword::End,
            StatementStop::EndElseElsif => {
                matches!(keyword, Keyword::End | Keyword::Else | Keyword::Elsif)
            }
            StatementStop::EndElseOf => {
                matches!(keyword, Keyword::End | Keyword::Else | Keyword::Of)
            }
        }
    }
}

impl Parser<'_> {
    /// Statement list until a stop keyword, a definition boundary (when
    /// requested), or EOF.
    pub(crate) fn parse_statement_list(
        &mut self,
        stop: StatementStop,
        stop_at_definitions: bool,
    ) -> Vec<Statement> {
        let mut statements = Vec::new();

        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() {
                break;
            }
            if let TokenKind::Keyword(keyword) = self.cursor.kind() {
                if stop.stops_at(keyword) {
                    break;
                }
            }
            if stop_at_definitions && self.at_definition_boundary() {
                break;
            }

            let before = self.cursor.position();
            statements.push(self.parse_statement(stop_at_definitions));
            if self.cursor.position() == before {
                // Guarantee progress on any input
                self.cursor.bump();
            }
        }

        statements
    }

    /// One statement; the cursor is at a significant token.
    fn parse_statement(&mut self, stop_at_definitions: bool) -> Statement {
        match self.cursor.kind() {
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(stop_at_definitions),
            TokenKind::Keyword(Keyword::Case) => self.parse_case_statement(stop_at_definitions),
            TokenKind::Keyword(Keyword::Loop) => self.parse_loop_statement(stop_at_definitions),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_statement(),
            TokenKind::QuestionMark => self.parse_reference_statement(),
            TokenKind::Identifier | TokenKind::Keyword(_) => self.parse_reference_statement(),
            _ => {
                let unknown = self.unknown_to_line_end();
                self.warn_unknown_content(&unknown, "statements");
                Statement::Unknown(unknown)
            }
        }
    }

    /// Assignment or call: both start with a reference, so parse the
    /// reference first and dispatch on what follows.
    fn parse_reference_statement(&mut self) -> Statement {
        let open = self.cursor.peek().range.clone();
        let target = self.parse_factor();

        if self.cursor.at(TokenKind::Equals) {
            self.cursor.bump();
            let value = self.parse_condition();
            return Statement::Assignment(AssignmentStatement {
                target,
                value,
                location: self.close_span(&open),
            });
        }

        match target {
            Expression::FunctionCall(call) => {
                let location = self.close_span(&open);
                Statement::Call(FunctionCallStatement { call, location })
            }
            Expression::Invalid(unknown) => {
                let mut unknown = unknown;
                let trailing = self.unknown_to_line_end();
                if !trailing.text.is_empty() {
                    unknown.location = unknown.location.through(&trailing.location);
                    unknown.text = unknown
                        .location
                        .source_slice(self.source)
                        .unwrap_or_default()
                        .to_string();
                }
                Statement::Unknown(unknown)
            }
            _ => {
                // A bare reference is not a statement
                self.error_expected(TokenKind::Equals, "statement");
                self.unknown_to_line_end();
                let location = open.through(&self.cursor.prev_range());
                let text = location
                    .source_slice(self.source)
                    .unwrap_or_default()
                    .to_string();
                Statement::Unknown(UnknownContent::new(text, location))
            }
        }
    }

    /// `IF condition [THEN] (inline-statement | block ... END)`
    fn parse_if_statement(&mut self, stop_at_definitions: bool) -> Statement {
        let open = self.cursor.bump().range; // IF
        trace!("parse IF");

        let condition = self.parse_condition();
        let _ = self.cursor.consume_keyword(Keyword::Then);

        // Inline form: a statement follows on the same line
        if self.at_inline_statement() {
            let statement = self.parse_statement(stop_at_definitions);
            return Statement::If(IfStatement {
                condition,
                then_branch: vec![statement],
                elsif_branches: Vec::new(),
                else_branch: None,
                location: self.close_span(&open),
            });
        }

        let then_branch = self.parse_statement_list(StatementStop::EndElseElsif, stop_at_definitions);

        let mut elsif_branches = Vec::new();
        while self.cursor.at_keyword(Keyword::Elsif) {
            let elsif_open = self.cursor.bump().range;
            let elsif_condition = self.parse_condition();
            let _ = self.cursor.consume_keyword(Keyword::Then);
            let body = self.parse_statement_list(StatementStop::EndElseElsif, stop_at_definitions);
            elsif_branches.push(ElsifClause {
                condition: elsif_condition,
                body,
                location: self.close_span(&elsif_open),
            });
        }

        let else_branch = if self.cursor.consume_keyword(Keyword::Else).is_some() {
            Some(self.parse_statement_list(StatementStop::End, stop_at_definitions))
        } else {
            None
        };

        self.expect_end("IF");

        Statement::If(IfStatement {
            condition,
            then_branch,
            elsif_branches,
            else_branch,
            location: self.close_span(&open),
        })
    }

    /// Is the next token an inline statement start on the same line?
    fn at_inline_statement(&self) -> bool {
        let next = self.cursor.peek();
        if next.is_statement_separator() || next.is_eof() {
            return false;
        }
        !matches!(
            next.kind,
            TokenKind::Keyword(Keyword::End)
                | TokenKind::Keyword(Keyword::Else)
                | TokenKind::Keyword(Keyword::Elsif)
        )
    }

    /// `CASE selector (OF raw-selector statements)* [ELSE statements] END`
    fn parse_case_statement(&mut self, stop_at_definitions: bool) -> Statement {
        let open = self.cursor.bump().range; // CASE
        trace!("parse CASE");

        let selector = self.parse_condition();

        let mut branches = Vec::new();
        loop {
            self.cursor.skip_statement_separators();
            if !self.cursor.at_keyword(Keyword::Of) {
                break;
            }
            let of_open = self.cursor.bump().range;
            let selector_text = self.case_branch_selector();
            let body = self.parse_statement_list(StatementStop::EndElseOf, stop_at_definitions);
            branches.push(CaseBranch {
                selector_text,
                body,
                location: self.close_span(&of_open),
            });
        }

        let else_branch = if self.cursor.consume_keyword(Keyword::Else).is_some() {
            Some(self.parse_statement_list(StatementStop::End, stop_at_definitions))
        } else {
            None
        };

        self.expect_end("CASE");

        Statement::Case(CaseStatement {
            selector,
            branches,
            else_branch,
            location: self.close_span(&open),
        })
    }

    /// OF-branch selectors are raw token runs up to the statement
    /// boundary; they are not validated grammatically.
    fn case_branch_selector(&mut self) -> String {
        let start = self.cursor.peek().range.clone();
        let mut end: Option<Range> = None;

        while !self.cursor.at_eof()
            && !self.cursor.peek().is_statement_separator()
            && !self.cursor.at_keyword(Keyword::End)
        {
            end = Some(self.cursor.bump().range);
        }

        match end {
            Some(end) => start
                .through(&end)
                .source_slice(self.source)
                .unwrap_or_default()
                .trim()
                .to_string(),
            None => String::new(),
        }
    }

    /// `LOOP statements END` — unconditional by design; exit conditions
    /// are ordinary statements in the body.
    fn parse_loop_statement(&mut self, stop_at_definitions: bool) -> Statement {
        let open = self.cursor.bump().range; // LOOP
        trace!("parse LOOP");

        let body = self.parse_statement_list(StatementStop::End, stop_at_definitions);
        self.expect_end("LOOP");

        Statement::Loop(LoopStatement {
            body,
            location: self.close_span(&open),
        })
    }

    /// `RETURN [condition]`
    fn parse_return_statement(&mut self) -> Statement {
        let open = self.cursor.bump().range; // RETURN

        let value = if self.at_inline_statement() {
            Some(self.parse_condition())
        } else {
            None
        };

        Statement::Return(ReturnStatement {
            value,
            location: self.close_span(&open),
        })
    }

    /// `DO routineName`
    fn parse_do_statement(&mut self) -> Statement {
        let open = self.cursor.bump().range; // DO

        let routine = match self.cursor.peek().identifier_text() {
            Some(name) => {
                let name = name.to_string();
                self.cursor.bump();
                name
            }
            None => {
                self.error_expected(TokenKind::Identifier, "DO statement");
                String::new()
            }
        };

        Statement::Do(DoStatement {
            routine,
            location: self.close_span(&open),
        })
    }
}
