//! Parser
//!
//!     Recursive-descent parser over the significant token stream, with
//!     bounded lookahead for the grammar's ambiguous choice points and
//!     cursor rollback where lookahead alone cannot decide.
//!
//!     Two entry points share every inner rule implementation:
//!
//!     - [`parse_program`] — the full program grammar: member/program
//!       prolog, MAP, global data, procedure/method/class definitions,
//!       routines, statements, expressions.
//!     - [`parse_declarations`] — the declarations-only grammar: global
//!       data, includes, equates, groups/queues, classes, windows, files.
//!
//!     The window sub-grammar the two share lives once, in
//!     [`controls`], invoked from both — the original pair of grammars
//!     duplicated it, which is exactly the drift this layout removes.
//!
//! Disambiguation
//!
//!     Several top-level constructs begin with a bare identifier: a
//!     variable, group, queue, class, window, or file declaration all look
//!     identical until the token after the label. Rules therefore peek past
//!     the leading identifier to the first distinguishing keyword and
//!     dispatch on it; where adjacent optional clauses make even that
//!     ambiguous, the rule saves the cursor, tries the greedy alternative,
//!     and rolls back one step on a mismatch.
//!
//! Totality
//!
//!     Parsing never fails: every malformed region produces a diagnostic
//!     plus either a placeholder node or an opaque unknown-content node,
//!     and the parse always returns a tree. There are no panics and no
//!     unbounded backtracking.

pub(crate) mod attributes;
pub(crate) mod controls;
pub(crate) mod cursor;
pub(crate) mod declarations;
pub(crate) mod expressions;
pub(crate) mod program;
pub(crate) mod recovery;
pub(crate) mod statements;

use serde::Serialize;

use crate::clarion::ast::diagnostics::Diagnostic;
use crate::clarion::ast::elements::{GlobalDataSection, Program};
use crate::clarion::lexing::{tokenize, LexError, LexerOutput};
use crate::clarion::token::Token;
use cursor::TokenCursor;

/// Result of one parse invocation: the tree, every diagnostic in source
/// order of discovery, and the comment side channel.
///
/// The tree is owned exclusively by the caller; the engine keeps no state
/// between invocations, so files can be parsed concurrently by the host.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput<T> {
    pub root: T,
    pub diagnostics: Vec<Diagnostic>,
    pub comments: Vec<Token>,
    pub lex_errors: Vec<LexError>,
}

/// Parse a source unit with the full program grammar.
pub fn parse_program(source: &str) -> ParseOutput<Program> {
    let lexed = tokenize(source);
    let mut parser = Parser::new(&lexed.tokens, source);
    let root = parser.parse_program_root();
    let diagnostics = parser.diagnostics;
    finish(lexed, diagnostics, root)
}

/// Parse a source unit with the declarations-only grammar.
pub fn parse_declarations(source: &str) -> ParseOutput<GlobalDataSection> {
    let lexed = tokenize(source);
    let mut parser = Parser::new(&lexed.tokens, source);
    let root = parser.parse_declarations_root();
    let diagnostics = parser.diagnostics;
    finish(lexed, diagnostics, root)
}

fn finish<T>(lexed: LexerOutput, parse_diagnostics: Vec<Diagnostic>, root: T) -> ParseOutput<T> {
    let mut diagnostics: Vec<Diagnostic> =
        lexed.errors.iter().map(Diagnostic::from).collect();
    diagnostics.extend(parse_diagnostics);

    ParseOutput {
        root,
        diagnostics,
        comments: lexed.comments,
        lex_errors: lexed.errors,
    }
}

/// Where a declaration list stops, beyond EOF which always stops it.
#[derive(Clone, Copy)]
pub(crate) struct DeclarationStop {
    /// Stop at END (lists nested in a block)
    pub at_end: bool,
    /// Stop at the CODE marker (local data sections)
    pub at_code: bool,
    /// Stop where a procedure/method/routine definition begins
    pub at_definitions: bool,
}

impl DeclarationStop {
    /// The declarations-only entry point: consume everything to EOF.
    pub fn at_eof_only() -> Self {
        Self {
            at_end: false,
            at_code: false,
            at_definitions: false,
        }
    }

    /// Global data of a program: runs until the first definition.
    pub fn program_globals() -> Self {
        Self {
            at_end: false,
            at_code: false,
            at_definitions: true,
        }
    }

    /// Local data of a procedure, method, or routine.
    pub fn local_data() -> Self {
        Self {
            at_end: true,
            at_code: true,
            at_definitions: true,
        }
    }
}

/// Parser state for one invocation: a cursor over the token stream and the
/// diagnostics collected so far. Rule implementations are spread over the
/// sibling modules, one per grammar family.
pub(crate) struct Parser<'a> {
    pub(crate) cursor: TokenCursor<'a>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) source: &'a str,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token], source: &'a str) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            diagnostics: Vec::new(),
            source,
        }
    }
}
