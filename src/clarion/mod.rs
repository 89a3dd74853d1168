//! Clarion parsing engine
//!
//!     The complete pipeline from source text to syntax tree:
//!
//!         Lexing:
//!             Tokenization and transformations over the token stream.
//!             Line breaks stay significant, comments move to a side
//!             channel, keywords resolve against a case-insensitive table.
//!             See [lexing].
//!
//!         Parsing:
//!             Recursive descent with bounded lookahead over the
//!             significant stream, two entry points (full program and
//!             declarations-only) sharing every inner rule. See [parsing].
//!
//!         AST:
//!             Owned node families with source ranges, a visitor-based
//!             traversal contract, and LSP-shaped diagnostics. See [ast].
//!
//!     One parse call is a pure function from text to (tree, diagnostics):
//!     no I/O, no globals, no state shared between invocations.

pub mod ast;
pub mod lexing;
pub mod parsing;
pub mod token;

pub use ast::{find_nodes_at_position, AstNode, Diagnostic, DiagnosticSeverity, Visitor};
pub use lexing::{tokenize, LexError, LexerOutput};
pub use parsing::{parse_declarations, parse_program, ParseOutput};
pub use token::{Keyword, Token, TokenKind};
