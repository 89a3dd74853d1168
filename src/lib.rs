//! # clarion-parser
//!
//! A parsing engine for the Clarion 4GL: a lexer for its free-form,
//! line-oriented, largely case-insensitive source text, and a
//! recursive-descent parser producing a syntax tree plus diagnostics.
//!
//! The engine is the core of editor tooling — outline, folding, hover and
//! diagnostics providers consume the tree through the read-only traversal
//! contract in [`clarion::ast`]. Everything around it (file discovery,
//! include resolution, the LSP surface itself) is the host's concern; this
//! crate has no I/O and no global state.
//!
//! Entry points:
//!
//! - [`clarion::parse_program`] — full program grammar
//! - [`clarion::parse_declarations`] — declarations-only grammar
//! - [`clarion::tokenize`] — the token stream alone
//!
//! Both parse entry points are total: any input, however malformed,
//! produces a tree and an ordered diagnostics list. Malformed regions
//! become placeholder or opaque nodes; a missing END is repaired with a
//! synthetic end-marker and reported.

#![allow(rustdoc::invalid_html_tags)]

pub mod clarion;

pub use clarion::{parse_declarations, parse_program, tokenize, ParseOutput};
