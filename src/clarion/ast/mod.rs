//! AST types and traversal
//!
//! The tree handed to callers: node families under [`elements`], the
//! position model under [`range`], diagnostics under [`diagnostics`], and
//! the tooling-facing traversal contract under [`traits`].
//!
//! The whole tree is created during one parse call, is read-only
//! afterwards, and is owned exclusively by the caller — no global registry,
//! no shared parse state between invocations.

pub mod diagnostics;
pub mod elements;
pub mod range;
pub mod traits;

pub use diagnostics::{codes, Diagnostic, DiagnosticSeverity};
pub use elements::*;
pub use range::{Position, Range, SourceLocation};
pub use traits::{find_nodes_at_position, AstNode, Visitor};
