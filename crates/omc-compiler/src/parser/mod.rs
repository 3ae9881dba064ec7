//! Grammar driver: turns a token stream into the declaration AST in
//! [`ast`]. The parser is tolerant of forward references - creating symbols
//! from a declaration that refers to a not-yet-declared entity or
//! enumeration is the symbol table's job (`symtab::lower`), not the
//! parser's; this module only has to recognize *syntax*.
//!
//! There is no lossless CST: IDE integration is an explicit non-goal,
//! so the parser discards whitespace/comment tokens (already captured
//! separately by the lexer's [`crate::lexer::CommentTable`]) rather than
//! threading them through a rowan green tree. `rowan::TextRange` is still
//! used for token spans, shared with the lexer.

pub mod ast;
pub mod body_scan;
mod cursor;
pub mod grammar;

#[cfg(test)]
#[path = "grammar_tests.rs"]
mod grammar_tests;

pub use ast::*;
pub use body_scan::{ScannedFunction, ScannedRngCall, scan_function_bodies};
pub use grammar::parse_source;
