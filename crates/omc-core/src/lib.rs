//! Shared infrastructure for the omc model compiler.
//!
//! This crate has no dependency on the parser or emitters; it provides the
//! vocabulary every other crate in the workspace builds on:
//! - `source` - file/line source locations attached to every symbol and diagnostic
//! - `diag` - diagnostic collection and severities, matching the error taxonomy
//! - `interner` - string interning for unique symbol names
//! - `types` - the type lattice (numeric/bool/string/time/range/partition/...)
//! - `model` - model-wide settings (model type, language list)
//! - `ident` - DB-legal short name sanitization shared by the SQL emitter and the markup pass

pub mod diag;
pub mod ident;
pub mod interner;
pub mod model;
pub mod types;

pub use diag::{BuildError, Diagnostic, Diagnostics, Severity, SourceLoc};
pub use interner::{Interner, Name};
pub use model::{Language, LanguageList, ModelType};
pub use types::TypeSymbol;
