//! omc-sql: metadata representation, digest/naming, aggregation-expression
//! rewriting, and SQL/SQLite emission for the omc model compiler.
//!
//! This crate has no dependency on `omc-compiler` by design: it consumes a
//! small, self-contained metadata model ([`meta`]) that the CLI driver
//! builds from a resolved `omc_compiler::symtab::SymbolTable`.

pub mod aggregation;
pub mod dialect;
pub mod digest;
pub mod meta;
pub mod metadata;
pub mod schema;
pub mod sqlite;
pub mod views;
pub mod workset;

pub use dialect::Provider;
pub use meta::ModelMeta;
