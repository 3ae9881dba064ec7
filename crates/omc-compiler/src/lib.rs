//! omc-compiler: front end and middle end of the openM++ model compiler.
//!
//! Pipeline: [`source`] reads and decodes model-source files, [`lexer`]
//! tokenizes them and extracts the comment side-channel, [`parser`] turns
//! the token stream into a declaration [`parser::ast`], [`symtab`] lowers
//! those declarations into a resolved symbol table across the multi-pass
//! pipeline in [`passes`], and [`emit`] and [`i18n`] turn the resolved
//! model into generated C++ and metadata/message-INI outputs.

pub mod emit;
pub mod i18n;
pub mod lexer;
pub mod parse_context;
pub mod parser;
pub mod passes;
pub mod source;
pub mod symtab;

pub use parse_context::ParseContext;
pub use source::SourceFile;
