//! Multi-pass post-parse resolution: a single ordered pipeline run
//! after every file has been lowered into the symbol table. Each phase is
//! a free function over `&mut SymbolTable` (plus whatever side inputs that
//! phase needs) rather than a method every symbol variant implements,
//! since Rust has no open-ended dynamic dispatch over an enum the way the
//! original's per-subclass `post_parse(phase)` virtual does - a `match` in
//! each phase function plays the same role.

use omc_core::{Diagnostics, LanguageList, ModelType};
use tracing::debug;

use crate::parse_context::ParseContext;

use super::lexer::CommentTable;
use super::symtab::SymbolTable;

mod assign_label;
mod assign_members;
mod create_foreign_types;
mod create_missing_symbols;
mod populate_collections;
mod populate_dependencies;
mod resolve_data_types;
mod self_scheduling;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod mod_tests;

/// Options recognized by `eCreateMissingSymbols`.
#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    pub event_trace: bool,
    pub censor_event_time: bool,
    pub weighted_tabulation: bool,
}

/// Runs every post-parse pass in the fixed order specified by §4.4,
/// against an already-lowered symbol table. Returns once pass 7
/// (`ePopulateDependencies`) completes; callers check
/// `diags.has_errors()` to decide whether to continue to code generation.
pub fn run(
    symtab: &mut SymbolTable,
    interner: &mut omc_core::Interner,
    model_type: ModelType,
    languages: &LanguageList,
    options: &ModelOptions,
    comments: &CommentTable,
    parse_ctx: &ParseContext,
    diags: &mut Diagnostics,
) {
    debug!("post-parse pass 1: eCreateForeignTypes");
    create_foreign_types::run(symtab, interner, diags);

    debug!("post-parse pass 2: eCreateMissingSymbols");
    create_missing_symbols::run(symtab, interner, model_type, options);

    debug!("post-parse pass 3: eAssignLabel");
    assign_label::run(symtab, interner, comments, languages);

    debug!("post-parse pass 4: eAssignMembers");
    assign_members::run(symtab, interner, diags);

    debug!("post-parse pass 5: eResolveDataTypes (bounded fixpoint)");
    resolve_data_types::run(symtab, interner, diags);

    debug!("post-parse pass 6: ePopulateCollections");
    populate_collections::run(symtab, interner);

    debug!("post-parse pass 7: ePopulateDependencies");
    self_scheduling::synthesize(symtab, interner);
    populate_dependencies::run(symtab, interner, parse_ctx);
}
