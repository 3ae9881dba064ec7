//! C++ emission and the post-emission markup pass.

use omc_core::{Interner, Name};

use crate::symtab::{Symbol, SymbolTable};

pub mod entity;
pub mod event;
pub mod layout;
pub mod markup;

/// Options the emitter itself consults (distinct from `passes::ModelOptions`,
/// which drives symbol synthesis rather than code shape).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
    pub event_trace: bool,
    pub index_errors: bool,
}

/// One generated C++ source per entity, keyed by entity name.
#[derive(Debug, Clone)]
pub struct EmittedEntity {
    pub entity_name: String,
    pub source: String,
}

/// Emits every entity class in the model, in symbol-table order.
pub fn emit_entities(symtab: &SymbolTable, interner: &Interner, options: &EmitOptions) -> Vec<EmittedEntity> {
    let entities: Vec<Name> = symtab
        .names_by_kind_then_name()
        .into_iter()
        .filter(|&n| matches!(symtab.get(n), Some(Symbol::Entity(_))))
        .collect();

    entities
        .into_iter()
        .map(|e| EmittedEntity {
            entity_name: interner.resolve(e).to_string(),
            source: entity::emit_entity(symtab, interner, e, options.event_trace),
        })
        .collect()
}

/// Collects the event-trace cover function bodies for every event with a
/// synthesized cover, to be written alongside the entity classes.
pub fn emit_trace_covers(symtab: &SymbolTable, interner: &Interner) -> String {
    let events: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::Event(_)).then_some(n))
        .collect();

    let mut out = String::new();
    for ev in events {
        if let Some(body) = event::emit_trace_cover(symtab, interner, ev) {
            out.push_str(&body);
        }
    }
    out
}
