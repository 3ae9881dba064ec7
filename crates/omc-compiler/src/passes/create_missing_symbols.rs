//! Pass 2, `eCreateMissingSymbols`: synthesizes symbols whose
//! existence depends on model options rather than explicit declarations -
//! `case_id` for case-based models, `censor_time` when event-time
//! censoring is on, `entity_weight` when weighted tabulation is on, and
//! event-trace cover functions when event tracing is on.

use omc_core::{Interner, ModelType, Name, SourceLoc, TypeSymbol};

use crate::symtab::attribute::{AttributeKind, BuiltinKind};
use crate::symtab::{AttributeSymbol, Symbol, SymbolMeta, SymbolTable};

use super::ModelOptions;

pub fn run(symtab: &mut SymbolTable, interner: &mut Interner, model_type: ModelType, options: &ModelOptions) {
    let entities: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::Entity(_)).then_some(n))
        .collect();

    for entity in entities {
        add_builtin(symtab, interner, entity, BuiltinKind::Time, TypeSymbol::Time);
        add_builtin(symtab, interner, entity, BuiltinKind::Age, TypeSymbol::Numeric(omc_core::NumericKind::Double));
        add_builtin(symtab, interner, entity, BuiltinKind::Events, TypeSymbol::Numeric(omc_core::NumericKind::Int));
        add_builtin(symtab, interner, entity, BuiltinKind::EntityId, TypeSymbol::Numeric(omc_core::NumericKind::Int));

        if model_type.is_case_based() {
            add_builtin(symtab, interner, entity, BuiltinKind::CaseId, TypeSymbol::Numeric(omc_core::NumericKind::LLong));
            add_builtin(symtab, interner, entity, BuiltinKind::CaseSeed, TypeSymbol::Numeric(omc_core::NumericKind::Int));
        }
        if options.censor_event_time {
            add_builtin(symtab, interner, entity, BuiltinKind::CensorTime, TypeSymbol::Time);
        }
        if options.weighted_tabulation {
            add_builtin(symtab, interner, entity, BuiltinKind::EntityWeight, TypeSymbol::Numeric(omc_core::NumericKind::Double));
        }
    }

    if options.event_trace {
        add_trace_covers(symtab, interner);
    }
}

fn add_builtin(symtab: &mut SymbolTable, interner: &mut Interner, entity: Name, kind: BuiltinKind, type_: TypeSymbol) {
    let entity_name = symtab
        .get(entity)
        .map(|s| interner.resolve(s.meta().name).to_string())
        .unwrap_or_default();
    let unique_name = format!("{entity_name}::{}", kind.member_name());
    let name = interner.intern(&unique_name);
    if symtab.contains(name) {
        return;
    }

    let mut attr = AttributeSymbol::new(
        SymbolMeta::new(name, SourceLoc::unknown()),
        entity,
        "builtin".to_string(),
        AttributeKind::Builtin(kind),
    );
    attr.type_ = type_;
    symtab.morph(name, Symbol::Attribute(attr));

    if let Some(Symbol::Entity(e)) = symtab.get_mut(entity) {
        e.attributes.push(name);
    }
}

/// For every event, synthesizes `om_trace_time_<Event>`/
/// `om_trace_implement_<Event>` cover function names: the
/// emitter wraps the developer-supplied time/implement functions with
/// these when `event_trace` is on.
fn add_trace_covers(symtab: &mut SymbolTable, interner: &mut Interner) {
    let events: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::Event(_)).then_some(n))
        .collect();

    for event in events {
        let Some(Symbol::Event(e)) = symtab.get(event) else { continue };
        let cover = (
            format!("om_trace_time_{}", e.time_fn),
            format!("om_trace_implement_{}", e.implement_fn),
        );
        if let Some(Symbol::Event(e)) = symtab.get_mut(event) {
            e.trace_cover = Some(cover);
        }
        let _ = interner;
    }
}
