//! Pass 7, `ePopulateDependencies`: wires the dependency code
//! the C++ emitter later walks out verbatim - event dirty propagation
//! through attribute side-effects, and table recomputation triggers
//! through dimension/filter/measure attribute side-effects and notify
//! functions.

use std::collections::HashMap;

use omc_core::{Interner, Name};

use crate::parse_context::ParseContext;
use crate::symtab::attribute::AttributeKind;
use crate::symtab::{Symbol, SymbolTable};

pub fn run(symtab: &mut SymbolTable, interner: &mut Interner, parse_ctx: &ParseContext) {
    wire_events(symtab, interner, parse_ctx);
    wire_tables(symtab, interner);
}

/// §8 S1: "`alive.side_effects_fn` contains a marker comment `//
/// Recalculate time to event DeathEvent` and an expression
/// `<event>.make_dirty();` guarded by `if (om_active)`."
fn dirty_fragment(event_member: &str) -> String {
    format!(
        "// Recalculate time to event {event_member}\nif (om_active) {{ {event_member}.make_dirty(); }}"
    )
}

fn wire_events(symtab: &mut SymbolTable, interner: &mut Interner, parse_ctx: &ParseContext) {
    let events: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::Event(_)).then_some(n))
        .collect();

    for event in events {
        let (entity, time_fn, implement_fn) = match symtab.get(event) {
            Some(Symbol::Event(e)) => (e.entity, e.time_fn.clone(), e.implement_fn.clone()),
            _ => continue,
        };
        let event_member = member_name(interner, event);
        let identifiers = parse_ctx.body_identifiers(&time_fn).to_vec();
        let pointers = parse_ctx.body_pointers(&time_fn).to_vec();

        if let Some(Symbol::Event(e)) = symtab.get_mut(event) {
            e.body_identifiers = identifiers.clone();
            e.body_pointers = pointers.clone();
        }

        for ident in &identifiers {
            if let Some(attr) = find_attribute_in_entity(symtab, interner, entity, ident)
                && let Some(Symbol::Attribute(a)) = symtab.get_mut(attr)
            {
                a.push_side_effect(dirty_fragment(&event_member));
            }
        }

        for (link_name, field) in &pointers {
            let Some(link_attr) = find_attribute_in_entity(symtab, interner, entity, link_name) else { continue };
            let Some(Symbol::Attribute(link)) = symtab.get(link_attr) else { continue };
            let target = match &link.kind {
                AttributeKind::Link { target_entity } => Some((*target_entity, false)),
                AttributeKind::Multilink { target_entity } => Some((*target_entity, true)),
                _ => None,
            };
            let Some((target_entity, is_multi)) = target else { continue };
            let Some(field_attr) = find_attribute_in_entity(symtab, interner, target_entity, field) else { continue };
            let fragment = if is_multi {
                dirty_fragment(&format!("/* for each non-null entry */ {event_member}"))
            } else {
                dirty_fragment(&event_member)
            };
            if let Some(Symbol::Attribute(a)) = symtab.get_mut(field_attr) {
                a.push_side_effect(fragment);
            }
        }
        let _ = implement_fn;
    }
}

fn wire_tables(symtab: &mut SymbolTable, interner: &mut Interner) {
    let tables: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::Table(_)).then_some(n))
        .collect();

    for table in tables {
        let (dims, measures_attrs, filter, table_member) = match symtab.get(table) {
            Some(Symbol::Table(t)) => (
                t.dimensions.iter().filter_map(|d| d.attribute).collect::<Vec<_>>(),
                t.accumulators.iter().map(|a| a.attribute).collect::<Vec<_>>(),
                t.filter,
                member_name(interner, table),
            ),
            _ => continue,
        };

        for dim_attr in &dims {
            if let Some(Symbol::Attribute(a)) = symtab.get_mut(*dim_attr) {
                a.push_side_effect(format!(
                    "increment.set_cell({table_member}.current_cell()); increment.start_pending();"
                ));
            }
        }
        if let Some(filter_attr) = filter
            && let Some(Symbol::Attribute(a)) = symtab.get_mut(filter_attr)
        {
            a.push_side_effect("increment.set_filter(new_value); increment.start_pending();".to_string());
        }

        let mut notified: Vec<Name> = dims.clone();
        notified.extend(measures_attrs.clone());
        if let Some(f) = filter {
            notified.push(f);
        }
        for attr in notified {
            if let Some(Symbol::Attribute(a)) = symtab.get_mut(attr) {
                let fragment = format!("increment.finish_pending(); // {table_member}");
                if !a.notify_fn.contains(&fragment) {
                    a.push_notify(fragment);
                }
            }
        }

        dedup_observation_collections(symtab, table);
    }
}

/// §3, §8 invariant 6: accumulators sharing `(increment_kind, timing,
/// attribute)` within the same table share one observation collection;
/// exactly one of them actually updates it.
fn dedup_observation_collections(symtab: &mut SymbolTable, table: Name) {
    let Some(Symbol::Table(t)) = symtab.get_mut(table) else { return };
    let mut next_index = 0u32;
    let mut seen: HashMap<(String, String, Name), u32> = HashMap::new();

    for acc in &mut t.accumulators {
        if !acc.requires_observation_collection() {
            continue;
        }
        let key = (acc.increment_kind.clone(), acc.timing.clone(), acc.attribute);
        match seen.get(&key) {
            Some(&index) => {
                acc.obs_collection_index = Some(index);
                acc.updates_obs_collection = false;
            }
            None => {
                seen.insert(key, next_index);
                acc.obs_collection_index = Some(next_index);
                acc.updates_obs_collection = true;
                next_index += 1;
            }
        }
    }
}

fn member_name(interner: &Interner, name: Name) -> String {
    let full = interner.resolve(name);
    full.rsplit("::").next().unwrap_or(full).to_string()
}

fn find_attribute_in_entity(symtab: &SymbolTable, interner: &Interner, entity: Name, member: &str) -> Option<Name> {
    let Some(Symbol::Entity(e)) = symtab.get(entity) else { return None };
    let suffix = format!("::{member}");
    e.attributes
        .iter()
        .copied()
        .find(|&a| interner.resolve(a).ends_with(&suffix))
}
