//! Per-entity class emission: data members grouped by layout group,
//! lifecycle functions walking the entity's collections, and the event
//! table built from its owned events.

use omc_core::{Interner, Name};

use crate::symtab::attribute::{AttributeKind, BuiltinKind};
use crate::symtab::{Symbol, SymbolTable};

use super::event::emit_event_instance;
use super::layout::CppWriter;

/// Data members are grouped so a debugger shows model-relevant state
/// first: id/time/age, then model-declared, then generated
/// (maintained), then internal (links/multilinks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LayoutGroup {
    Identity,
    TimeAndAge,
    Declared,
    Generated,
    Internal,
}

fn layout_group(kind: &AttributeKind) -> LayoutGroup {
    match kind {
        AttributeKind::Builtin(BuiltinKind::EntityId)
        | AttributeKind::Builtin(BuiltinKind::CaseId)
        | AttributeKind::Builtin(BuiltinKind::CaseSeed) => LayoutGroup::Identity,
        AttributeKind::Builtin(BuiltinKind::Time) | AttributeKind::Builtin(BuiltinKind::Age) => {
            LayoutGroup::TimeAndAge
        }
        AttributeKind::Builtin(_) | AttributeKind::Simple { .. } => LayoutGroup::Declared,
        AttributeKind::Identity { .. } | AttributeKind::Derived { .. } => LayoutGroup::Generated,
        AttributeKind::Link { .. } | AttributeKind::Multilink { .. } => LayoutGroup::Internal,
    }
}

pub fn emit_entity(symtab: &SymbolTable, interner: &Interner, entity: Name, event_trace: bool) -> String {
    let Some(Symbol::Entity(e)) = symtab.get(entity) else { return String::new() };
    let entity_name = interner.resolve(entity).to_string();

    let mut w = CppWriter::new();
    w.line(format!("class {entity_name} : public Entity<{entity_name}>"));
    w.line("{");
    w.indent();
    w.line("public:");
    w.indent();

    emit_data_members(&mut w, symtab, interner, &e.attributes);
    w.blank();
    emit_initialize_data_members(&mut w, symtab, interner, &e.attributes);
    emit_time_and_age(&mut w, interner);
    emit_check_starting_time(&mut w, interner);
    emit_events_lifecycle(&mut w, symtab, interner, &e.events, event_trace);
    emit_entity_sets_lifecycle(&mut w, symtab, interner, &e.entity_sets);
    emit_tables_lifecycle(&mut w, symtab, interner, &e.tables);
    emit_links_lifecycle(&mut w, symtab, interner, &e.attributes);
    emit_start_trace(&mut w, interner, &entity_name);

    w.dedent();
    w.dedent();
    w.line("};");
    w.finish()
}

fn emit_data_members(w: &mut CppWriter, symtab: &SymbolTable, interner: &Interner, attributes: &[Name]) {
    let mut grouped: Vec<(LayoutGroup, Name)> = attributes
        .iter()
        .filter_map(|&a| match symtab.get(a) {
            Some(Symbol::Attribute(attr)) => Some((layout_group(&attr.kind), a)),
            _ => None,
        })
        .collect();
    grouped.sort_by_key(|(g, _)| *g);

    for (_, attr) in grouped {
        let Some(Symbol::Attribute(a)) = symtab.get(attr) else { continue };
        let member = member_name(interner, attr);
        w.line(format!("{} {};", a.type_name, member));
    }
}

fn emit_initialize_data_members(w: &mut CppWriter, symtab: &SymbolTable, interner: &Interner, attributes: &[Name]) {
    w.line("void initialize_data_members()");
    w.line("{");
    w.indent();
    for &attr in attributes {
        let Some(Symbol::Attribute(a)) = symtab.get(attr) else { continue };
        let member = member_name(interner, attr);
        match &a.kind {
            AttributeKind::Simple { initializer: Some(init) } => {
                w.line(format!("{member}.initialize({init});"));
            }
            AttributeKind::Simple { initializer: None } => {
                w.line(format!("{member}.initialize();"));
            }
            _ => {}
        }
    }
    w.dedent();
    w.line("}");
}

fn emit_time_and_age(w: &mut CppWriter, _interner: &Interner) {
    w.line("void om_initialize_time_and_age()");
    w.line("{");
    w.indent();
    w.line("time.initialize(time_infinite);");
    w.line("age.initialize(0.0);");
    w.dedent();
    w.line("}");
}

fn emit_check_starting_time(w: &mut CppWriter, _interner: &Interner) {
    w.line("void om_check_starting_time(Time t)");
    w.line("{");
    w.indent();
    w.line("if (t < time.get()) {");
    w.indent();
    w.line("throw SimulationException(entity_id, \"om_check_starting_time\", get_combined_seed(), t);");
    w.dedent();
    w.line("}");
    w.dedent();
    w.line("}");
}

fn emit_events_lifecycle(w: &mut CppWriter, symtab: &SymbolTable, interner: &Interner, events: &[Name], event_trace: bool) {
    w.line("void om_initialize_events()");
    w.line("{");
    w.indent();
    for &ev in events {
        let member = member_name(interner, ev);
        w.line(format!("{member}.initialize_events();"));
    }
    w.dedent();
    w.line("}");

    w.line("void om_finalize_events()");
    w.line("{");
    w.indent();
    for &ev in events {
        let member = member_name(interner, ev);
        w.line(format!("{member}.finalize_events();"));
    }
    w.dedent();
    w.line("}");

    for &ev in events {
        w.blank();
        w.line(emit_event_instance(symtab, interner, ev, event_trace));
    }
}

fn emit_entity_sets_lifecycle(w: &mut CppWriter, _symtab: &SymbolTable, interner: &Interner, sets: &[Name]) {
    w.line("void om_initialize_entity_sets()");
    w.line("{");
    w.indent();
    for &set in sets {
        let member = member_name(interner, set);
        w.line(format!("theEntitySets.{member}.insert(this);"));
    }
    w.dedent();
    w.line("}");

    w.line("void om_finalize_entity_sets()");
    w.line("{");
    w.indent();
    for &set in sets {
        let member = member_name(interner, set);
        w.line(format!("theEntitySets.{member}.erase(this);"));
    }
    w.dedent();
    w.line("}");
}

fn emit_tables_lifecycle(w: &mut CppWriter, _symtab: &SymbolTable, interner: &Interner, tables: &[Name]) {
    w.line("void om_initialize_tables()");
    w.line("{");
    w.indent();
    for &table in tables {
        let member = member_name(interner, table);
        w.line(format!("increment_{member}.initialize_entry(this);"));
    }
    w.dedent();
    w.line("}");

    w.line("void om_finalize_tables()");
    w.line("{");
    w.indent();
    for &table in tables {
        let member = member_name(interner, table);
        w.line(format!("increment_{member}.finalize_entry(this);"));
    }
    w.dedent();
    w.line("}");
}

fn emit_links_lifecycle(w: &mut CppWriter, symtab: &SymbolTable, interner: &Interner, attributes: &[Name]) {
    w.line("void om_finalize_links()");
    w.line("{");
    w.indent();
    for &attr in attributes {
        let Some(Symbol::Attribute(a)) = symtab.get(attr) else { continue };
        if matches!(a.kind, AttributeKind::Link { .. }) {
            let member = member_name(interner, attr);
            w.line(format!("{member}.set(nullptr);"));
        }
    }
    w.dedent();
    w.line("}");

    w.line("void om_finalize_multilinks()");
    w.line("{");
    w.indent();
    for &attr in attributes {
        let Some(Symbol::Attribute(a)) = symtab.get(attr) else { continue };
        if matches!(a.kind, AttributeKind::Multilink { .. }) {
            let member = member_name(interner, attr);
            w.line(format!("{member}.clear();"));
        }
    }
    w.dedent();
    w.line("}");
}

fn emit_start_trace(w: &mut CppWriter, _interner: &Interner, entity_name: &str) {
    w.line("void om_start_trace()");
    w.line("{");
    w.indent();
    w.line(format!(
        "if (BaseEvent::trace_event_on) theLog->logFormatted(\"Entity: {entity_name} entity_id: %lld\", (long long) entity_id.get());"
    ));
    w.dedent();
    w.line("}");
}

pub(super) fn member_name(interner: &Interner, name: Name) -> String {
    let full = interner.resolve(name);
    full.rsplit("::").next().unwrap_or(full).to_string()
}
