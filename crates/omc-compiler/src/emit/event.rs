//! Event emission: the `Event<...>`/`MemoryEvent<...>` instance
//! declaration for each event, and the event-trace cover wrapper bodies
//! when `event_trace` is enabled.

use omc_core::{Interner, Name};

use crate::symtab::{Symbol, SymbolTable};

use super::entity::member_name;

/// Declares the entity's `Event<...>` (or `MemoryEvent<...>` when the
/// event carries an int payload) data member, wiring the time/implement
/// function pointers and priority.
pub fn emit_event_instance(symtab: &SymbolTable, interner: &Interner, event: Name, event_trace: bool) -> String {
    let Some(Symbol::Event(e)) = symtab.get(event) else { return String::new() };
    let member = member_name(interner, event);
    let entity_name = match symtab.get(e.entity) {
        Some(s) => interner.resolve(s.meta().name).to_string(),
        None => String::new(),
    };

    let (time_fn, implement_fn) = if event_trace {
        e.trace_cover
            .clone()
            .unwrap_or_else(|| (e.time_fn.clone(), e.implement_fn.clone()))
    } else {
        (e.time_fn.clone(), e.implement_fn.clone())
    };

    let template = if e.memory { "MemoryEvent" } else { "Event" };
    format!(
        "{template}<{entity_name}, event_id_{member}, {priority}, &{entity_name}::{implement_fn}, &{entity_name}::{time_fn}> {member};",
        priority = e.priority,
    )
}

/// Event-trace wrapper functions: forward to the developer-supplied
/// time/implement functions, emitting a structured trace message first.
/// Message fields: entity kind, entity id, age, case seed, event name,
/// event id, time, and a typed message tag.
pub fn emit_trace_cover(symtab: &SymbolTable, interner: &Interner, event: Name) -> Option<String> {
    let Some(Symbol::Event(e)) = symtab.get(event) else { return None };
    let (trace_time, trace_implement) = e.trace_cover.clone()?;
    let member = member_name(interner, event);
    let entity_name = match symtab.get(e.entity) {
        Some(s) => interner.resolve(s.meta().name).to_string(),
        None => String::new(),
    };

    let mut out = String::new();
    out.push_str(&format!("Time {entity_name}::{trace_time}()\n{{\n"));
    out.push_str(&format!(
        "    Time t = {}();\n",
        e.time_fn
    ));
    out.push_str(&format!(
        "    if (BaseEvent::trace_event_on) theLog->logFormatted(\"event: {member} entity: {entity_name} entity_id: %lld age: %g case_seed: %lld time: %g\", (long long) entity_id.get(), (double) age.get(), (long long) case_seed.get(), (double) t);\n"
    ));
    out.push_str("    return t;\n}\n\n");

    out.push_str(&format!("void {entity_name}::{trace_implement}()\n{{\n"));
    out.push_str(&format!(
        "    if (BaseEvent::trace_event_on) theLog->logFormatted(\"implement: {member} entity: {entity_name} entity_id: %lld\", (long long) entity_id.get());\n"
    ));
    out.push_str(&format!("    {}();\n}}\n", e.implement_fn));
    Some(out)
}
