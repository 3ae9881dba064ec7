//! `EntityEventSymbol`: a (time function, implement function) pair with a
//! priority, optional int "memory" payload, and optional event-trace cover
//! functions synthesized by `eCreateMissingSymbols` when `event_trace` is
//! on.

use omc_core::Name;

use super::SymbolMeta;

#[derive(Debug, Clone)]
pub struct EventSymbol {
    pub meta: SymbolMeta,
    pub entity: Name,
    pub time_fn: String,
    pub implement_fn: String,
    pub priority: i64,
    /// `true` if the event carries an int payload and is emitted as a
    /// `MemoryEvent<...>` instead of a plain `Event<...>`.
    pub memory: bool,
    /// Identifiers the time function body references, gathered by the
    /// parse context and used by `populate_dependencies` to
    /// wire attribute side-effects.
    pub body_identifiers: Vec<String>,
    /// `link->field` pointer accesses the time function body makes.
    pub body_pointers: Vec<(String, String)>,
    /// Cover function names synthesized when `event_trace` is enabled
    ///.
    pub trace_cover: Option<(String, String)>,
    /// `true` for the single synthesized self-scheduling event per entity
    ///; such events are not declared by
    /// the model author.
    pub is_self_scheduling: bool,
}

impl EventSymbol {
    pub fn new(meta: SymbolMeta, entity: Name, time_fn: String, implement_fn: String, priority: i64, memory: bool) -> Self {
        Self {
            meta,
            entity,
            time_fn,
            implement_fn,
            priority,
            memory,
            body_identifiers: Vec::new(),
            body_pointers: Vec::new(),
            trace_cover: None,
            is_self_scheduling: false,
        }
    }
}
