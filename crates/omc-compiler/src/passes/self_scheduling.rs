//! §4.5 "Self-scheduling synthesis": an entity that owns one or more
//! self-scheduling derived attributes gets one synthesized event whose
//! time function returns the minimum of each attribute's next scheduled
//! time and whose implement function updates whichever attributes are
//! due. The model author never declares this event directly.

use omc_core::{Name, SourceLoc};

use crate::symtab::attribute::AttributeKind;
use crate::symtab::{EventSymbol, Symbol, SymbolMeta, SymbolTable};

/// Fixed priority for the synthesized event.
const SELF_SCHEDULING_PRIORITY: i64 = -1;

const SELF_SCHEDULING_KINDS: &[&str] = &["self_scheduling_int", "self_scheduling_split"];

pub fn is_self_scheduling_kind(derived_kind: &str) -> bool {
    SELF_SCHEDULING_KINDS.contains(&derived_kind)
}

pub fn synthesize(symtab: &mut SymbolTable, interner: &mut omc_core::Interner) {
    let entities: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::Entity(_)).then_some(n))
        .collect();

    for entity in entities {
        let ss_attrs = self_scheduling_attributes(symtab, entity);
        if ss_attrs.is_empty() {
            continue;
        }

        let entity_name = symtab
            .get(entity)
            .map(|s| interner.resolve(s.meta().name).to_string())
            .unwrap_or_default();
        let unique_name = format!("{entity_name}::om_ss_event");
        let name = interner.intern(&unique_name);
        if symtab.contains(name) {
            continue;
        }

        let mut event = EventSymbol::new(
            SymbolMeta::new(name, SourceLoc::unknown()),
            entity,
            "om_ss_time".to_string(),
            "om_ss_implement".to_string(),
            SELF_SCHEDULING_PRIORITY,
            false,
        );
        event.is_self_scheduling = true;
        event.body_identifiers = ss_attrs
            .iter()
            .map(|&a| interner.resolve(a).to_string())
            .collect();
        symtab.morph(name, Symbol::Event(event));

        if let Some(Symbol::Entity(e)) = symtab.get_mut(entity)
            && !e.events.contains(&name)
        {
            e.events.push(name);
        }
    }
}

fn self_scheduling_attributes(symtab: &SymbolTable, entity: Name) -> Vec<Name> {
    let Some(Symbol::Entity(e)) = symtab.get(entity) else { return Vec::new() };
    e.attributes
        .iter()
        .copied()
        .filter(|&a| match symtab.get(a) {
            Some(Symbol::Attribute(attr)) => matches!(
                &attr.kind,
                AttributeKind::Derived { derived_kind, .. } if is_self_scheduling_kind(derived_kind)
            ),
            _ => false,
        })
        .collect()
}
