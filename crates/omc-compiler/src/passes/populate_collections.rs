//! Pass 6, `ePopulateCollections`: pushes each symbol into its
//! owners' ordered collections. Attributes/events/entity-sets are already
//! appended to their owning `EntitySymbol` at lowering time (the owner is
//! known immediately); what's left once pass 4 has resolved a table's
//! `entity` is registering the table on that entity, and collecting
//! multilink attributes as reciprocal-link targets.

use omc_core::{Interner, Name};

use crate::symtab::attribute::AttributeKind;
use crate::symtab::{Symbol, SymbolTable};

pub fn run(symtab: &mut SymbolTable, interner: &mut Interner) {
    let table_entities: Vec<(Name, Name)> = symtab
        .iter()
        .filter_map(|(n, s)| match s {
            Symbol::Table(t) => t.entity.map(|e| (n, e)),
            _ => None,
        })
        .collect();

    for (table, entity) in table_entities {
        if let Some(Symbol::Entity(e)) = symtab.get_mut(entity)
            && !e.tables.contains(&table)
        {
            e.tables.push(table);
        }
    }

    let multilinks: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| match s {
            Symbol::Attribute(a) if matches!(a.kind, AttributeKind::Multilink { .. }) => Some(n),
            _ => None,
        })
        .collect();

    for attr in multilinks {
        let Some(Symbol::Attribute(a)) = symtab.get(attr) else { continue };
        let entity = a.entity;
        if let Some(Symbol::Entity(e)) = symtab.get_mut(entity)
            && !e.multilinks.contains(&attr)
        {
            e.multilinks.push(attr);
        }
    }
    let _ = interner;
}
