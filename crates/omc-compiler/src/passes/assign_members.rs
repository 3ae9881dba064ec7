//! Pass 4, `eAssignMembers`: snapshots direct typed pointers from
//! the name references captured during lowering/parsing - here, resolving
//! each table/entity-set dimension's and filter's raw name against the
//! attribute (or, for derived tables, enumeration) it actually names
//! (§3 invariant: "Dimension -> (Attribute XOR Enumeration)").

use omc_core::{Diagnostics, Interner, Name};

use crate::symtab::table::DimensionSymbol;
use crate::symtab::{Symbol, SymbolTable};

pub fn run(symtab: &mut SymbolTable, interner: &mut Interner, diags: &mut Diagnostics) {
    let table_names: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::Table(_)).then_some(n))
        .collect();
    for name in table_names {
        assign_table_members(symtab, interner, name, diags);
    }

    let set_names: Vec<Name> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::EntitySet(_)).then_some(n))
        .collect();
    for name in set_names {
        assign_entity_set_members(symtab, interner, name, diags);
    }
}

fn assign_table_members(symtab: &mut SymbolTable, interner: &mut Interner, table: Name, diags: &mut Diagnostics) {
    let (mut dims, filter_raw, mut entity, loc) = match symtab.get(table) {
        Some(Symbol::Table(t)) => (t.dimensions.clone(), t.filter_raw.clone(), t.entity, t.meta.loc.clone()),
        _ => return,
    };

    if entity.is_none()
        && let Some(raw) = &filter_raw
        && let Some(attr) = find_attribute_anywhere(symtab, interner, raw)
    {
        entity = attribute_entity(symtab, attr);
    }

    for dim in &mut dims {
        resolve_dimension(symtab, interner, entity, dim);
        if dim.attribute.is_none() && dim.enumeration.is_none() {
            diags.warning(loc.clone(), format!("dimension '{}' is neither a known attribute nor an enumeration", dim.raw_name));
        }
        if entity.is_none()
            && let Some(attr) = dim.attribute
        {
            entity = attribute_entity(symtab, attr);
        }
    }

    let filter = filter_raw.as_ref().and_then(|raw| {
        entity
            .and_then(|e| find_attribute_in_entity(symtab, interner, e, raw))
            .or_else(|| find_attribute_anywhere(symtab, interner, raw))
    });

    if let Some(Symbol::Table(t)) = symtab.get_mut(table) {
        t.dimensions = dims;
        t.filter = filter;
        t.entity = entity;
    }
}

fn assign_entity_set_members(symtab: &mut SymbolTable, interner: &mut Interner, set: Name, diags: &mut Diagnostics) {
    let (mut dims, filter_raw, entity, loc) = match symtab.get(set) {
        Some(Symbol::EntitySet(s)) => (s.dimensions.clone(), s.filter_raw.clone(), s.entity, s.meta.loc.clone()),
        _ => return,
    };

    for dim in &mut dims {
        resolve_dimension(symtab, interner, Some(entity), dim);
        if dim.attribute.is_none() && dim.enumeration.is_none() {
            diags.warning(loc.clone(), format!("dimension '{}' is neither a known attribute nor an enumeration", dim.raw_name));
        }
    }

    let filter = filter_raw.as_ref().and_then(|raw| find_attribute_in_entity(symtab, interner, entity, raw));

    if let Some(Symbol::EntitySet(s)) = symtab.get_mut(set) {
        s.dimensions = dims;
        s.filter = filter;
    }
}

fn resolve_dimension(symtab: &mut SymbolTable, interner: &mut Interner, entity: Option<Name>, dim: &mut DimensionSymbol) {
    let attribute = entity
        .and_then(|e| find_attribute_in_entity(symtab, interner, e, &dim.raw_name))
        .or_else(|| find_attribute_anywhere(symtab, interner, &dim.raw_name));

    if let Some(attr) = attribute {
        dim.attribute = Some(attr);
        if let Some(Symbol::Attribute(a)) = symtab.get(attr) {
            dim.enumeration = a.type_.implied_enumeration();
        }
    } else {
        let direct = interner.intern(&dim.raw_name);
        if matches!(symtab.get(direct), Some(Symbol::Classification(_)) | Some(Symbol::Range(_)) | Some(Symbol::Partition(_))) {
            dim.enumeration = Some(direct);
        }
    }

    dim.size = dim.enumeration.map(|e| enum_size(symtab, e)).unwrap_or(0);
    if dim.db_name.is_empty() {
        dim.db_name = omc_core::ident::sanitize(&dim.raw_name);
    }
}

fn enum_size(symtab: &SymbolTable, name: Name) -> u32 {
    match symtab.get(name) {
        Some(Symbol::Classification(c)) => c.enumerators.len() as u32,
        Some(Symbol::Range(r)) => r.size(),
        Some(Symbol::Partition(p)) => p.size(),
        _ => 0,
    }
}

fn attribute_entity(symtab: &SymbolTable, attr: Name) -> Option<Name> {
    match symtab.get(attr) {
        Some(Symbol::Attribute(a)) => Some(a.entity),
        _ => None,
    }
}

fn find_attribute_in_entity(symtab: &SymbolTable, interner: &Interner, entity: Name, member: &str) -> Option<Name> {
    let Some(Symbol::Entity(e)) = symtab.get(entity) else { return None };
    let suffix = format!("::{member}");
    e.attributes
        .iter()
        .copied()
        .find(|&a| interner.resolve(a).ends_with(&suffix))
}

fn find_attribute_anywhere(symtab: &SymbolTable, interner: &Interner, member: &str) -> Option<Name> {
    let suffix = format!("::{member}");
    symtab
        .iter()
        .find(|(_, s)| matches!(s, Symbol::Attribute(_)) && interner.resolve(s.meta().name).ends_with(&suffix))
        .map(|(n, _)| n)
}
