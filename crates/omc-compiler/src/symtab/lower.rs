//! Lowers the declaration [`crate::parser::ast::Decl`] list produced by
//! parsing every model-source file into the symbol table.
//!
//! Lowering runs in two passes over the flattened declaration list so that
//! forward references within the same build resolve without needing a
//! placeholder: pass one creates every named type-bearing construct
//! (classification/range/partition/entity) so later lookups by name
//! succeed; pass two lowers everything else (attributes, events, tables,
//! entity sets, parameters), morphing a [`super::BaseSymbol`] placeholder
//! into place if an entity/table member is referenced before pass one has
//! seen its owner - which cannot happen for a single well-formed file, but
//! can across multiple source files processed out of declaration order.

use omc_core::{Interner, Name, SourceLoc};

use crate::parser::ast::*;

use super::attribute::{AttributeKind, AttributeSymbol};
use super::entity::EntitySymbol;
use super::entity_set::EntitySetSymbol;
use super::event::EventSymbol;
use super::parameter::ParameterSymbol;
use super::table::{DimensionSymbol, MeasureSymbol, TableKind, TableSymbol};
use super::{ClassificationSymbol, PartitionSymbol, RangeSymbol, Symbol, SymbolMeta, SymbolTable};

#[cfg(test)]
#[path = "lower_tests.rs"]
mod lower_tests;

/// Lowers every file's declarations into `symtab`/`interner`. Call once
/// per build with the full set of parsed files (order does not matter:
/// declarations are partitioned into named-type declarations and member
/// declarations before either is lowered).
pub fn lower(interner: &mut Interner, symtab: &mut SymbolTable, files: &[Vec<Decl>]) {
    let all_decls: Vec<&Decl> = files.iter().flatten().collect();

    for decl in &all_decls {
        lower_named_type(interner, symtab, decl);
    }
    for decl in &all_decls {
        lower_member_decl(interner, symtab, decl);
    }
}

fn morph(symtab: &mut SymbolTable, interner: &mut Interner, unique_name: &str, symbol: Symbol) -> Name {
    let name = interner.intern(unique_name);
    symtab.morph(name, symbol);
    name
}

fn base_loc(symtab: &mut SymbolTable, interner: &mut Interner, unique_name: &str, loc: SourceLoc) -> Name {
    let name = interner.intern(unique_name);
    symtab.get_or_create_base(name, loc);
    name
}

fn lower_named_type(interner: &mut Interner, symtab: &mut SymbolTable, decl: &Decl) {
    match decl {
        Decl::Classification(d) => {
            let meta = SymbolMeta::new(interner.intern(&d.name), d.loc.clone());
            morph(
                symtab,
                interner,
                &d.name,
                Symbol::Classification(ClassificationSymbol {
                    meta,
                    enumerators: d.enumerators.clone(),
                }),
            );
        }
        Decl::Range(d) => {
            let meta = SymbolMeta::new(interner.intern(&d.name), d.loc.clone());
            morph(
                symtab,
                interner,
                &d.name,
                Symbol::Range(RangeSymbol { meta, lower: d.lower, upper: d.upper }),
            );
        }
        Decl::Partition(d) => {
            let meta = SymbolMeta::new(interner.intern(&d.name), d.loc.clone());
            morph(
                symtab,
                interner,
                &d.name,
                Symbol::Partition(PartitionSymbol { meta, split_points: d.split_points.clone() }),
            );
        }
        Decl::Entity(d) => {
            let meta = SymbolMeta::new(interner.intern(&d.name), d.loc.clone());
            morph(symtab, interner, &d.name, Symbol::Entity(EntitySymbol::new(meta)));
        }
        _ => {}
    }
}

fn lower_member_decl(interner: &mut Interner, symtab: &mut SymbolTable, decl: &Decl) {
    match decl {
        Decl::Entity(d) => lower_entity_members(interner, symtab, d),
        Decl::Table(d) => lower_table(interner, symtab, d),
        Decl::EntitySet(d) => lower_entity_set(interner, symtab, d),
        Decl::Parameter(d) => lower_parameter(interner, symtab, d),
        _ => {}
    }
}

fn lower_entity_members(interner: &mut Interner, symtab: &mut SymbolTable, decl: &EntityDecl) {
    let entity = interner.intern(&decl.name);
    for member in &decl.members {
        match member {
            EntityMember::Attribute(a) => lower_attribute(interner, symtab, entity, &decl.name, a),
            EntityMember::Event(e) => lower_event(interner, symtab, entity, &decl.name, e),
            EntityMember::Hook(_) => {
                // Hooks are wired by `passes::populate_dependencies`, which
                // reads `decl` directly rather than needing a symbol.
            }
        }
    }
}

fn lower_attribute(
    interner: &mut Interner,
    symtab: &mut SymbolTable,
    entity: Name,
    entity_name: &str,
    decl: &AttributeDecl,
) {
    let unique_name = format!("{entity_name}::{}", decl.name);
    let meta = SymbolMeta::new(interner.intern(&unique_name), decl.loc.clone());

    let kind = match &decl.kind {
        AttributeDeclKind::Simple => AttributeKind::Simple { initializer: decl.expr.clone() },
        AttributeDeclKind::Identity => AttributeKind::Identity {
            expr: decl.expr.clone().unwrap_or_default(),
        },
        AttributeDeclKind::Derived { derived_kind } => AttributeKind::Derived {
            derived_kind: derived_kind.clone(),
            expr: decl.expr.clone(),
        },
        AttributeDeclKind::Link => {
            let target = base_loc(symtab, interner, &decl.type_name, decl.loc.clone());
            AttributeKind::Link { target_entity: target }
        }
        AttributeDeclKind::Multilink => {
            let target = base_loc(symtab, interner, &decl.type_name, decl.loc.clone());
            AttributeKind::Multilink { target_entity: target }
        }
    };

    let symbol = AttributeSymbol::new(meta, entity, decl.type_name.clone(), kind);
    morph(symtab, interner, &unique_name, Symbol::Attribute(symbol));

    if let Some(Symbol::Entity(e)) = symtab.get_mut(entity) {
        e.attributes.push(interner.intern(&unique_name));
    }
}

fn lower_event(
    interner: &mut Interner,
    symtab: &mut SymbolTable,
    entity: Name,
    entity_name: &str,
    decl: &EventDecl,
) {
    let unique_name = format!("{entity_name}::{}", decl.name);
    let meta = SymbolMeta::new(interner.intern(&unique_name), decl.loc.clone());
    let symbol = EventSymbol::new(
        meta,
        entity,
        decl.time_fn.clone(),
        decl.implement_fn.clone(),
        decl.priority,
        decl.memory,
    );
    morph(symtab, interner, &unique_name, Symbol::Event(symbol));

    if let Some(Symbol::Entity(e)) = symtab.get_mut(entity) {
        e.events.push(interner.intern(&unique_name));
    }
}

fn lower_table(interner: &mut Interner, symtab: &mut SymbolTable, decl: &TableDecl) {
    let kind = if decl.is_derived { TableKind::Derived } else { TableKind::Entity };
    let meta = SymbolMeta::new(interner.intern(&decl.name), decl.loc.clone());
    let mut table = TableSymbol::new(meta, kind);

    for dim in &decl.dimensions {
        table.dimensions.push(DimensionSymbol::new(dim.attribute_or_enum.clone()));
    }
    for m in &decl.measures {
        table.measures.push(MeasureSymbol {
            name: m.name.clone(),
            expr: format!("{}({})", om_aggregate_function(&m.accumulator), m.name),
        });
        table.accumulators.push(super::AccumulatorSymbol {
            name: m.name.clone(),
            accumulator: m.accumulator.clone(),
            increment_kind: m.increment_kind.clone(),
            timing: m.timing.clone(),
            attribute: interner.intern(&m.attribute),
            obs_collection_index: None,
            updates_obs_collection: false,
        });
    }
    table.filter_raw = decl.filter.clone();

    morph(symtab, interner, &decl.name, Symbol::Table(table));
}

/// Maps a table measure's accumulator kind to the `OM_...` aggregate function `omc_sql`'s rewriter
/// understands. A simple measure's published cell value is the
/// cross-replicate rollup of its own per-sub accumulator column; kinds
/// with no direct `OM_...` counterpart (`gini`, percentiles) fall back to
/// `OM_AVG` over that column, matching the "expression tables average
/// their sub accumulator" convention the rewriter already assumes for
/// composite expressions.
fn om_aggregate_function(accumulator_kind: &str) -> &'static str {
    match accumulator_kind.to_ascii_lowercase().as_str() {
        "sum" => "OM_SUM",
        "min" => "OM_MIN",
        "max" => "OM_MAX",
        "count" => "OM_COUNT",
        _ => "OM_AVG",
    }
}

fn lower_entity_set(interner: &mut Interner, symtab: &mut SymbolTable, decl: &EntitySetDecl) {
    let entity = interner.intern(&decl.entity);
    let meta = SymbolMeta::new(interner.intern(&decl.name), decl.loc.clone());
    let mut set = EntitySetSymbol::new(meta, entity);
    for dim in &decl.dimensions {
        set.dimensions.push(DimensionSymbol::new(dim.attribute_or_enum.clone()));
    }
    set.filter_raw = decl.filter.clone();
    morph(symtab, interner, &decl.name, Symbol::EntitySet(set));

    if let Some(Symbol::Entity(e)) = symtab.get_mut(entity) {
        e.entity_sets.push(interner.intern(&decl.name));
    }
}

fn lower_parameter(interner: &mut Interner, symtab: &mut SymbolTable, decl: &ParameterDecl) {
    let meta = SymbolMeta::new(interner.intern(&decl.name), decl.loc.clone());
    let mut param = ParameterSymbol::new(meta, decl.type_name.clone());
    for dim in &decl.dimensions {
        param.dimensions.push(interner.intern(dim));
    }
    morph(symtab, interner, &decl.name, Symbol::Parameter(param));
}
