//! Converts a resolved [`SymbolTable`] into the self-contained metadata
//! shape `omc-sql` works from. `omc-sql` deliberately carries no
//! dependency on `omc-compiler`'s symbol table, so this crate is where the
//! two meet.

use omc_compiler::symtab::{Symbol, SymbolTable, TableKind};
use omc_core::ident::UniqueNames;
use omc_core::{Interner, LanguageList, ModelType, TypeSymbol};
use omc_sql::meta::{
    AccumulatorMeta, DimensionMeta, LanguageMeta, MeasureMeta, ModelKind, ModelMeta, ParameterMeta,
    TableMeta, TypeKind, TypeMeta,
};
use omc_sql::Provider;
use tracing::warn;

/// §3: "Every dimension acquires a short DB-legal, case-insensitively-unique
/// column name (<=30 chars, alphanumeric+`_`, not a SQL reserved word, not
/// starting with a digit)." This limit is a flat architectural constant,
/// independent of which providers are configured - `schema.rs` never
/// re-truncates a dimension column name per provider the way `digest.rs`
/// does for physical table names.
const DIMENSION_NAME_MAX_LEN: usize = 30;

/// Sanitizes `raw` and, if the result collides with a reserved word under
/// any configured provider, appends a suffix so it doesn't shadow one
/// before `names` is asked to enforce case-insensitive uniqueness.
fn dimension_name_candidate(raw: &str, providers: &[Provider]) -> String {
    let candidate = omc_core::ident::sanitize(raw);
    if providers.iter().any(|p| p.is_reserved_word(&candidate)) {
        format!("{candidate}_dim")
    } else {
        candidate
    }
}

/// Assigns each dimension in `dims` its final short DB name: sanitized,
/// clear of reserved words, and made pairwise unique (case-insensitively)
/// within this one parameter's or table's own dimension list, exactly as
/// §8 S4 describes ("two attributes share a short label-derived DB name
/// `Age` ... one remains `Age` and the other becomes `Age1`"). `owner` is
/// only used to name the symbol in the logged warning.
fn assign_dimension_names(dims: &mut [DimensionMeta], providers: &[Provider], owner: &str) {
    let mut names = UniqueNames::new();
    for dim in dims.iter_mut() {
        let candidate = dimension_name_candidate(&dim.short_name, providers);
        let (assigned, changed) = names.make_unique(&candidate, DIMENSION_NAME_MAX_LEN);
        if changed {
            warn!(
                "dimension short name '{}' for '{owner}' collides with an earlier dimension; renamed to '{assigned}'",
                dim.short_name
            );
        }
        dim.short_name = assigned;
    }
}

/// Resolves `type_` to the `TypeMeta` it contributes, if any (built-in
/// scalar types contribute nothing - they have no `type_dic` row of their
/// own beyond the fixed numeric/bool/string/time kinds the SQL emitter
/// falls back to by name).
fn type_meta_for(symtab: &SymbolTable, interner: &Interner, type_: TypeSymbol) -> Option<TypeMeta> {
    match type_ {
        TypeSymbol::Classification(n) | TypeSymbol::Enumeration(n) => match symtab.get(n)? {
            Symbol::Classification(c) => Some(TypeMeta {
                name: interner.resolve(n).to_string(),
                kind: TypeKind::Classification {
                    enumerators: c.enumerators.clone(),
                },
            }),
            _ => None,
        },
        TypeSymbol::Range(n) => match symtab.get(n)? {
            Symbol::Range(r) => Some(TypeMeta {
                name: interner.resolve(n).to_string(),
                kind: TypeKind::Range { lower: r.lower, upper: r.upper },
            }),
            _ => None,
        },
        TypeSymbol::Partition(n) => match symtab.get(n)? {
            Symbol::Partition(p) => Some(TypeMeta {
                name: interner.resolve(n).to_string(),
                kind: TypeKind::Partition {
                    split_points: p.split_points.clone(),
                },
            }),
            _ => None,
        },
        _ => None,
    }
}

fn dimension_meta(interner: &Interner, dim: &omc_compiler::symtab::DimensionSymbol) -> DimensionMeta {
    let type_name = dim
        .enumeration
        .map(|n| interner.resolve(n).to_string())
        .unwrap_or_else(|| dim.raw_name.clone());
    DimensionMeta {
        short_name: dim.db_name.clone(),
        type_name,
        size: dim.size,
    }
}

/// Builds the SQL-facing `ModelMeta` from everything `passes::run` has
/// already resolved. Panics are deliberately absent: a symbol table that
/// reaches here with unresolved types would already have failed
/// `diags.has_errors()` upstream and the caller aborted before calling in.
pub fn build_model_meta(
    symtab: &SymbolTable,
    interner: &Interner,
    model_type: ModelType,
    languages: &LanguageList,
    model_name: &str,
    model_version: &str,
    providers: &[Provider],
) -> ModelMeta {
    let kind = if model_type.is_case_based() {
        ModelKind::CaseBased
    } else {
        ModelKind::TimeBased
    };

    let mut types = Vec::new();
    let mut seen_types = std::collections::HashSet::new();
    for (name, symbol) in symtab.iter() {
        let type_ = match symbol {
            Symbol::Classification(_) => TypeSymbol::Classification(name),
            Symbol::Range(_) => TypeSymbol::Range(name),
            Symbol::Partition(_) => TypeSymbol::Partition(name),
            _ => continue,
        };
        if let Some(meta) = type_meta_for(symtab, interner, type_)
            && seen_types.insert(meta.name.clone())
        {
            types.push(meta);
        }
    }

    let mut parameters = Vec::new();
    let mut tables = Vec::new();
    for name in symtab.names_by_kind_then_name() {
        match symtab.get(name) {
            Some(Symbol::Parameter(p)) => {
                let param_name = interner.resolve(name).to_string();
                // Dimension short names are derived from the bound
                // enumeration's own name, the same way a table dimension
                // bound directly to an enumeration (no attribute) is
                // named - never a positional `dim{i}` literal (§3, §8 S4).
                let mut dimensions: Vec<DimensionMeta> = p
                    .dimensions
                    .iter()
                    .map(|&dim_name| {
                        let type_name = interner.resolve(dim_name).to_string();
                        let size = match symtab.get(dim_name) {
                            Some(Symbol::Classification(c)) => c.enumerators.len() as u32,
                            Some(Symbol::Range(r)) => r.size(),
                            Some(Symbol::Partition(part)) => part.size(),
                            _ => 0,
                        };
                        DimensionMeta { short_name: type_name.clone(), type_name, size }
                    })
                    .collect();
                assign_dimension_names(&mut dimensions, providers, &param_name);
                parameters.push(ParameterMeta {
                    name: param_name,
                    short_name: p.meta.db_name.clone().unwrap_or_else(|| interner.resolve(name).to_string()),
                    type_name: p.type_name.clone(),
                    dimensions,
                    label: p.meta.label(0).unwrap_or_else(|| interner.resolve(name)).to_string(),
                });
            }
            Some(Symbol::Table(t)) if t.kind == TableKind::Entity => {
                let table_name = interner.resolve(name).to_string();
                let mut dimensions: Vec<DimensionMeta> =
                    t.dimensions.iter().map(|d| dimension_meta(interner, d)).collect();
                assign_dimension_names(&mut dimensions, providers, &table_name);
                let measures = t
                    .measures
                    .iter()
                    .map(|m| MeasureMeta { name: m.name.clone(), expr: m.expr.clone() })
                    .collect();
                let accumulators = t
                    .accumulators
                    .iter()
                    .map(|a| AccumulatorMeta {
                        name: a.name.clone(),
                        accumulator: a.accumulator.clone(),
                        increment_kind: a.increment_kind.clone(),
                        timing: a.timing.clone(),
                        obs_collection_index: a.obs_collection_index,
                    })
                    .collect();
                tables.push(TableMeta {
                    name: interner.resolve(name).to_string(),
                    short_name: t.meta.db_name.clone().unwrap_or_else(|| interner.resolve(name).to_string()),
                    dimensions,
                    measures,
                    accumulators,
                    label: t.meta.label(0).unwrap_or_else(|| interner.resolve(name)).to_string(),
                });
            }
            _ => {}
        }
    }

    ModelMeta {
        name: model_name.to_string(),
        version: model_version.to_string(),
        kind,
        languages: languages.iter().map(|l| LanguageMeta { code: l.code.clone() }).collect(),
        types,
        parameters,
        tables,
    }
}

#[cfg(test)]
#[path = "to_meta_tests.rs"]
mod to_meta_tests;
