//! `TableSymbol`: entity tables (aggregate increments pushed by
//! entities) and derived tables (computed from other tables), each owning
//! ordered dimensions, measures, and accumulators.

use omc_core::Name;

use super::SymbolMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Entity,
    Derived,
}

/// A table dimension: bound to exactly one of an attribute or a directly
/// named enumeration, never both. Exactly one of `attribute`/`enumeration` is set before
/// pass `eAssignMembers` runs; after it, `enumeration` is always set
/// (inferred from the attribute's type when bound to an attribute).
#[derive(Debug, Clone)]
pub struct DimensionSymbol {
    /// The attribute or enumeration name as written in the declaration,
    /// before `eAssignMembers` resolves it to one of `attribute`/
    /// `enumeration` below.
    pub raw_name: String,
    pub attribute: Option<Name>,
    pub enumeration: Option<Name>,
    /// Assigned by the SQL emitter (omc-sql), not this crate; kept here so
    /// the C++ emitter and the SQL emitter agree on the same name.
    pub db_name: String,
    pub size: u32,
}

impl DimensionSymbol {
    pub fn new(raw_name: String) -> Self {
        Self {
            raw_name,
            attribute: None,
            enumeration: None,
            db_name: String::new(),
            size: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeasureSymbol {
    pub name: String,
    /// Raw analysis expression, e.g. `OM_AVG(x)`; rewritten into SQL by
    /// `omc_sql`'s aggregation rewriter.
    pub expr: String,
}

/// One accumulator: `sum|min|max|gini|Pxx|...` over increments of a
/// given kind, under a timing operator, possibly filtered.
#[derive(Debug, Clone)]
pub struct AccumulatorSymbol {
    pub name: String,
    pub accumulator: String,
    pub increment_kind: String,
    pub timing: String,
    pub attribute: Name,
    /// Shared 0-based index for accumulators needing a full per-cell
    /// observation collection (gini, percentiles), assigned by
    /// `populate_dependencies` when deduplicating by `(increment_kind,
    /// timing, attribute)`.
    pub obs_collection_index: Option<u32>,
    /// Exactly one accumulator per shared collection actually updates it;
    /// the rest read from the same collection.
    pub updates_obs_collection: bool,
}

impl AccumulatorSymbol {
    /// Whether this accumulator kind requires a full observation
    /// collection rather than a running statistic.
    pub fn requires_observation_collection(&self) -> bool {
        self.accumulator.eq_ignore_ascii_case("gini")
            || self.accumulator.to_ascii_uppercase().starts_with('P')
                && self.accumulator[1..].chars().all(|c| c.is_ascii_digit())
                && self.accumulator.len() > 1
    }
}

#[derive(Debug, Clone)]
pub struct TableSymbol {
    pub meta: SymbolMeta,
    pub kind: TableKind,
    pub entity: Option<Name>,
    pub dimensions: Vec<DimensionSymbol>,
    pub measures: Vec<MeasureSymbol>,
    pub accumulators: Vec<AccumulatorSymbol>,
    /// Filter attribute name as written, before `eAssignMembers` resolves
    /// it against the table's entity.
    pub filter_raw: Option<String>,
    pub filter: Option<Name>,
}

impl TableSymbol {
    pub fn new(meta: SymbolMeta, kind: TableKind) -> Self {
        Self {
            meta,
            kind,
            entity: None,
            dimensions: Vec::new(),
            measures: Vec::new(),
            accumulators: Vec::new(),
            filter_raw: None,
            filter: None,
        }
    }

    /// Total number of cells: the product of dimension sizes.
    pub fn cell_count(&self) -> u64 {
        self.dimensions.iter().map(|d| d.size as u64).product()
    }

    /// Row-major cell index expression operands, innermost dimension
    /// varying fastest: `om_T_current_cell()` returns `(dim0 * 3 + dim1)`
    /// for a 2x3 table.
    pub fn cell_index_strides(&self) -> Vec<u64> {
        let mut strides = vec![1u64; self.dimensions.len()];
        for i in (0..self.dimensions.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.dimensions[i + 1].size as u64;
        }
        strides
    }
}
