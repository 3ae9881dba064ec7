//! `EntitySetSymbol`: ordered dimensions plus an optional filter,
//! yielding an n-dim bucket membership for entities of one kind.

use omc_core::Name;

use super::SymbolMeta;
use super::table::DimensionSymbol;

#[derive(Debug, Clone)]
pub struct EntitySetSymbol {
    pub meta: SymbolMeta,
    pub entity: Name,
    pub dimensions: Vec<DimensionSymbol>,
    pub filter_raw: Option<String>,
    pub filter: Option<Name>,
}

impl EntitySetSymbol {
    pub fn new(meta: SymbolMeta, entity: Name) -> Self {
        Self {
            meta,
            entity,
            dimensions: Vec::new(),
            filter_raw: None,
            filter: None,
        }
    }
}
