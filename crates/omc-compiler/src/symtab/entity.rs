//! `EntitySymbol`: owns the ordered collections the C++ emitter walks
//! to generate each lifecycle function, populated by pass
//! `ePopulateCollections`.

use omc_core::Name;

use super::SymbolMeta;

#[derive(Debug, Clone)]
pub struct EntitySymbol {
    pub meta: SymbolMeta,
    pub attributes: Vec<Name>,
    pub events: Vec<Name>,
    pub tables: Vec<Name>,
    pub entity_sets: Vec<Name>,
    pub multilinks: Vec<Name>,
}

impl EntitySymbol {
    pub fn new(meta: SymbolMeta) -> Self {
        Self {
            meta,
            attributes: Vec::new(),
            events: Vec::new(),
            tables: Vec::new(),
            entity_sets: Vec::new(),
            multilinks: Vec::new(),
        }
    }
}
