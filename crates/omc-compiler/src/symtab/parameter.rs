//! `ParameterSymbol`: a typed, n-dimensional (ranked) model parameter
//! whose values are loaded from a workset at run time (out of scope here;
//! `omc_sql::workset` builds the SQL that would hold them).

use omc_core::{Name, TypeSymbol};

use super::SymbolMeta;

#[derive(Debug, Clone)]
pub struct ParameterSymbol {
    pub meta: SymbolMeta,
    pub type_name: String,
    pub type_: TypeSymbol,
    /// Dimension enumeration names, in declared order; `rank() ==
    /// dimensions.len()`.
    pub dimensions: Vec<Name>,
}

impl ParameterSymbol {
    pub fn new(meta: SymbolMeta, type_name: String) -> Self {
        Self {
            meta,
            type_name,
            type_: TypeSymbol::Unknown,
            dimensions: Vec::new(),
        }
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }
}
