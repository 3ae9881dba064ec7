//! `Increment`: per-entity, per-entity-table transient
//! state representing an in-progress contribution to a table cell. The
//! running simulation owns the actual runtime value; this crate only
//! needs to know its shape well enough to generate the C++ member and the
//! `set_cell`/`start_pending`/`finish_pending` calls the middle-end wires
//! into attribute side-effects.

use omc_core::Name;

#[derive(Debug, Clone)]
pub struct Increment {
    pub table: Name,
    pub cell: i64,
    pub pending: bool,
    pub filter_value: Option<String>,
}

impl Increment {
    pub fn new(table: Name) -> Self {
        Self {
            table,
            cell: 0,
            pending: false,
            filter_value: None,
        }
    }

    pub fn set_cell(&mut self, cell: i64) {
        self.cell = cell;
    }

    pub fn set_filter(&mut self, value: String) {
        self.filter_value = Some(value);
    }

    pub fn start_pending(&mut self) {
        self.pending = true;
    }

    pub fn finish_pending(&mut self) {
        self.pending = false;
    }
}
