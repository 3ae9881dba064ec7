//! Pass 5, `eResolveDataTypes`: propagates types through `parent`
//! chains until a fixpoint is reached (bounded, since a chain can be no
//! longer than the number of attributes in the program). Any attribute
//! still `Unknown` once the fixpoint is reached is a resolution error
//!.

use omc_core::{BuildError, Diagnostics, Interner};

use crate::symtab::{Symbol, SymbolTable};

const MAX_ITERATIONS: usize = 64;

pub fn run(symtab: &mut SymbolTable, interner: &Interner, diags: &mut Diagnostics) {
    let attribute_names: Vec<_> = symtab
        .iter()
        .filter_map(|(n, s)| matches!(s, Symbol::Attribute(_)).then_some(n))
        .collect();

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for &name in &attribute_names {
            let (is_unknown, parent) = match symtab.get(name) {
                Some(Symbol::Attribute(a)) => (a.type_.is_unknown(), a.parent),
                _ => continue,
            };
            if !is_unknown {
                continue;
            }
            let Some(parent) = parent else { continue };
            let parent_type = match symtab.get(parent) {
                Some(Symbol::Attribute(p)) => p.type_,
                _ => continue,
            };
            if parent_type.is_unknown() {
                continue;
            }
            if let Some(Symbol::Attribute(a)) = symtab.get_mut(name) {
                a.type_ = parent_type;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for &name in &attribute_names {
        if let Some(Symbol::Attribute(a)) = symtab.get(name)
            && a.type_.is_unknown()
        {
            let err = BuildError::UnresolvedType {
                loc: a.meta.loc.clone(),
                symbol: interner.resolve(a.meta.name).to_string(),
            };
            diags.error(a.meta.loc.clone(), err.to_string());
        }
    }
}
