//! Pass 1, `eCreateForeignTypes`: resolves every member's declared
//! type *name* to a [`TypeSymbol`] where the global type namespace
//! (built-ins plus classification/range/partition/entity declarations
//! already lowered) has a match; anything else is left as
//! `TypeSymbol::Unknown`, to be resolved from a `parent` attribute in pass
//! 5 or reported as an error if it never is.

use omc_core::{Diagnostics, Interner, Name, NumericKind, TypeSymbol};

use crate::symtab::{AttributeKind, Symbol, SymbolTable};

pub fn run(symtab: &mut SymbolTable, interner: &mut Interner, diags: &mut Diagnostics) {
    let names = symtab.names();
    for name in names {
        resolve_one(symtab, interner, name, diags);
    }
}

fn resolve_one(symtab: &mut SymbolTable, interner: &mut Interner, name: Name, _diags: &mut Diagnostics) {
    let Some(symbol) = symtab.get(name) else { return };

    match symbol {
        Symbol::Attribute(a) => {
            let resolved = match &a.kind {
                AttributeKind::Link { target_entity } => Some(TypeSymbol::Link(*target_entity)),
                AttributeKind::Multilink { target_entity } => Some(TypeSymbol::Multilink(*target_entity)),
                _ => builtin_or_named(symtab, interner, &a.type_name),
            };
            if let Some(t) = resolved {
                if let Some(Symbol::Attribute(a)) = symtab.get_mut(name) {
                    a.type_ = t;
                }
            }
        }
        Symbol::Parameter(_) => {
            let type_name = match symtab.get(name) {
                Some(Symbol::Parameter(p)) => p.type_name.clone(),
                _ => return,
            };
            if let Some(t) = builtin_or_named(symtab, interner, &type_name)
                && let Some(Symbol::Parameter(p)) = symtab.get_mut(name)
            {
                p.type_ = t;
            }
        }
        _ => {}
    }
}

/// `int`/`double`/`Time`/`counter`/`real`/`bool`/`string`, or the name of
/// an already-lowered classification/range/partition/entity. Returns
/// `None` (caller leaves `TypeSymbol::Unknown`) if nothing matches.
fn builtin_or_named(symtab: &SymbolTable, interner: &mut Interner, type_name: &str) -> Option<TypeSymbol> {
    let kind = match type_name {
        "int" => Some(NumericKind::Int),
        "double" => Some(NumericKind::Double),
        "Time" => return Some(TypeSymbol::Time),
        "counter" => Some(NumericKind::Counter),
        "real" => Some(NumericKind::Real),
        "bool" => return Some(TypeSymbol::Bool),
        "string" => return Some(TypeSymbol::String),
        _ => None,
    };
    if let Some(kind) = kind {
        return Some(TypeSymbol::Numeric(kind));
    }

    let named = interner.intern(type_name);
    symtab.get(named).and_then(Symbol::as_named_type)
}
