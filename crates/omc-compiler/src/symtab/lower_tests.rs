use super::*;
use crate::parser::parse_source;
use crate::source::SourceFile;
use indoc::indoc;
use omc_core::Interner;

fn lower_text(text: &str) -> (Interner, SymbolTable) {
    let file = SourceFile::new("Test.mpp", text.to_string());
    let (decls, _comments, diags) = parse_source(&file);
    assert!(diags.is_empty(), "unexpected parse errors: {diags:?}");
    let mut interner = Interner::new();
    let mut symtab = SymbolTable::new();
    lower(&mut interner, &mut symtab, &[decls]);
    (interner, symtab)
}

#[test]
fn lowers_entity_with_simple_attribute() {
    let (mut interner, symtab) = lower_text(indoc! {"
        entity Person {
            bool alive = true;
        };
    "});
    let entity_name = interner.intern("Person");
    match symtab.get(entity_name) {
        Some(Symbol::Entity(e)) => assert_eq!(e.attributes.len(), 1),
        other => panic!("expected entity symbol, got {other:?}"),
    }

    let attr_name = interner.intern("Person::alive");
    match symtab.get(attr_name) {
        Some(Symbol::Attribute(a)) => {
            assert_eq!(a.type_name, "bool");
            assert!(matches!(a.kind, AttributeKind::Simple { .. }));
        }
        other => panic!("expected attribute symbol, got {other:?}"),
    }
}

#[test]
fn lowers_event_and_registers_on_entity() {
    let (mut interner, symtab) = lower_text(indoc! {"
        entity Person {
            bool alive = true;
            event DeathEvent(timeDeathEvent, implementDeathEvent);
        };
    "});
    let entity_name = interner.intern("Person");
    match symtab.get(entity_name) {
        Some(Symbol::Entity(e)) => assert_eq!(e.events.len(), 1),
        other => panic!("expected entity symbol, got {other:?}"),
    }
}

#[test]
fn lowers_table_dimensions_and_measures() {
    let (mut interner, symtab) = lower_text(indoc! {"
        table T {
            dimensions(dim0, dim1);
            measure avg_x = OM_AVG(value_in, interval, x);
        };
    "});
    let table_name = interner.intern("T");
    match symtab.get(table_name) {
        Some(Symbol::Table(t)) => {
            assert_eq!(t.dimensions.len(), 2);
            assert_eq!(t.measures.len(), 1);
            assert_eq!(t.accumulators.len(), 1);
        }
        other => panic!("expected table symbol, got {other:?}"),
    }
}

#[test]
fn forward_reference_creates_base_symbol() {
    let (mut interner, symtab) = lower_text(indoc! {"
        entity Person {
            link Household household;
        };
    "});
    let household = interner.intern("Household");
    assert!(symtab.get(household).unwrap().is_base());
}
