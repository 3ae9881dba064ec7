use super::*;
use crate::parse_context::ParseContext;
use crate::parser::parse_source;
use crate::source::SourceFile;
use crate::symtab::lower::lower;
use crate::symtab::{Symbol, SymbolTable};
use indoc::indoc;
use omc_core::{Interner, LanguageList, ModelType};

fn build(text: &str) -> (Interner, SymbolTable, omc_core::Diagnostics) {
    let file = SourceFile::new("Test.mpp", text.to_string());
    let (decls, comments, parse_diags) = parse_source(&file);
    assert!(parse_diags.is_empty(), "unexpected parse errors: {parse_diags:?}");

    let mut interner = Interner::new();
    let mut symtab = SymbolTable::new();
    lower(&mut interner, &mut symtab, &[decls]);

    let languages = LanguageList::default();
    let options = ModelOptions::default();
    let parse_ctx = ParseContext::new();
    let mut diags = omc_core::Diagnostics::new();
    run(
        &mut symtab,
        &mut interner,
        ModelType::CaseBased,
        &languages,
        &options,
        &comments,
        &parse_ctx,
        &mut diags,
    );
    (interner, symtab, diags)
}

#[test]
fn builtin_attributes_are_synthesized_on_every_entity() {
    let (mut interner, symtab, _diags) = build(indoc! {"
        entity Person {
            bool alive = true;
        };
    "});
    let time = interner.intern("Person::time");
    assert!(matches!(symtab.get(time), Some(Symbol::Attribute(_))));
}

#[test]
fn events_builtin_attribute_is_synthesized_unconditionally() {
    let (mut interner, symtab, _diags) = build(indoc! {"
        entity Person {
            bool alive = true;
        };
    "});
    let events = interner.intern("Person::events");
    assert!(matches!(symtab.get(events), Some(Symbol::Attribute(_))));
}

#[test]
fn table_entity_is_inferred_from_its_dimension_attribute() {
    let (mut interner, symtab, _diags) = build(indoc! {"
        classification SEX { MALE, FEMALE };

        entity Person {
            SEX sex;
        };

        table T {
            dimensions(sex);
            measure n = OM_COUNT();
        };
    "});
    let table = interner.intern("T");
    let person = interner.intern("Person");
    match symtab.get(table) {
        Some(Symbol::Table(t)) => assert_eq!(t.entity, Some(person)),
        other => panic!("expected table symbol, got {other:?}"),
    }
}

#[test]
fn table_dimension_attribute_gains_increment_side_effects() {
    let (mut interner, symtab, _diags) = build(indoc! {"
        classification SEX { MALE, FEMALE };

        entity Person {
            SEX sex;
        };

        table T {
            dimensions(sex);
            measure n = OM_COUNT();
        };
    "});
    let sex_attr = interner.intern("Person::sex");
    match symtab.get(sex_attr) {
        Some(Symbol::Attribute(a)) => assert!(!a.side_effects_fn.is_empty()),
        other => panic!("expected attribute symbol, got {other:?}"),
    }
}

#[test]
fn no_unresolved_base_placeholders_survive_a_closed_model() {
    let (_interner, symtab, diags) = build(indoc! {"
        entity Person {
            bool alive = true;
            event DeathEvent(timeDeathEvent, implementDeathEvent);
        };
    "});
    assert!(symtab.base_placeholders().is_empty());
    assert!(!diags.has_errors());
}
