use super::*;
use crate::interner::Interner;

#[test]
fn unknown_is_unknown() {
    assert!(TypeSymbol::Unknown.is_unknown());
    assert!(!TypeSymbol::Bool.is_unknown());
}

#[test]
fn classification_range_partition_are_enumerations() {
    let mut interner = Interner::new();
    let sex = interner.intern("SEX");
    assert!(TypeSymbol::Classification(sex).is_enumeration());
    assert!(TypeSymbol::Range(sex).is_enumeration());
    assert!(TypeSymbol::Partition(sex).is_enumeration());
    assert!(TypeSymbol::Enumeration(sex).is_enumeration());
    assert!(!TypeSymbol::Bool.is_enumeration());
}

#[test]
fn implied_enumeration_extracts_name_for_dimension_inference() {
    let mut interner = Interner::new();
    let age_range = interner.intern("AGE_RANGE");
    let ty = TypeSymbol::Range(age_range);
    assert_eq!(ty.implied_enumeration(), Some(age_range));
    assert_eq!(TypeSymbol::Bool.implied_enumeration(), None);
}

#[test]
fn link_and_multilink_are_distinguished() {
    let mut interner = Interner::new();
    let person = interner.intern("Person");
    assert!(TypeSymbol::Link(person).is_link());
    assert!(!TypeSymbol::Link(person).is_multilink());
    assert!(TypeSymbol::Multilink(person).is_multilink());
}

#[test]
fn cpp_builtin_name_covers_fixed_spellings() {
    assert_eq!(TypeSymbol::Numeric(NumericKind::Int).cpp_builtin_name(), Some("int"));
    assert_eq!(TypeSymbol::Bool.cpp_builtin_name(), Some("bool"));
    assert_eq!(TypeSymbol::String.cpp_builtin_name(), Some("string"));
    assert_eq!(TypeSymbol::Time.cpp_builtin_name(), Some("Time"));
    assert_eq!(TypeSymbol::Unknown.cpp_builtin_name(), None);
}
