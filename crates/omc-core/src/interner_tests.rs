use super::*;

#[test]
fn intern_dedupes_equal_strings() {
    let mut interner = Interner::new();
    let a = interner.intern("Person::alive");
    let b = interner.intern("Person::alive");
    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn intern_member_matches_manual_format() {
    let mut interner = Interner::new();
    let a = interner.intern_member("Person", "alive");
    let b = interner.intern("Person::alive");
    assert_eq!(a, b);
}

#[test]
fn resolve_roundtrips() {
    let mut interner = Interner::new();
    let name = interner.intern("DeathEvent");
    assert_eq!(interner.resolve(name), "DeathEvent");
}

#[test]
fn try_resolve_rejects_foreign_handle() {
    let interner = Interner::new();
    assert_eq!(interner.try_resolve(Name::from_raw(42)), None);
}

#[test]
fn distinct_strings_get_distinct_names() {
    let mut interner = Interner::new();
    let a = interner.intern("Person::age");
    let b = interner.intern("Person::alive");
    assert_ne!(a, b);
}

#[test]
fn file_table_dedupes_paths() {
    use std::path::Path;
    let mut files = FileTable::new();
    let a = files.intern(Path::new("model/Person.mpp"));
    let b = files.intern(Path::new("model/Person.mpp"));
    assert_eq!(a, b);
    assert_eq!(files.resolve(a), Path::new("model/Person.mpp"));
}
