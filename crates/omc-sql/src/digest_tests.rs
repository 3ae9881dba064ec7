use super::*;
use crate::meta::{DimensionMeta, ParameterMeta};

#[test]
fn md5_and_crc32_are_stable_and_hex() {
    let d1 = md5_hex("hello");
    let d2 = md5_hex("hello");
    assert_eq!(d1, d2);
    assert_eq!(d1.len(), 32);
    assert!(d1.chars().all(|c| c.is_ascii_hexdigit()));

    let c1 = crc32_hex("hello");
    assert_eq!(c1.len(), 8);
    assert!(c1.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn parameter_digest_changes_with_dimensions() {
    let base = ParameterMeta {
        name: "P".to_string(),
        short_name: "P".to_string(),
        type_name: "int".to_string(),
        dimensions: vec![],
        label: String::new(),
    };
    let mut with_dim = base.clone();
    with_dim.dimensions.push(DimensionMeta {
        short_name: "dim0".to_string(),
        type_name: "AGE_GROUP".to_string(),
        size: 3,
    });
    assert_ne!(parameter_digest(&base), parameter_digest(&with_dim));
}

#[test]
fn assign_db_name_never_exceeds_max_len() {
    let name = assign_db_name(
        "a_very_long_parameter_name_that_needs_truncation",
        "some-digest-input",
        NameKind::RunParameter,
        30,
    );
    assert!(name.len() <= 30, "{name} is {} chars", name.len());
    assert!(name.contains("_p_"));
}

#[test]
fn assign_db_name_is_deterministic() {
    let a = assign_db_name("Age", "digest-a", NameKind::Accumulator, 30);
    let b = assign_db_name("Age", "digest-a", NameKind::Accumulator, 30);
    assert_eq!(a, b);
}

#[test]
fn assign_db_name_varies_by_kind() {
    let p = assign_db_name("Age", "digest-a", NameKind::RunParameter, 30);
    let w = assign_db_name("Age", "digest-a", NameKind::Workset, 30);
    assert_ne!(p, w);
}
