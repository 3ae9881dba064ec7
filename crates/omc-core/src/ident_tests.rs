use super::*;

#[test]
fn sanitize_replaces_illegal_characters() {
    assert_eq!(sanitize("Age-Group"), "Age_Group");
    assert_eq!(sanitize("Person.member"), "Person_member");
}

#[test]
fn sanitize_prefixes_leading_digit() {
    assert_eq!(sanitize("1stYear"), "_1stYear");
}

#[test]
fn sanitize_never_returns_empty() {
    assert_eq!(sanitize(""), "_");
    assert_eq!(sanitize("!!!"), "_");
}

#[test]
fn truncate_middle_keeps_short_strings() {
    assert_eq!(truncate_middle("Age", 30), "Age");
}

#[test]
fn truncate_middle_cuts_out_the_center() {
    let long = "ThisIsAVeryLongParameterNameThatExceedsTheLimit";
    let truncated = truncate_middle(long, 20);
    assert_eq!(truncated.chars().count(), 20);
    assert!(truncated.starts_with("This"));
    assert!(truncated.ends_with("imit"));
    assert!(truncated.contains("..."));
}

#[test]
fn unique_names_suffixes_on_collision() {
    let mut names = UniqueNames::new();
    let (first, changed1) = names.make_unique("Age", 30);
    let (second, changed2) = names.make_unique("Age", 30);
    let (third, changed3) = names.make_unique("AGE", 30);
    assert_eq!(first, "Age");
    assert!(!changed1);
    assert_eq!(second, "Age1");
    assert!(changed2);
    // "AGE" collides case-insensitively with "Age" and "Age1"
    assert_eq!(third, "Age2");
    assert!(changed3);
}

#[test]
fn unique_names_respects_max_len_by_trimming_tail() {
    let mut names = UniqueNames::new();
    let base = "A".repeat(30);
    let (first, _) = names.make_unique(&base, 30);
    assert_eq!(first.len(), 30);
    let (second, changed) = names.make_unique(&base, 30);
    assert!(changed);
    assert_eq!(second.len(), 30);
    assert!(second.ends_with('1'));
}

#[test]
fn reserved_words_check_is_case_insensitive() {
    let words: &[&str] = &["SELECT", "TABLE"];
    assert!(words.is_reserved("select"));
    assert!(words.is_reserved("Table"));
    assert!(!words.is_reserved("Person"));
}
