use super::*;

#[test]
fn default_language_is_index_zero() {
    let langs = LanguageList::new(["EN".to_string(), "FR".to_string()]);
    assert_eq!(langs.default_language().unwrap().code, "EN");
}

#[test]
fn index_of_finds_language_by_code() {
    let langs = LanguageList::new(["EN".to_string(), "FR".to_string()]);
    assert_eq!(langs.index_of("FR"), Some(1));
    assert_eq!(langs.index_of("DE"), None);
}

#[test]
fn empty_language_list_has_no_default() {
    let langs = LanguageList::default();
    assert!(langs.is_empty());
    assert!(langs.default_language().is_none());
}

#[test]
fn model_type_is_case_based_distinguishes_variants() {
    assert!(ModelType::CaseBased.is_case_based());
    assert!(!ModelType::TimeBased.is_case_based());
}
