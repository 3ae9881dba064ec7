use super::*;
use omc_core::LanguageList;

#[test]
fn keeps_existing_translations_for_keys_still_extracted() {
    let old = "[EN]\ngreeting = \"Hello\"\nstale = \"Old\"\n\n";
    let languages = LanguageList::new(["EN".to_string()]);
    let merged = merge(Some(old), &languages, &["greeting".to_string()]);
    assert_eq!(merged.sections["EN"]["greeting"], "Hello");
    assert!(!merged.sections["EN"].contains_key("stale"));
}

#[test]
fn new_keys_get_an_empty_placeholder() {
    let languages = LanguageList::new(["EN".to_string()]);
    let merged = merge(None, &languages, &["new_key".to_string()]);
    assert_eq!(merged.sections["EN"]["new_key"], "");
}

#[test]
fn every_language_gets_a_section_even_with_no_prior_file() {
    let languages = LanguageList::new(["EN".to_string(), "FR".to_string()]);
    let merged = merge(None, &languages, &["k".to_string()]);
    assert!(merged.sections.contains_key("EN"));
    assert!(merged.sections.contains_key("FR"));
}

#[test]
fn preserves_source_discovery_order_not_alphabetical() {
    let languages = LanguageList::new(["EN".to_string()]);
    let merged = merge(None, &languages, &["zebra".to_string(), "apple".to_string()]);
    let keys: Vec<&str> = merged.sections["EN"].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zebra", "apple"]);
}
