//! Message-INI merge: writes `<model>.message.ini`, the merged
//! translation file for every string passed to `LT(...)` and captured by
//! the lexer's translatable-string side-channel.

use std::collections::HashSet;

use indexmap::IndexMap;
use omc_core::LanguageList;
use tracing::info;

pub mod message_ini;

pub use message_ini::IniDocument;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod mod_tests;

/// Merges `extracted_keys` against an
/// optional prior `<model>.message.ini`, for every language in `languages`.
pub fn merge(old: Option<&str>, languages: &LanguageList, extracted_keys: &[String]) -> IniDocument {
    let old_doc = old.map(IniDocument::parse).unwrap_or_default();
    let extracted: IndexMap<&str, ()> = extracted_keys.iter().map(|k| (k.as_str(), ())).collect();

    let mut merged = IniDocument::default();
    for lang in languages.iter() {
        let old_section = old_doc.sections.get(&lang.code);
        let mut section = IndexMap::new();
        for key in extracted.keys() {
            let value = old_section
                .and_then(|s| s.get(*key))
                .cloned()
                .unwrap_or_default();
            section.insert((*key).to_string(), value);
        }
        merged.sections.insert(lang.code.clone(), section);

        if let Some(old_section) = old_section {
            let extracted_set: HashSet<&str> = extracted.keys().copied().collect();
            let dropped = old_section.keys().filter(|k| !extracted_set.contains(k.as_str())).count();
            if dropped > 0 {
                info!("Deleted {dropped} translated message(s) from language {}", lang.code);
            }
        }
    }
    merged
}
