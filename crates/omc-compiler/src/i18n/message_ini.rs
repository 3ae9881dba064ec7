//! Minimal INI reader/writer for the `<model>.message.ini` translation
//! file: `[SECTION]` headers, `key = value` pairs, `;`/`#` line comments.
//! Deliberately separate from any standalone INI library - just enough to round-trip the
//! translation file's own dialect.

use indexmap::IndexMap;

/// Ordered sections, each an ordered map of key -> value, matching the
/// file's on-disk order so repeated builds produce minimal diffs.
#[derive(Debug, Clone, Default)]
pub struct IniDocument {
    pub sections: IndexMap<String, IndexMap<String, String>>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Self {
        let mut doc = IniDocument::default();
        let mut current: Option<String> = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim().to_string();
                doc.sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            let Some(section) = &current else { continue };
            let Some((key, value)) = line.split_once('=') else { continue };
            let key = key.trim().to_string();
            let value = unquote(value.trim());
            doc.sections.entry(section.clone()).or_default().insert(key, value);
        }
        doc
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (section, entries) in &self.sections {
            out.push_str(&format!("[{section}]\n"));
            for (key, value) in entries {
                out.push_str(&format!("{} = {}\n", quote(key), quote(value)));
            }
            out.push('\n');
        }
        out
    }
}

fn unquote(value: &str) -> String {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

/// Quoting is used iff the key or value has leading/trailing whitespace
/// (including the empty string, which has nothing to anchor an unquoted
/// `key = ` line to).
fn quote(value: &str) -> String {
    if value.is_empty() || value.trim() != value {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}
