//! DB-legal short-name sanitization and case-insensitive uniqueness
//! enforcement (§3: "Every dimension acquires a short DB-legal,
//! case-insensitively-unique column name (<=30 chars, alphanumeric+`_`, not
//! a SQL reserved word, not starting with a digit)."). Shared by the SQL
//! emitter (table/parameter/dimension names) and the C++ markup pass
//! (array member names must match the same rules to be cross-checked).

use indexmap::IndexSet;

#[cfg(test)]
#[path = "ident_tests.rs"]
mod ident_tests;

/// Replace every character that is not alphanumeric or `_` with `_`, and
/// prefix with `_` if the result would start with a digit.
pub fn sanitize(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        out.push('_');
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Truncate `s` to at most `max_len` characters by cutting out the middle,
/// preserving a readable prefix and suffix (§4.7 DB-name assignment:
/// "truncated from the middle (not the end) when necessary").
pub fn truncate_middle(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len || max_len == 0 {
        return s.chars().take(max_len).collect();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let chars: Vec<char> = s.chars().collect();
    let keep = max_len - 3;
    let head = keep - keep / 2;
    let tail = keep - head;
    let mut out = String::with_capacity(max_len);
    out.extend(&chars[..head]);
    out.push_str("...");
    out.extend(&chars[chars.len() - tail..]);
    out
}

/// Case-insensitive uniqueness registry: on collision, suffixes the name
/// with an increasing index, shortening the base name if the suffixed form
/// would exceed `max_len` (§8 S4: "one remains `Age` and the other becomes
/// `Age<index>` (or, if that would exceed 30 chars, the tail is replaced by
/// the index)").
#[derive(Debug, Default)]
pub struct UniqueNames {
    seen: IndexSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name to actually use, and whether it differed from
    /// `candidate`.
    pub fn make_unique(&mut self, candidate: &str, max_len: usize) -> (String, bool) {
        let folded = candidate.to_ascii_lowercase();
        if !self.seen.contains(&folded) {
            self.seen.insert(folded);
            return (candidate.to_string(), false);
        }

        for index in 1u32.. {
            let suffix = index.to_string();
            let combined = if candidate.len() + suffix.len() <= max_len {
                format!("{candidate}{suffix}")
            } else {
                let keep = max_len.saturating_sub(suffix.len());
                format!("{}{suffix}", truncate_tail(candidate, keep))
            };
            let folded = combined.to_ascii_lowercase();
            if !self.seen.contains(&folded) {
                self.seen.insert(folded);
                return (combined, true);
            }
        }
        unreachable!("u32 index space exhausted")
    }
}

fn truncate_tail(s: &str, keep: usize) -> String {
    s.chars().take(keep).collect()
}

/// Reserved-word check is provider specific (the SQL emitter owns the word
/// lists per dialect); this is the shared entry point a dialect's word list
/// is consulted through so callers don't need to know the representation.
pub trait ReservedWords {
    fn is_reserved(&self, candidate: &str) -> bool;
}

impl<S: AsRef<str>> ReservedWords for &[S] {
    fn is_reserved(&self, candidate: &str) -> bool {
        self.iter().any(|w| w.as_ref().eq_ignore_ascii_case(candidate))
    }
}
