//! Comment side-channels: every `//` and `/*...*/` comment is
//! recorded against its source position, then scanned for the `LABEL`,
//! `NAME`, and `NOTE` directives that let model authors attach localized
//! metadata without a dedicated syntax.

use std::collections::HashMap;

use omc_core::SourceLoc;

#[cfg(test)]
#[path = "comments_tests.rs"]
mod comments_tests;

/// One parsed comment, keyed by where it starts. Line comments use
/// `column = 0` per §4.1 ("every `//`-comment keyed by `(file, line,
/// col=0)`"); block comments keep their real start column.
#[derive(Debug, Clone)]
pub struct Comment {
    pub loc: SourceLoc,
    pub text: String,
    pub is_block: bool,
}

/// A decoded side-channel directive found inside a comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideChannel {
    /// `LABEL(<sym>, <lang>) <text>`
    Label {
        symbol: String,
        lang: String,
        text: String,
    },
    /// `NAME(<sym>) <shortname>`
    Name { symbol: String, short_name: String },
    /// `NOTE(<sym>, <lang>) <text>` (may span multiple lines in a block comment)
    Note {
        symbol: String,
        lang: String,
        text: String,
        target: NoteTarget,
    },
}

/// Where a `NOTE` directive's text is routed, depending on the parse
/// context flags `is_fixed_parameter_value`/`is_scenario_parameter_value`
///.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTarget {
    Source,
    Input,
}

#[derive(Debug, Clone, Default)]
pub struct CommentTable {
    comments: Vec<Comment>,
}

impl CommentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter()
    }

    /// Nearest `//` comment whose line matches `line` exactly, used by pass
    /// `eAssignLabel` when there is no explicit `LABEL(...)` directive.
    pub fn trailing_comment_on_line(&self, line: u32) -> Option<&Comment> {
        self.comments
            .iter()
            .find(|c| !c.is_block && c.loc.line == line)
    }

    /// Decode every `LABEL`/`NAME`/`NOTE` directive across all recorded
    /// comments. `note_target` decides where bare `NOTE(...)` directives are
    /// routed (the parse context's `is_fixed_parameter_value` /
    /// `is_scenario_parameter_value` flag at the point the comment was seen).
    pub fn side_channels(&self, note_target: NoteTarget) -> Vec<SideChannel> {
        self.comments
            .iter()
            .flat_map(|c| parse_directives(&c.text, note_target))
            .collect()
    }
}

/// Directive syntax: `KEYWORD(arg1, arg2) rest-of-line-or-block-text`.
/// `NAME` takes one argument; `LABEL`/`NOTE` take two (symbol, language).
/// A comment may carry more than one directive (one per line of a block
/// comment), so this scans every line independently.
fn parse_directives(text: &str, note_target: NoteTarget) -> Vec<SideChannel> {
    use std::sync::OnceLock;

    static LABEL_RE: OnceLock<regex::Regex> = OnceLock::new();
    static NAME_RE: OnceLock<regex::Regex> = OnceLock::new();
    static NOTE_RE: OnceLock<regex::Regex> = OnceLock::new();

    let label_re = LABEL_RE.get_or_init(|| {
        regex::Regex::new(r"(?s)LABEL\(\s*([^,()]+?)\s*,\s*([^,()]+?)\s*\)\s*(.*)").unwrap()
    });
    let name_re =
        NAME_RE.get_or_init(|| regex::Regex::new(r"NAME\(\s*([^()]+?)\s*\)\s*(.*)").unwrap());
    let note_re = NOTE_RE.get_or_init(|| {
        regex::Regex::new(r"(?s)NOTE\(\s*([^,()]+?)\s*,\s*([^,()]+?)\s*\)\s*(.*)").unwrap()
    });

    let mut out = Vec::new();
    for line in text.lines() {
        let line = line.trim_start_matches(['*', ' ', '\t']);
        if let Some(caps) = label_re.captures(line) {
            out.push(SideChannel::Label {
                symbol: normalize_symbol(&caps[1]),
                lang: caps[2].trim().to_string(),
                text: caps[3].trim().to_string(),
            });
        } else if let Some(caps) = name_re.captures(line) {
            out.push(SideChannel::Name {
                symbol: normalize_symbol(&caps[1]),
                short_name: caps[2].trim().to_string(),
            });
        } else if let Some(caps) = note_re.captures(line) {
            out.push(SideChannel::Note {
                symbol: normalize_symbol(&caps[1]),
                lang: caps[2].trim().to_string(),
                text: caps[3].trim().to_string(),
                target: note_target,
            });
        }
    }
    out
}

/// `Entity.member` -> `Entity::member`.
fn normalize_symbol(symbol: &str) -> String {
    symbol.replace('.', "::")
}

/// Translatable string literals: the first argument of calls to `LT(...)`,
/// excluding any call whose containing file path looks like a bundled
/// runtime header (the compiler has no notion of "bundled" beyond a path
/// convention shared with the rest of the platform: anything under an
/// `include/` or `om/` directory).
pub fn is_bundled_runtime_header(path: &std::path::Path) -> bool {
    path.components().any(|c| {
        matches!(c.as_os_str().to_str(), Some("include") | Some("om"))
    })
}

/// Scans raw source text for `LT("...")` calls and returns the string
/// contents (without quotes). Used during lexing to populate the
/// translatable-message set that later becomes `<model>.message.ini`.
pub fn collect_translatable_strings(source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = source;
    while let Some(pos) = rest.find("LT(") {
        let after = &rest[pos + 3..];
        let trimmed = after.trim_start();
        if let Some(lit_end) = find_string_literal_end(trimmed) {
            let literal = &trimmed[1..lit_end];
            out.push(unescape(literal));
            rest = &trimmed[lit_end + 1..];
        } else {
            rest = after;
        }
    }
    out
}

fn find_string_literal_end(s: &str) -> Option<usize> {
    if !s.starts_with('"') {
        return None;
    }
    let mut chars = s.char_indices().skip(1);
    let mut escaped = false;
    for (i, c) in &mut chars {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Keyed registry used by `eAssignLabel`/metadata emission to look up a
/// symbol's explicit `LABEL`/`NAME`/`NOTE` directives by normalized symbol
/// name.
#[derive(Debug, Clone, Default)]
pub struct DirectiveIndex {
    pub labels: HashMap<String, Vec<(String, String)>>, // symbol -> [(lang, text)]
    pub names: HashMap<String, String>,                 // symbol -> short name
    pub notes: HashMap<String, Vec<(String, String, NoteTarget)>>, // symbol -> [(lang, text, target)]
}

impl DirectiveIndex {
    pub fn build(directives: &[SideChannel]) -> Self {
        let mut index = Self::default();
        for d in directives {
            match d {
                SideChannel::Label { symbol, lang, text } => index
                    .labels
                    .entry(symbol.clone())
                    .or_default()
                    .push((lang.clone(), text.clone())),
                SideChannel::Name { symbol, short_name } => {
                    index.names.insert(symbol.clone(), short_name.clone());
                }
                SideChannel::Note {
                    symbol,
                    lang,
                    text,
                    target,
                } => index
                    .notes
                    .entry(symbol.clone())
                    .or_default()
                    .push((lang.clone(), text.clone(), *target)),
            }
        }
        index
    }
}
