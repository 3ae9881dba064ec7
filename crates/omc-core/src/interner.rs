//! String interning for symbol names.
//!
//! The symbol table keys every symbol by its unique name (often
//! `Entity::member`). Interning turns those names into cheap `Copy` handles
//! so that symbol cross-references (the "pointer to a pointer slot" idiom
//! from the original implementation) can be stored as a stable integer
//! instead of a name that has to be re-hashed on every lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "interner_tests.rs"]
mod interner_tests;

/// A lightweight handle to an interned name. Stable across symbol morphing:
/// the name never changes identity even when the symbol it refers to is
/// reclassified into a more specific subtype.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, serde::Serialize)]
pub struct Name(u32);

impl Name {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Construct from a raw index. Only meaningful for names obtained from
    /// the same `Interner` that produced them.
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

/// Deduplicates symbol-name strings and hands out `Name` handles.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    map: HashMap<String, Name>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        let name = Name(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.map.insert(s.to_owned(), name);
        name
    }

    /// Intern the qualified `Entity::member` name for an entity member.
    pub fn intern_member(&mut self, entity: &str, member: &str) -> Name {
        self.intern(&format!("{entity}::{member}"))
    }

    #[inline]
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.0 as usize]
    }

    #[inline]
    pub fn try_resolve(&self, name: Name) -> Option<&str> {
        self.strings.get(name.0 as usize).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (Name(i as u32), s.as_str()))
    }
}

/// Interned source file path, used by `SourceLoc` so locations stay `Copy`.
#[derive(Debug, Clone, Default)]
pub struct FileTable {
    map: HashMap<PathBuf, u32>,
    paths: Vec<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FileId(u32);

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, path: &Path) -> FileId {
        if let Some(&id) = self.map.get(path) {
            return FileId(id);
        }
        let id = self.paths.len() as u32;
        self.paths.push(path.to_path_buf());
        self.map.insert(path.to_path_buf(), id);
        FileId(id)
    }

    pub fn resolve(&self, id: FileId) -> &Path {
        &self.paths[id.0 as usize]
    }
}
