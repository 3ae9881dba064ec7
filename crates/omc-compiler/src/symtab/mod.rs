//! Symbol table: the global store of named symbols, keyed by the
//! unique name the lexer/parser/emitter all use (`Entity::member`, a bare
//! classification name, ...). Symbols are created lazily as a [`BaseSymbol`]
//! placeholder the first time a name is referenced, then *morphed* into a
//! concrete variant of [`Symbol`] once the declaring construct is parsed
//! (`lower::lower`). Morphing replaces the [`Symbol`] stored at a given
//! [`Name`] but never changes that `Name`, so any earlier-taken handle keeps
//! resolving to the live record.

use indexmap::IndexMap;
use omc_core::{Name, SourceLoc, TypeSymbol};

pub mod attribute;
pub mod entity;
pub mod entity_set;
pub mod event;
pub mod increment;
pub mod lower;
pub mod parameter;
pub mod table;


pub use attribute::{AttributeKind, AttributeSymbol, BuiltinKind};
pub use entity::EntitySymbol;
pub use entity_set::EntitySetSymbol;
pub use event::EventSymbol;
pub use increment::Increment;
pub use parameter::ParameterSymbol;
pub use table::{AccumulatorSymbol, DimensionSymbol, MeasureSymbol, TableKind, TableSymbol};

/// Metadata every symbol carries: unique name, optional short DB-legal
/// name (assigned by the SQL emitter, not this crate), per-language labels
/// and notes, and the source location of the declaration that last morphed
/// it.
#[derive(Debug, Clone)]
pub struct SymbolMeta {
    pub name: Name,
    pub db_name: Option<String>,
    /// Indexed by language index.
    pub labels: Vec<Option<String>>,
    pub notes: Vec<Option<String>>,
    pub loc: SourceLoc,
}

impl SymbolMeta {
    pub fn new(name: Name, loc: SourceLoc) -> Self {
        Self {
            name,
            db_name: None,
            labels: Vec::new(),
            notes: Vec::new(),
            loc,
        }
    }

    pub fn label(&self, lang: usize) -> Option<&str> {
        self.labels.get(lang).and_then(|l| l.as_deref())
    }

    pub fn set_label(&mut self, lang: usize, text: String) {
        if self.labels.len() <= lang {
            self.labels.resize(lang + 1, None);
        }
        self.labels[lang] = Some(text);
    }

    pub fn set_note(&mut self, lang: usize, text: String) {
        if self.notes.len() <= lang {
            self.notes.resize(lang + 1, None);
        }
        self.notes[lang] = Some(text);
    }
}

/// Placeholder created the first time a name is referenced before its
/// declaring construct has been parsed.
#[derive(Debug, Clone)]
pub struct BaseSymbol {
    pub meta: SymbolMeta,
}

#[derive(Debug, Clone)]
pub struct ClassificationSymbol {
    pub meta: SymbolMeta,
    pub enumerators: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RangeSymbol {
    pub meta: SymbolMeta,
    pub lower: i64,
    pub upper: i64,
}

impl RangeSymbol {
    pub fn size(&self) -> u32 {
        (self.upper - self.lower + 1).max(0) as u32
    }
}

#[derive(Debug, Clone)]
pub struct PartitionSymbol {
    pub meta: SymbolMeta,
    pub split_points: Vec<String>,
}

impl PartitionSymbol {
    /// A partition with N split points has N+1 intervals.
    pub fn size(&self) -> u32 {
        self.split_points.len() as u32 + 1
    }
}

/// The morphable symbol record. Every variant embeds its own
/// [`SymbolMeta`]; there is deliberately no shared base struct beyond that,
/// mirroring "morphing... replaces the polymorphic record" rather than
/// layering subtypes.
#[derive(Debug, Clone)]
pub enum Symbol {
    Base(BaseSymbol),
    Classification(ClassificationSymbol),
    Range(RangeSymbol),
    Partition(PartitionSymbol),
    Entity(EntitySymbol),
    Attribute(AttributeSymbol),
    Event(EventSymbol),
    Table(TableSymbol),
    EntitySet(EntitySetSymbol),
    Parameter(ParameterSymbol),
}

impl Symbol {
    pub fn meta(&self) -> &SymbolMeta {
        match self {
            Symbol::Base(s) => &s.meta,
            Symbol::Classification(s) => &s.meta,
            Symbol::Range(s) => &s.meta,
            Symbol::Partition(s) => &s.meta,
            Symbol::Entity(s) => &s.meta,
            Symbol::Attribute(s) => &s.meta,
            Symbol::Event(s) => &s.meta,
            Symbol::Table(s) => &s.meta,
            Symbol::EntitySet(s) => &s.meta,
            Symbol::Parameter(s) => &s.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut SymbolMeta {
        match self {
            Symbol::Base(s) => &mut s.meta,
            Symbol::Classification(s) => &mut s.meta,
            Symbol::Range(s) => &mut s.meta,
            Symbol::Partition(s) => &mut s.meta,
            Symbol::Entity(s) => &mut s.meta,
            Symbol::Attribute(s) => &mut s.meta,
            Symbol::Event(s) => &mut s.meta,
            Symbol::Table(s) => &mut s.meta,
            Symbol::EntitySet(s) => &mut s.meta,
            Symbol::Parameter(s) => &mut s.meta,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Symbol::Base(_))
    }

    /// The `TypeSymbol` this symbol contributes to the global type
    /// namespace, for resolving a member's declared type *name* to a
    /// `TypeSymbol` in pass `eCreateForeignTypes`. Only the name-carrying
    /// declarations (classification/range/partition/entity) participate.
    pub fn as_named_type(&self) -> Option<TypeSymbol> {
        match self {
            Symbol::Classification(s) => Some(TypeSymbol::Classification(s.meta.name)),
            Symbol::Range(s) => Some(TypeSymbol::Range(s.meta.name)),
            Symbol::Partition(s) => Some(TypeSymbol::Partition(s.meta.name)),
            Symbol::Entity(s) => Some(TypeSymbol::Entity(s.meta.name)),
            _ => None,
        }
    }

    /// Sort key used wherever the symbol map must be iterated in a
    /// deterministic order to break cycles: kind first, then unique name.
    pub fn kind_rank(&self) -> u8 {
        match self {
            Symbol::Base(_) => 0,
            Symbol::Classification(_) => 1,
            Symbol::Range(_) => 2,
            Symbol::Partition(_) => 3,
            Symbol::Entity(_) => 4,
            Symbol::Attribute(_) => 5,
            Symbol::Event(_) => 6,
            Symbol::Table(_) => 7,
            Symbol::EntitySet(_) => 8,
            Symbol::Parameter(_) => 9,
        }
    }
}

/// Global store of symbols keyed by interned [`Name`], plus the
/// type-change counter bumped on every morph.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<Name, Symbol>,
    type_change_counter: u64,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `name`, creating a [`BaseSymbol`] placeholder if it does
    /// not exist yet.
    pub fn get_or_create_base(&mut self, name: Name, loc: SourceLoc) -> &mut Symbol {
        self.symbols
            .entry(name)
            .or_insert_with(|| Symbol::Base(BaseSymbol { meta: SymbolMeta::new(name, loc) }))
    }

    /// Replaces whatever is stored at `name` with `symbol`, bumping the
    /// type-change counter. Used by the morphing constructor - the
    /// replaced record's `Name` is unchanged, satisfying morphing
    /// stability.
    pub fn morph(&mut self, name: Name, symbol: Symbol) {
        self.symbols.insert(name, symbol);
        self.type_change_counter += 1;
    }

    pub fn get(&self, name: Name) -> Option<&Symbol> {
        self.symbols.get(&name)
    }

    pub fn get_mut(&mut self, name: Name) -> Option<&mut Symbol> {
        self.symbols.get_mut(&name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.symbols.contains_key(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Symbol)> {
        self.symbols.iter().map(|(n, s)| (*n, s))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Name, &mut Symbol)> {
        self.symbols.iter_mut().map(|(n, s)| (*n, s))
    }

    pub fn names(&self) -> Vec<Name> {
        self.symbols.keys().copied().collect()
    }

    /// Names in the deterministic `(kind, name)` order used for emission
    ///. `Name` itself already orders by intern index, which is stable
    /// for a given parse order, but is not alphabetic; emitters that need
    /// alphabetic stability should sort by the resolved string instead.
    pub fn names_by_kind_then_name(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.symbols.keys().copied().collect();
        names.sort_by_key(|n| (self.symbols[n].kind_rank(), *n));
        names
    }

    pub fn type_change_counter(&self) -> u64 {
        self.type_change_counter
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Base-placeholder symbols still present once resolution should be
    /// complete.
    pub fn base_placeholders(&self) -> Vec<Name> {
        self.symbols
            .iter()
            .filter(|(_, s)| s.is_base())
            .map(|(n, _)| *n)
            .collect()
    }
}
