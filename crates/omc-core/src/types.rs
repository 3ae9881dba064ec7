//! The type lattice described in §3: every attribute, parameter dimension,
//! and table measure carries one of these types. `Unknown` is a transient
//! placeholder that pass `eResolveDataTypes` must eliminate before code
//! generation.

use crate::interner::Name;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

/// The built-in numeric flavors. These all share SQL and C++ representation
/// rules but are kept distinct because `Time` and `Counter` participate in
/// different default-initializer logic than plain `Int`/`Double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum NumericKind {
    Int,
    Double,
    Time,
    Counter,
    Real,
    Float,
    Bool,
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    UInt,
    Long,
    ULong,
    LLong,
    ULLong,
}

impl NumericKind {
    /// C++ spelling used by the emitter when declaring the data member.
    pub fn cpp_name(self) -> &'static str {
        match self {
            NumericKind::Int => "int",
            NumericKind::Double => "double",
            NumericKind::Time => "Time",
            NumericKind::Counter => "counter",
            NumericKind::Real => "real",
            NumericKind::Float => "float",
            NumericKind::Bool => "bool",
            NumericKind::Char => "char",
            NumericKind::SChar => "schar",
            NumericKind::UChar => "uchar",
            NumericKind::Short => "short",
            NumericKind::UShort => "ushort",
            NumericKind::UInt => "uint",
            NumericKind::Long => "long",
            NumericKind::ULong => "ulong",
            NumericKind::LLong => "llong",
            NumericKind::ULLong => "ullong",
        }
    }
}

/// A resolved or pending type for an attribute, parameter, or table
/// dimension/measure. `Classification`/`Range`/`Partition`/`Entity`/`Link`/
/// `Multilink` carry the `Name` of the enumeration or entity they refer to,
/// rather than embedding the full record, so that `TypeSymbol` stays cheap
/// and `Copy`-able; the symbol table resolves the `Name` to the live record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TypeSymbol {
    Numeric(NumericKind),
    Bool,
    String,
    Time,
    Classification(Name),
    Range(Name),
    Partition(Name),
    /// The union of Classification/Range/Partition types, used where the
    /// spec allows any of the three ("Enumeration").
    Enumeration(Name),
    Entity(Name),
    Link(Name),
    Multilink(Name),
    /// An opaque C++ type the compiler does not model further (e.g. a
    /// developer-supplied struct used only by hand-written code).
    Foreign(Name),
    /// Placeholder assigned in pass `eCreateForeignTypes`/on first
    /// reference; must not survive pass `eResolveDataTypes`.
    Unknown,
}

impl TypeSymbol {
    pub fn is_unknown(self) -> bool {
        matches!(self, TypeSymbol::Unknown)
    }

    pub fn is_enumeration(self) -> bool {
        matches!(
            self,
            TypeSymbol::Classification(_)
                | TypeSymbol::Range(_)
                | TypeSymbol::Partition(_)
                | TypeSymbol::Enumeration(_)
        )
    }

    /// The enumeration `Name` a dimension attribute's type implies, if any.
    /// Used to populate `DimensionSymbol::enumeration` (§3 invariant:
    /// "Dimension -> (Attribute XOR Enumeration). If Attribute, enumeration
    /// is inferred from attribute type.").
    pub fn implied_enumeration(self) -> Option<Name> {
        match self {
            TypeSymbol::Classification(n)
            | TypeSymbol::Range(n)
            | TypeSymbol::Partition(n)
            | TypeSymbol::Enumeration(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_link(self) -> bool {
        matches!(self, TypeSymbol::Link(_))
    }

    pub fn is_multilink(self) -> bool {
        matches!(self, TypeSymbol::Multilink(_))
    }

    pub fn is_entity(self) -> bool {
        matches!(self, TypeSymbol::Entity(_))
    }

    /// C++ spelling for the type, used by the emitter for data-member
    /// declarations. Enumeration/entity/link names are resolved by the
    /// caller (which has access to the interner); this only handles the
    /// types whose spelling is fixed.
    pub fn cpp_builtin_name(self) -> Option<&'static str> {
        match self {
            TypeSymbol::Numeric(kind) => Some(kind.cpp_name()),
            TypeSymbol::Bool => Some("bool"),
            TypeSymbol::String => Some("string"),
            TypeSymbol::Time => Some("Time"),
            _ => None,
        }
    }
}
