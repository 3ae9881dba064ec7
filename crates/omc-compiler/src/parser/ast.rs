//! Declaration AST produced by the grammar driver. Each variant maps
//! to one kind of top-level model construct; field names mirror the
//! vocabulary used there so the symbol-table lowering pass
//! (`symtab::lower`) reads as a direct translation.

use omc_core::SourceLoc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    ModelType(ModelTypeDecl),
    Languages(LanguagesDecl),
    Options(OptionsDecl),
    Entity(EntityDecl),
    Table(TableDecl),
    EntitySet(EntitySetDecl),
    Parameter(ParameterDecl),
    Classification(ClassificationDecl),
    Range(RangeDecl),
    Partition(PartitionDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTypeDecl {
    pub case_based: bool,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagesDecl {
    pub codes: Vec<String>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsDecl {
    /// Raw `key = value` pairs, further interpreted by the CLI's option
    /// parsing - `event_trace`, `censor_event_time`,
    /// `weighted_tabulation`, `index_errors`, etc.
    pub entries: Vec<(String, String)>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDecl {
    pub name: String,
    pub members: Vec<EntityMember>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityMember {
    Attribute(AttributeDecl),
    Event(EventDecl),
    Hook(HookDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeDeclKind {
    /// Plain declared member: `int age;` - becomes a Simple attribute,
    /// unless the type name matches a built-in (`time`, `age`, ...).
    Simple,
    /// `identity` attributes: `identity alive = ...;`
    Identity,
    /// Derived attributes: durations, counts, self-scheduling, lagged.
    /// `derived_kind` carries which (e.g. "duration", "self_scheduling_int").
    Derived { derived_kind: String },
    Link,
    Multilink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: String,
    pub type_name: String,
    pub kind: AttributeDeclKind,
    /// Expression text for `Simple` initializers or `Identity`/`Derived`
    /// bodies; opaque to the parser, interpreted later when side-effects
    /// code is generated.
    pub expr: Option<String>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDecl {
    pub name: String,
    pub time_fn: String,
    pub implement_fn: String,
    pub priority: i64,
    /// `Some(_)` if the event carries an int payload (`MemoryEvent`).
    pub memory: bool,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDecl {
    pub from_event: String,
    pub to_function: String,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDecl {
    pub name: String,
    pub is_derived: bool,
    pub dimensions: Vec<DimensionDecl>,
    pub measures: Vec<MeasureDecl>,
    pub filter: Option<String>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionDecl {
    /// Either an attribute name (enumeration inferred from its type) or,
    /// for derived tables, a directly-named enumeration.
    pub attribute_or_enum: String,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureDecl {
    pub name: String,
    /// `sum|min|max|gini|Pxx|...`
    pub accumulator: String,
    /// `value_in|value_out|delta|nz_value_in|...`
    pub increment_kind: String,
    /// `interval|event|unit`
    pub timing: String,
    pub attribute: String,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySetDecl {
    pub name: String,
    pub entity: String,
    pub dimensions: Vec<DimensionDecl>,
    pub filter: Option<String>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDecl {
    pub name: String,
    pub type_name: String,
    /// Dimension enumeration names, in declared order (rank = len()).
    pub dimensions: Vec<String>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationDecl {
    pub name: String,
    pub enumerators: Vec<String>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDecl {
    pub name: String,
    pub lower: i64,
    pub upper: i64,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDecl {
    pub name: String,
    pub split_points: Vec<String>,
    pub loc: SourceLoc,
}
