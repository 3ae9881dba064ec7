//! Content digests and DB-legal naming. Digests are computed
//! over a canonicalized, locale-neutral string assembly of a symbol's
//! structural fields, then hashed with MD5 (the digest itself) or CRC32
//! (folded into a short DB identifier).

use omc_core::ident::truncate_middle;

use crate::meta::{ModelMeta, ParameterMeta, TableMeta, TypeKind, TypeMeta};

/// Joins structural fields with a fixed separator that never appears in a
/// field value on its own, mirroring "a neutral stream that ignores
/// locale": no locale-sensitive formatting (no grouping separators,
/// no locale-specific decimal points) ever enters the string.
fn canonical(fields: &[&str]) -> String {
    fields.join("\x1f")
}

pub fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

pub fn crc32_hex(input: &str) -> String {
    format!("{:08x}", crc32fast::hash(input.as_bytes()))
}

fn type_kind_tag(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Bool => "bool".to_string(),
        TypeKind::String => "string".to_string(),
        TypeKind::Numeric(n) => format!("numeric:{n}"),
        TypeKind::Time => "time".to_string(),
        TypeKind::Classification { enumerators } => {
            format!("classification:{}", enumerators.join(","))
        }
        TypeKind::Range { lower, upper } => format!("range:{lower}:{upper}"),
        TypeKind::Partition { split_points } => format!("partition:{}", split_points.join(",")),
    }
}

/// Digest over one entry of the global type dictionary.
pub fn type_digest(type_meta: &TypeMeta) -> String {
    let tag = type_kind_tag(&type_meta.kind);
    md5_hex(&canonical(&[&type_meta.name, &tag]))
}

/// Digest over one parameter's dictionary + dimension rows.
pub fn parameter_digest(parameter: &ParameterMeta) -> String {
    let mut fields = vec![
        parameter.name.clone(),
        parameter.type_name.clone(),
        parameter.rank().to_string(),
    ];
    for dim in &parameter.dimensions {
        fields.push(format!("{}:{}:{}", dim.short_name, dim.type_name, dim.size));
    }
    let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
    md5_hex(&canonical(&refs))
}

/// Digest over one table's dictionary + dimension/accumulator/measure rows.
pub fn table_digest(table: &TableMeta) -> String {
    let mut fields = vec![table.name.clone(), table.rank().to_string()];
    for dim in &table.dimensions {
        fields.push(format!("{}:{}:{}", dim.short_name, dim.type_name, dim.size));
    }
    for acc in &table.accumulators {
        fields.push(format!(
            "{}:{}:{}:{}",
            acc.name, acc.accumulator, acc.increment_kind, acc.timing
        ));
    }
    for measure in &table.measures {
        fields.push(format!("{}:{}", measure.name, measure.expr));
    }
    let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
    md5_hex(&canonical(&refs))
}

/// Model digest: folds in every type/parameter/table digest plus the
/// model's own identity, so that a change to any constituent part changes
/// the model digest.
pub fn model_digest(
    model: &ModelMeta,
    type_digests: &[String],
    parameter_digests: &[String],
    table_digests: &[String],
) -> String {
    let mut fields = vec![model.name.clone(), model.version.clone()];
    fields.extend(type_digests.iter().cloned());
    fields.extend(parameter_digests.iter().cloned());
    fields.extend(table_digests.iter().cloned());
    let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
    md5_hex(&canonical(&refs))
}

/// The `<kind>` token in `<prefix>_<kind>_<suffix>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    RunParameter,
    Workset,
    Accumulator,
    Value,
}

impl NameKind {
    fn char(self) -> char {
        match self {
            NameKind::RunParameter => 'p',
            NameKind::Workset => 'w',
            NameKind::Accumulator => 'a',
            NameKind::Value => 'v',
        }
    }
}

/// Assigns a DB table/view name of the form `<prefix>_<kind>_<suffix>`
///: `suffix` is the digest's CRC32 in 8 lowercase hex chars,
/// `prefix` is `short_name` sanitized and truncated from the middle to fit
/// the remaining budget under `max_len`. The two literal underscores and
/// the one-character `<kind>` token are subtracted from the budget along
/// with the 8-char suffix, so the returned name never exceeds `max_len`.
pub fn assign_db_name(short_name: &str, digest: &str, kind: NameKind, max_len: usize) -> String {
    let suffix = crc32_hex(digest);
    let fixed = 2 /* underscores */ + 1 /* kind */ + suffix.len();
    let prefix_budget = max_len.saturating_sub(fixed);
    let sanitized = omc_core::ident::sanitize(short_name);
    // `truncate_middle` splices in a `...` marker, which is not itself
    // SQL-safe; re-sanitize so the final identifier stays alphanumeric+`_`.
    let prefix = omc_core::ident::sanitize(&truncate_middle(&sanitized, prefix_budget));
    format!("{prefix}_{}_{suffix}", kind.char())
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod digest_tests;
