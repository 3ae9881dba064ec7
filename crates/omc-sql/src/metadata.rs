//! Create-model SQL emitter: the idempotent INSERT script
//! that populates a model's row set in the openM++ metadata schema.
//!
//! Every dictionary row (`model_dic`, `type_dic`, `parameter_dic`,
//! `table_dic`) is minted through the shared `id_lst` Hid counter: an
//! `UPDATE ... CASE WHEN NOT EXISTS (digest match) THEN id_value + 1 ELSE
//! id_value END` followed by an `INSERT ... WHERE NOT EXISTS (same digest
//! match)`, so a row with a given digest is created at most once no matter
//! how many times the script runs. Every child row (text,
//! dimension, accumulator, measure) looks its parent's Hid up by digest
//! rather than trusting the just-minted `id_lst` value, since `id_lst`
//! keeps advancing for later siblings in the same script; each child row
//! then carries its own `NOT EXISTS` guard keyed on that Hid plus its own
//! sub-key, so a rerun that only adds new types/parameters/tables leaves
//! previously emitted rows untouched.

use crate::dialect::Provider;
use crate::digest::{model_digest, parameter_digest, table_digest, type_digest};
use crate::meta::{ModelKind, ModelMeta, ParameterMeta, TableMeta, TypeKind, TypeMeta};

fn escape(s: &str) -> String {
    s.replace('\'', "''")
}

fn lit(s: &str) -> String {
    format!("'{}'", escape(s))
}

/// Mints (or reuses) a dictionary row's Hid via the shared `id_lst`
/// counter, guarded by `digest_guard` (a `SELECT 1 FROM ...` matching an
/// existing row with the same digest).
fn mint_hid(hid_key: &str, table: &str, columns: &[&str], values: &[String], digest_guard: &str) -> String {
    format!(
        "UPDATE id_lst SET id_value = CASE WHEN NOT EXISTS ({digest_guard}) THEN id_value + 1 ELSE id_value END WHERE id_key = {key};\n\
INSERT INTO {table} ({cols}) SELECT {vals} FROM id_lst IL WHERE IL.id_key = {key} AND NOT EXISTS ({digest_guard});\n",
        key = lit(hid_key),
        cols = columns.join(", "),
        vals = values.join(", "),
    )
}

/// A child row tied to an already-minted Hid: guarded by its own
/// `NOT EXISTS` check rather than the parent's digest, so siblings of an
/// existing parent can still be added idempotently one at a time.
fn child_insert(table: &str, columns: &[&str], values: &[String], row_guard: &str) -> String {
    format!(
        "INSERT INTO {table} ({cols}) SELECT {vals} WHERE NOT EXISTS ({row_guard});\n",
        cols = columns.join(", "),
        vals = values.join(", "),
    )
}

fn model_hid_lookup(model_digest_value: &str) -> String {
    format!("SELECT model_id FROM model_dic WHERE model_digest = {}", lit(model_digest_value))
}

fn type_hid_lookup(digest: &str) -> String {
    format!("SELECT type_hid FROM type_dic WHERE type_digest = {}", lit(digest))
}

fn parameter_hid_lookup(digest: &str) -> String {
    format!("SELECT parameter_hid FROM parameter_dic WHERE parameter_digest = {}", lit(digest))
}

fn table_hid_lookup(digest: &str) -> String {
    format!("SELECT table_hid FROM table_dic WHERE table_digest = {}", lit(digest))
}

fn emit_model_dic(model: &ModelMeta, digest: &str) -> String {
    let kind = match model.kind {
        ModelKind::CaseBased => 0,
        ModelKind::TimeBased => 1,
    };
    let guard = format!("SELECT 1 FROM model_dic WHERE model_digest = {}", lit(digest));
    mint_hid(
        "model_hid",
        "model_dic",
        &["model_id", "model_name", "model_digest", "model_type", "model_ver"],
        &[
            "IL.id_value".to_string(),
            lit(&model.name),
            lit(digest),
            kind.to_string(),
            lit(&model.version),
        ],
        &guard,
    )
}

fn emit_model_dic_txt(model: &ModelMeta, digest: &str) -> String {
    let model_id = model_hid_lookup(digest);
    let mut sql = String::new();
    for lang in &model.languages {
        let guard = format!(
            "SELECT 1 FROM model_dic_txt WHERE model_id = ({model_id}) AND lang_code = {}",
            lit(&lang.code)
        );
        sql.push_str(&child_insert(
            "model_dic_txt",
            &["model_id", "lang_code", "descr"],
            &[format!("({model_id})"), lit(&lang.code), lit(&model.name)],
            &guard,
        ));
    }
    sql
}

fn type_kind_code(kind: &TypeKind) -> i32 {
    match kind {
        TypeKind::Bool => 0,
        TypeKind::String => 1,
        TypeKind::Numeric(_) => 2,
        TypeKind::Time => 3,
        TypeKind::Classification { .. } => 4,
        TypeKind::Range { .. } => 5,
        TypeKind::Partition { .. } => 6,
    }
}

fn emit_type(model_digest_value: &str, type_meta: &TypeMeta) -> String {
    let digest = type_digest(type_meta);
    let mut sql = String::new();

    let guard = format!("SELECT 1 FROM type_dic WHERE type_digest = {}", lit(&digest));
    sql.push_str(&mint_hid(
        "type_hid",
        "type_dic",
        &["type_hid", "type_name", "type_digest", "type_kind"],
        &[
            "IL.id_value".to_string(),
            lit(&type_meta.name),
            lit(&digest),
            type_kind_code(&type_meta.kind).to_string(),
        ],
        &guard,
    ));

    let hid = type_hid_lookup(&digest);
    let model_id = model_hid_lookup(model_digest_value);
    let junction_guard = format!(
        "SELECT 1 FROM model_type_dic WHERE model_id = ({model_id}) AND type_hid = ({hid})"
    );
    sql.push_str(&child_insert(
        "model_type_dic",
        &["model_id", "type_hid"],
        &[format!("({model_id})"), format!("({hid})")],
        &junction_guard,
    ));

    let txt_guard = format!("SELECT 1 FROM type_dic_txt WHERE type_hid = ({hid}) AND lang_code = 'EN'");
    sql.push_str(&child_insert(
        "type_dic_txt",
        &["type_hid", "lang_code", "descr"],
        &[format!("({hid})"), lit("EN"), lit(&type_meta.name)],
        &txt_guard,
    ));

    if let TypeKind::Classification { enumerators } = &type_meta.kind {
        for (enum_id, name) in enumerators.iter().enumerate() {
            let enum_guard = format!(
                "SELECT 1 FROM type_enum_lst WHERE type_hid = ({hid}) AND enum_id = {enum_id}"
            );
            sql.push_str(&child_insert(
                "type_enum_lst",
                &["type_hid", "enum_id", "enum_name"],
                &[format!("({hid})"), enum_id.to_string(), lit(name)],
                &enum_guard,
            ));
            let enum_txt_guard = format!(
                "SELECT 1 FROM type_enum_txt WHERE type_hid = ({hid}) AND enum_id = {enum_id} AND lang_code = 'EN'"
            );
            sql.push_str(&child_insert(
                "type_enum_txt",
                &["type_hid", "enum_id", "lang_code", "descr"],
                &[format!("({hid})"), enum_id.to_string(), lit("EN"), lit(name)],
                &enum_txt_guard,
            ));
        }
    }
    sql
}

fn emit_parameter(model_digest_value: &str, parameter: &ParameterMeta, order: usize) -> String {
    let digest = parameter_digest(parameter);
    let mut sql = String::new();

    let guard = format!("SELECT 1 FROM parameter_dic WHERE parameter_digest = {}", lit(&digest));
    sql.push_str(&mint_hid(
        "parameter_hid",
        "parameter_dic",
        &["parameter_hid", "parameter_name", "parameter_digest", "parameter_rank", "parameter_type"],
        &[
            "IL.id_value".to_string(),
            lit(&parameter.name),
            lit(&digest),
            parameter.rank().to_string(),
            lit(&parameter.type_name),
        ],
        &guard,
    ));

    let hid = parameter_hid_lookup(&digest);
    let model_id = model_hid_lookup(model_digest_value);
    let junction_guard = format!(
        "SELECT 1 FROM model_parameter_dic WHERE model_id = ({model_id}) AND parameter_hid = ({hid})"
    );
    sql.push_str(&child_insert(
        "model_parameter_dic",
        &["model_id", "model_parameter_id", "parameter_hid"],
        &[format!("({model_id})"), order.to_string(), format!("({hid})")],
        &junction_guard,
    ));

    let txt_guard = format!("SELECT 1 FROM parameter_dic_txt WHERE parameter_hid = ({hid}) AND lang_code = 'EN'");
    sql.push_str(&child_insert(
        "parameter_dic_txt",
        &["parameter_hid", "lang_code", "descr"],
        &[format!("({hid})"), lit("EN"), lit(&parameter.label)],
        &txt_guard,
    ));

    for (dim_id, dim) in parameter.dimensions.iter().enumerate() {
        let dims_guard = format!(
            "SELECT 1 FROM parameter_dims WHERE parameter_hid = ({hid}) AND dim_id = {dim_id}"
        );
        sql.push_str(&child_insert(
            "parameter_dims",
            &["parameter_hid", "dim_id", "dim_name", "type_name"],
            &[format!("({hid})"), dim_id.to_string(), lit(&dim.short_name), lit(&dim.type_name)],
            &dims_guard,
        ));
        let dims_txt_guard = format!(
            "SELECT 1 FROM parameter_dims_txt WHERE parameter_hid = ({hid}) AND dim_id = {dim_id} AND lang_code = 'EN'"
        );
        sql.push_str(&child_insert(
            "parameter_dims_txt",
            &["parameter_hid", "dim_id", "lang_code", "descr"],
            &[format!("({hid})"), dim_id.to_string(), lit("EN"), lit(&dim.short_name)],
            &dims_txt_guard,
        ));
    }
    sql
}

fn emit_table(model_digest_value: &str, table: &TableMeta, order: usize) -> String {
    let digest = table_digest(table);
    let mut sql = String::new();

    let guard = format!("SELECT 1 FROM table_dic WHERE table_digest = {}", lit(&digest));
    sql.push_str(&mint_hid(
        "table_hid",
        "table_dic",
        &["table_hid", "table_name", "table_digest", "table_rank"],
        &[
            "IL.id_value".to_string(),
            lit(&table.name),
            lit(&digest),
            table.rank().to_string(),
        ],
        &guard,
    ));

    let hid = table_hid_lookup(&digest);
    let model_id = model_hid_lookup(model_digest_value);
    let junction_guard = format!(
        "SELECT 1 FROM model_table_dic WHERE model_id = ({model_id}) AND table_hid = ({hid})"
    );
    sql.push_str(&child_insert(
        "model_table_dic",
        &["model_id", "model_table_id", "table_hid"],
        &[format!("({model_id})"), order.to_string(), format!("({hid})")],
        &junction_guard,
    ));

    let txt_guard = format!("SELECT 1 FROM table_dic_txt WHERE table_hid = ({hid}) AND lang_code = 'EN'");
    sql.push_str(&child_insert(
        "table_dic_txt",
        &["table_hid", "lang_code", "descr"],
        &[format!("({hid})"), lit("EN"), lit(&table.label)],
        &txt_guard,
    ));

    for (dim_id, dim) in table.dimensions.iter().enumerate() {
        let dims_guard = format!(
            "SELECT 1 FROM table_dims WHERE table_hid = ({hid}) AND dim_id = {dim_id}"
        );
        sql.push_str(&child_insert(
            "table_dims",
            &["table_hid", "dim_id", "dim_name", "type_name"],
            &[format!("({hid})"), dim_id.to_string(), lit(&dim.short_name), lit(&dim.type_name)],
            &dims_guard,
        ));
        let dims_txt_guard = format!(
            "SELECT 1 FROM table_dims_txt WHERE table_hid = ({hid}) AND dim_id = {dim_id} AND lang_code = 'EN'"
        );
        sql.push_str(&child_insert(
            "table_dims_txt",
            &["table_hid", "dim_id", "lang_code", "descr"],
            &[format!("({hid})"), dim_id.to_string(), lit("EN"), lit(&dim.short_name)],
            &dims_txt_guard,
        ));
    }

    for (acc_id, acc) in table.accumulators.iter().enumerate() {
        let acc_guard = format!(
            "SELECT 1 FROM table_acc WHERE table_hid = ({hid}) AND acc_id = {acc_id}"
        );
        sql.push_str(&child_insert(
            "table_acc",
            &["table_hid", "acc_id", "acc_name", "acc_src", "is_derived"],
            &[
                format!("({hid})"),
                acc_id.to_string(),
                lit(&acc.name),
                lit(&format!("{} {}", acc.accumulator, acc.timing)),
                "0".to_string(),
            ],
            &acc_guard,
        ));
        let acc_txt_guard = format!(
            "SELECT 1 FROM table_acc_txt WHERE table_hid = ({hid}) AND acc_id = {acc_id} AND lang_code = 'EN'"
        );
        sql.push_str(&child_insert(
            "table_acc_txt",
            &["table_hid", "acc_id", "lang_code", "descr"],
            &[format!("({hid})"), acc_id.to_string(), lit("EN"), lit(&acc.name)],
            &acc_txt_guard,
        ));
    }

    let acc_names: std::collections::HashSet<String> =
        table.accumulators.iter().map(|a| a.name.clone()).collect();
    let dim_names: Vec<String> = table.dimensions.iter().map(|d| d.short_name.clone()).collect();
    let acc_table = format!("ta_{}", table.short_name);

    for (expr_id, measure) in table.measures.iter().enumerate() {
        let expr_sql = crate::aggregation::rewrite(&measure.expr, &acc_table, &dim_names, &acc_names)
            .unwrap_or_else(|err| format!("-- malformed aggregation: {err}"));
        let expr_guard = format!(
            "SELECT 1 FROM table_expr WHERE table_hid = ({hid}) AND expr_id = {expr_id}"
        );
        sql.push_str(&child_insert(
            "table_expr",
            &["table_hid", "expr_id", "expr_name", "expr_src", "expr_sql"],
            &[
                format!("({hid})"),
                expr_id.to_string(),
                lit(&measure.name),
                lit(&measure.expr),
                lit(&expr_sql),
            ],
            &expr_guard,
        ));
        let expr_txt_guard = format!(
            "SELECT 1 FROM table_expr_txt WHERE table_hid = ({hid}) AND expr_id = {expr_id} AND lang_code = 'EN'"
        );
        sql.push_str(&child_insert(
            "table_expr_txt",
            &["table_hid", "expr_id", "lang_code", "descr"],
            &[format!("({hid})"), expr_id.to_string(), lit("EN"), lit(&measure.name)],
            &expr_txt_guard,
        ));
    }
    sql
}

/// Builds the full `create_model_<provider>.sql` transaction.
/// `group_lst`/`group_txt`/`group_pc` are out of scope: `ModelMeta` carries
/// no parameter/table group data.
pub fn generate_create_model_sql(model: &ModelMeta, provider: Provider) -> String {
    let type_digests: Vec<String> = model.types.iter().map(type_digest).collect();
    let parameter_digests: Vec<String> = model.parameters.iter().map(parameter_digest).collect();
    let table_digests: Vec<String> = model.tables.iter().map(table_digest).collect();
    let digest = model_digest(model, &type_digests, &parameter_digests, &table_digests);

    let mut sql = String::new();
    sql.push_str(provider.begin_transaction());
    sql.push('\n');
    sql.push_str(&emit_model_dic(model, &digest));
    sql.push_str(&emit_model_dic_txt(model, &digest));
    for type_meta in &model.types {
        sql.push_str(&emit_type(&digest, type_meta));
    }
    for (i, parameter) in model.parameters.iter().enumerate() {
        sql.push_str(&emit_parameter(&digest, parameter, i));
    }
    for (i, table) in model.tables.iter().enumerate() {
        sql.push_str(&emit_table(&digest, table, i));
    }
    sql.push_str(provider.commit());
    sql.push('\n');
    sql
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod metadata_tests;
