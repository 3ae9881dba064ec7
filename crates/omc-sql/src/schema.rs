//! Create-tables SQL emitter: per-provider `CREATE TABLE IF
//! NOT EXISTS` for every parameter's run/workset table and every output
//! table's accumulator/value table, plus the matching drop script.
//!
//! Physical table names are assigned the same way as any other DB
//! identifier: `<prefix>_<kind>_<suffix>`
//! built from the owning parameter/table's digest, so two models that
//! happen to share a parameter or table definition end up pointing at the
//! same physical tables.

use crate::dialect::Provider;
use crate::digest::{self, NameKind};
use crate::meta::{ModelMeta, ParameterMeta, TableMeta, TypeKind};

/// Physical name of a parameter's run table.
pub fn run_table_name(parameter: &ParameterMeta, max_len: usize) -> String {
    let digest = digest::parameter_digest(parameter);
    digest::assign_db_name(&parameter.short_name, &digest, NameKind::RunParameter, max_len)
}

/// Physical name of a parameter's workset table.
pub fn workset_table_name(parameter: &ParameterMeta, max_len: usize) -> String {
    let digest = digest::parameter_digest(parameter);
    digest::assign_db_name(&parameter.short_name, &digest, NameKind::Workset, max_len)
}

/// Physical name of a table's accumulator table.
pub fn accumulator_table_name(table: &TableMeta, max_len: usize) -> String {
    let digest = digest::table_digest(table);
    digest::assign_db_name(&table.short_name, &digest, NameKind::Accumulator, max_len)
}

/// Physical name of a table's value (expression) table.
pub fn value_table_name(table: &TableMeta, max_len: usize) -> String {
    let digest = digest::table_digest(table);
    digest::assign_db_name(&table.short_name, &digest, NameKind::Value, max_len)
}

/// Parameter type resolved to a `TypeKind` for column typing, falling back
/// to a plain numeric column when the type isn't in the model's type list
/// (built-in scalar types like `int`/`double` have no `type_dic` entry).
fn parameter_column_type(provider: Provider, parameter: &ParameterMeta, model: &ModelMeta) -> String {
    match model.types.iter().find(|t| t.name == parameter.type_name) {
        Some(type_meta) => provider.sql_type_for(&type_meta.kind),
        None => provider.sql_type_for(&TypeKind::Numeric(parameter.type_name.clone())),
    }
}

fn dimension_column_type(provider: Provider, type_name: &str, model: &ModelMeta) -> String {
    match model.types.iter().find(|t| t.name == type_name) {
        Some(type_meta) => provider.sql_type_for(&type_meta.kind),
        None => provider.id_column_type().to_string(),
    }
}

/// One parameter's run table: `(run_id, dim0, ..., param_value)`.
fn parameter_run_table_ddl(provider: Provider, model: &ModelMeta, parameter: &ParameterMeta, max_len: usize) -> String {
    let name = run_table_name(parameter, max_len);
    let mut columns = vec!["run_id INT NOT NULL".to_string()];
    let mut key_cols = vec!["run_id".to_string()];
    for dim in &parameter.dimensions {
        columns.push(format!("{} {} NOT NULL", dim.short_name, provider.id_column_type()));
        key_cols.push(dim.short_name.clone());
    }
    columns.push(format!(
        "param_value {} NOT NULL",
        parameter_column_type(provider, parameter, model)
    ));
    format!(
        "{} ({cols}, PRIMARY KEY ({keys}));\n",
        provider.create_table_if_not_exists(&name),
        cols = columns.join(", "),
        keys = key_cols.join(", "),
    )
}

/// One parameter's workset table: `(set_id, dim0, ..., param_value)`.
fn parameter_workset_table_ddl(provider: Provider, model: &ModelMeta, parameter: &ParameterMeta, max_len: usize) -> String {
    let name = workset_table_name(parameter, max_len);
    let mut columns = vec!["set_id INT NOT NULL".to_string()];
    let mut key_cols = vec!["set_id".to_string()];
    for dim in &parameter.dimensions {
        columns.push(format!("{} {} NOT NULL", dim.short_name, provider.id_column_type()));
        key_cols.push(dim.short_name.clone());
    }
    columns.push(format!(
        "param_value {} NOT NULL",
        parameter_column_type(provider, parameter, model)
    ));
    format!(
        "{} ({cols}, PRIMARY KEY ({keys}));\n",
        provider.create_table_if_not_exists(&name),
        cols = columns.join(", "),
        keys = key_cols.join(", "),
    )
}

/// One table's accumulator table: `(run_id, acc_id, sub_id, dim0, ...,
/// acc_value)`.
fn table_accumulator_table_ddl(provider: Provider, model: &ModelMeta, table: &TableMeta, max_len: usize) -> String {
    let name = accumulator_table_name(table, max_len);
    let mut columns = vec![
        "run_id INT NOT NULL".to_string(),
        "acc_id INT NOT NULL".to_string(),
        "sub_id INT NOT NULL".to_string(),
    ];
    let mut key_cols = vec!["run_id".to_string(), "acc_id".to_string(), "sub_id".to_string()];
    for dim in &table.dimensions {
        columns.push(format!(
            "{} {} NOT NULL",
            dim.short_name,
            dimension_column_type(provider, &dim.type_name, model)
        ));
        key_cols.push(dim.short_name.clone());
    }
    columns.push("acc_value FLOAT NOT NULL".to_string());
    format!(
        "{} ({cols}, PRIMARY KEY ({keys}));\n",
        provider.create_table_if_not_exists(&name),
        cols = columns.join(", "),
        keys = key_cols.join(", "),
    )
}

/// One table's value (expression) table: `(run_id, expr_id, dim0, ...,
/// expr_value)`.
fn table_value_table_ddl(provider: Provider, model: &ModelMeta, table: &TableMeta, max_len: usize) -> String {
    let name = value_table_name(table, max_len);
    let mut columns = vec!["run_id INT NOT NULL".to_string(), "expr_id INT NOT NULL".to_string()];
    let mut key_cols = vec!["run_id".to_string(), "expr_id".to_string()];
    for dim in &table.dimensions {
        columns.push(format!(
            "{} {} NOT NULL",
            dim.short_name,
            dimension_column_type(provider, &dim.type_name, model)
        ));
        key_cols.push(dim.short_name.clone());
    }
    columns.push("expr_value FLOAT NOT NULL".to_string());
    format!(
        "{} ({cols}, PRIMARY KEY ({keys}));\n",
        provider.create_table_if_not_exists(&name),
        cols = columns.join(", "),
        keys = key_cols.join(", "),
    )
}

/// Builds `<model>_2_create_tables_<provider>.sql`.
pub fn generate_create_tables_sql(model: &ModelMeta, provider: Provider) -> String {
    let max_len = provider.max_identifier_length();
    let mut sql = String::new();
    for parameter in &model.parameters {
        sql.push_str(&parameter_run_table_ddl(provider, model, parameter, max_len));
        sql.push_str(&parameter_workset_table_ddl(provider, model, parameter, max_len));
    }
    for table in &model.tables {
        sql.push_str(&table_accumulator_table_ddl(provider, model, table, max_len));
        sql.push_str(&table_value_table_ddl(provider, model, table, max_len));
    }
    sql
}

/// Builds `<model>_drop_tables.sql`, dialect-independent since it only
/// drops tables this crate itself created.
pub fn generate_drop_tables_sql(model: &ModelMeta, provider: Provider) -> String {
    let max_len = provider.max_identifier_length();
    let mut sql = String::new();
    for parameter in &model.parameters {
        sql.push_str(&provider.drop_table_if_exists(&run_table_name(parameter, max_len)));
        sql.push_str(";\n");
        sql.push_str(&provider.drop_table_if_exists(&workset_table_name(parameter, max_len)));
        sql.push_str(";\n");
    }
    for table in &model.tables {
        sql.push_str(&provider.drop_table_if_exists(&accumulator_table_name(table, max_len)));
        sql.push_str(";\n");
        sql.push_str(&provider.drop_table_if_exists(&value_table_name(table, max_len)));
        sql.push_str(";\n");
    }
    sql
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod schema_tests;
