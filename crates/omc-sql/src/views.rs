//! Compatibility VIEWs: one VIEW per parameter and
//! per output table, projecting the first run's rows and renaming
//! dimensions to `Dim0`, `Dim1`, … and the measure column to `Value` -
//! the shape older client tools expect instead of the `run_id`/digest-named
//! physical tables.

use crate::dialect::Provider;
use crate::meta::{ModelMeta, ParameterMeta, TableMeta};
use crate::schema;

fn first_run_subselect() -> &'static str {
    "(SELECT MIN(run_id) FROM run_lst)"
}

fn parameter_view_name(parameter: &ParameterMeta) -> String {
    format!("{}_v", parameter.name)
}

fn table_view_name(table: &TableMeta, measure_name: &str) -> String {
    format!("{}_{}_v", table.name, measure_name)
}

fn parameter_view(provider: Provider, parameter: &ParameterMeta, max_len: usize) -> String {
    let run_table = schema::run_table_name(parameter, max_len);
    let dim_cols: Vec<String> = parameter
        .dimensions
        .iter()
        .enumerate()
        .map(|(i, dim)| format!("{} AS Dim{i}", dim.short_name))
        .collect();
    let mut select_cols = dim_cols;
    select_cols.push("param_value AS Value".to_string());
    let select = format!(
        "SELECT {cols} FROM {run_table} WHERE run_id = {first_run}",
        cols = select_cols.join(", "),
        first_run = first_run_subselect(),
    );
    format!(
        "{};\n",
        provider.create_view_if_not_exists(&parameter_view_name(parameter), &select)
    )
}

fn table_view(provider: Provider, table: &TableMeta, measure_name: &str, expr_id: usize, max_len: usize) -> String {
    let value_table = schema::value_table_name(table, max_len);
    let dim_cols: Vec<String> = table
        .dimensions
        .iter()
        .enumerate()
        .map(|(i, dim)| format!("{} AS Dim{i}", dim.short_name))
        .collect();
    let mut select_cols = dim_cols;
    select_cols.push("expr_value AS Value".to_string());
    let select = format!(
        "SELECT {cols} FROM {value_table} WHERE run_id = {first_run} AND expr_id = {expr_id}",
        cols = select_cols.join(", "),
        first_run = first_run_subselect(),
    );
    format!(
        "{};\n",
        provider.create_view_if_not_exists(&table_view_name(table, measure_name), &select)
    )
}

/// Builds `<model>_optional_views_<provider>.sql`.
pub fn generate_optional_views_sql(model: &ModelMeta, provider: Provider) -> String {
    let max_len = provider.max_identifier_length();
    let mut sql = String::new();
    for parameter in &model.parameters {
        sql.push_str(&parameter_view(provider, parameter, max_len));
    }
    for table in &model.tables {
        for (expr_id, measure) in table.measures.iter().enumerate() {
            sql.push_str(&table_view(provider, table, &measure.name, expr_id, max_len));
        }
    }
    sql
}

/// Builds `<model>_drop_optional_views.sql`.
pub fn generate_drop_optional_views_sql(model: &ModelMeta, provider: Provider) -> String {
    let mut sql = String::new();
    for parameter in &model.parameters {
        sql.push_str(&provider.drop_view_if_exists(&parameter_view_name(parameter)));
        sql.push_str(";\n");
    }
    for table in &model.tables {
        for measure in &table.measures {
            sql.push_str(&provider.drop_view_if_exists(&table_view_name(table, &measure.name)));
            sql.push_str(";\n");
        }
    }
    sql
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod views_tests;
