use super::*;
use crate::meta::{AccumulatorMeta, DimensionMeta, LanguageMeta, MeasureMeta, ModelKind, ParameterMeta};

fn sample_model() -> ModelMeta {
    ModelMeta {
        name: "TestModel".to_string(),
        version: "1.0.0".to_string(),
        kind: ModelKind::CaseBased,
        languages: vec![LanguageMeta { code: "EN".to_string() }],
        types: vec![],
        parameters: vec![ParameterMeta {
            name: "AgeLimit".to_string(),
            short_name: "AgeLimit".to_string(),
            type_name: "int".to_string(),
            dimensions: vec![DimensionMeta {
                short_name: "dim0".to_string(),
                type_name: "AGE_GROUP".to_string(),
                size: 2,
            }],
            label: "Age limit".to_string(),
        }],
        tables: vec![TableMeta {
            name: "T_Salary".to_string(),
            short_name: "T_Salary".to_string(),
            dimensions: vec![DimensionMeta {
                short_name: "dim0".to_string(),
                type_name: "AGE_GROUP".to_string(),
                size: 2,
            }],
            measures: vec![MeasureMeta { name: "avg_salary".to_string(), expr: "OM_AVG(salary)".to_string() }],
            accumulators: vec![AccumulatorMeta {
                name: "salary".to_string(),
                accumulator: "sum".to_string(),
                increment_kind: "delta".to_string(),
                timing: "event".to_string(),
                obs_collection_index: None,
            }],
            label: "Salary table".to_string(),
        }],
    }
}

#[test]
fn parameter_view_renames_dims_and_value() {
    let sql = generate_optional_views_sql(&sample_model(), Provider::Sqlite);
    assert!(sql.contains("Dim0"));
    assert!(sql.contains("AS Value"));
    assert!(sql.contains("AgeLimit_v"));
}

#[test]
fn table_view_filters_to_first_run_and_its_expr_id() {
    let sql = generate_optional_views_sql(&sample_model(), Provider::Sqlite);
    assert!(sql.contains("T_Salary_avg_salary_v"));
    assert!(sql.contains("expr_id = 0"));
}

#[test]
fn mssql_uses_create_or_alter_view() {
    let sql = generate_optional_views_sql(&sample_model(), Provider::Mssql);
    assert!(sql.contains("CREATE OR ALTER VIEW"));
}

#[test]
fn drop_script_covers_every_view_created() {
    let model = sample_model();
    let create = generate_optional_views_sql(&model, Provider::Sqlite);
    let drop = generate_drop_optional_views_sql(&model, Provider::Sqlite);
    assert!(create.contains("AgeLimit_v"));
    assert!(drop.contains("AgeLimit_v"));
    assert!(create.contains("T_Salary_avg_salary_v"));
    assert!(drop.contains("T_Salary_avg_salary_v"));
}
