use super::*;
use crate::meta::{AccumulatorMeta, DimensionMeta, LanguageMeta, MeasureMeta, ModelKind, ParameterMeta, TableMeta};

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
fn run_and_workset_table_names_differ_only_by_kind_char() {
    let model = sample_model();
    let parameter = &model.parameters[0];
    let run = run_table_name(parameter, 30);
    let workset = workset_table_name(parameter, 30);
    assert!(run.contains("_p_"));
    assert!(workset.contains("_w_"));
    assert_ne!(run, workset);
}

#[test]
fn create_tables_sql_has_primary_keys_matching_parameter_rank() {
    let model = sample_model();
    let sql = generate_create_tables_sql(&model, Provider::Sqlite);
    assert!(sql.contains("PRIMARY KEY (run_id, dim0)"));
    assert!(sql.contains("PRIMARY KEY (set_id, dim0)"));
}

#[test]
fn accumulator_and_value_tables_use_their_own_key_shapes() {
    let model = sample_model();
    let sql = generate_create_tables_sql(&model, Provider::Sqlite);
    assert!(sql.contains("PRIMARY KEY (run_id, acc_id, sub_id, dim0)"));
    assert!(sql.contains("PRIMARY KEY (run_id, expr_id, dim0)"));
}

#[test]
fn oracle_create_tables_never_uses_if_not_exists() {
    let model = sample_model();
    let sql = generate_create_tables_sql(&model, Provider::Oracle);
    assert!(!sql.contains("IF NOT EXISTS"));
}

#[test]
fn drop_tables_sql_mentions_every_physical_table() {
    let model = sample_model();
    let create = generate_create_tables_sql(&model, Provider::Sqlite);
    let drop = generate_drop_tables_sql(&model, Provider::Sqlite);
    let run = run_table_name(&model.parameters[0], 30);
    assert!(create.contains(&run));
    assert!(drop.contains(&run));
}
