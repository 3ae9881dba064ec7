use super::*;
use crate::meta::{
    AccumulatorMeta, DimensionMeta, LanguageMeta, MeasureMeta, ParameterMeta, TableMeta, TypeMeta,
};

fn sample_model() -> ModelMeta {
    ModelMeta {
        name: "TestModel".to_string(),
        version: "1.0.0".to_string(),
        kind: ModelKind::CaseBased,
        languages: vec![LanguageMeta { code: "EN".to_string() }],
        types: vec![TypeMeta {
            name: "AGE_GROUP".to_string(),
            kind: TypeKind::Classification {
                enumerators: vec!["young".to_string(), "old".to_string()],
            },
        }],
        parameters: vec![ParameterMeta {
            name: "StartingSeed".to_string(),
            short_name: "StartingSeed".to_string(),
            type_name: "int".to_string(),
            dimensions: vec![],
            label: "Starting seed".to_string(),
        }],
        tables: vec![TableMeta {
            name: "T_Salary".to_string(),
            short_name: "T_Salary".to_string(),
            dimensions: vec![DimensionMeta {
                short_name: "dim0".to_string(),
                type_name: "AGE_GROUP".to_string(),
                size: 2,
            }],
            measures: vec![MeasureMeta {
                name: "avg_salary".to_string(),
                expr: "OM_AVG(salary)".to_string(),
            }],
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
fn script_is_wrapped_in_a_transaction() {
    let sql = generate_create_model_sql(&sample_model(), Provider::Sqlite);
    assert!(sql.starts_with("BEGIN TRANSACTION;"));
    assert!(sql.trim_end().ends_with("COMMIT;"));
}

#[test]
fn every_dictionary_insert_is_guarded_by_a_digest_not_exists() {
    let sql = generate_create_model_sql(&sample_model(), Provider::Sqlite);
    assert!(sql.contains("UPDATE id_lst SET id_value ="));
    assert!(sql.contains("id_key = 'model_hid'"));
    assert!(sql.contains("id_key = 'type_hid'"));
    assert!(sql.contains("id_key = 'parameter_hid'"));
    assert!(sql.contains("id_key = 'table_hid'"));
    assert!(sql.contains("INSERT INTO model_dic"));
    assert!(sql.contains("INSERT INTO type_dic"));
    assert!(sql.contains("INSERT INTO parameter_dic"));
    assert!(sql.contains("INSERT INTO table_dic"));
}

#[test]
fn classification_enumerators_become_type_enum_rows() {
    let sql = generate_create_model_sql(&sample_model(), Provider::Sqlite);
    assert!(sql.contains("INSERT INTO type_enum_lst"));
    assert!(sql.contains("'young'"));
    assert!(sql.contains("'old'"));
}

#[test]
fn table_measure_is_rewritten_into_aggregation_sql() {
    let sql = generate_create_model_sql(&sample_model(), Provider::Sqlite);
    assert!(sql.contains("INSERT INTO table_expr"));
    assert!(sql.contains("AVG(M1.salary)"));
}

#[test]
fn running_generation_twice_yields_identical_digests_and_guards() {
    let first = generate_create_model_sql(&sample_model(), Provider::Sqlite);
    let second = generate_create_model_sql(&sample_model(), Provider::Sqlite);
    assert_eq!(first, second);
}
