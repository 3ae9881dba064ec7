use super::*;
use crate::meta::{DimensionMeta, ParameterMeta};

fn fresh_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE workset_lst (set_id INTEGER PRIMARY KEY, set_name TEXT, is_readonly INT);
         CREATE TABLE pt_scalar (set_id INT, param_value TEXT);
         CREATE TABLE pt_grid (set_id INT, dim0 INT, param_value TEXT);",
    )
    .unwrap();
    conn
}

fn scalar_param() -> ParameterMeta {
    ParameterMeta {
        name: "StartingSeed".to_string(),
        short_name: "StartingSeed".to_string(),
        type_name: "int".to_string(),
        dimensions: vec![],
        label: String::new(),
    }
}

fn grid_param() -> ParameterMeta {
    ParameterMeta {
        name: "AgeLimit".to_string(),
        short_name: "AgeLimit".to_string(),
        type_name: "int".to_string(),
        dimensions: vec![DimensionMeta { short_name: "dim0".to_string(), type_name: "AGE_GROUP".to_string(), size: 3 }],
        label: String::new(),
    }
}

#[test]
fn odometer_innermost_dimension_varies_fastest() {
    let rows = odometer(&[2, 3]);
    assert_eq!(
        rows,
        vec![vec![0, 0], vec![0, 1], vec![0, 2], vec![1, 0], vec![1, 1], vec![1, 2]]
    );
}

#[test]
fn scalar_parameter_inserts_one_row() {
    let conn = fresh_conn();
    let params = vec![scalar_param()];
    let mut ws = begin_workset(&conn, "Default", &params).unwrap();
    ws.add_parameter(&scalar_param(), "pt_scalar", ParameterValue::Scalar("42".to_string())).unwrap();
    ws.end().unwrap();

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM pt_scalar", [], |r| r.get(0)).unwrap();
    assert_eq!(count, 1);
    let is_readonly: i64 =
        conn.query_row("SELECT is_readonly FROM workset_lst", [], |r| r.get(0)).unwrap();
    assert_eq!(is_readonly, 1);
}

#[test]
fn grid_parameter_inserts_one_row_per_cell() {
    let conn = fresh_conn();
    let params = vec![grid_param()];
    let mut ws = begin_workset(&conn, "Default", &params).unwrap();
    let values = vec!["10".to_string(), "20".to_string(), "30".to_string()];
    ws.add_parameter(&grid_param(), "pt_grid", ParameterValue::Cells(values)).unwrap();
    ws.end().unwrap();

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM pt_grid", [], |r| r.get(0)).unwrap();
    assert_eq!(count, 3);
}

#[test]
fn ending_without_adding_every_parameter_is_an_error() {
    let conn = fresh_conn();
    let params = vec![scalar_param(), grid_param()];
    let mut ws = begin_workset(&conn, "Default", &params).unwrap();
    ws.add_parameter(&scalar_param(), "pt_scalar", ParameterValue::Scalar("42".to_string())).unwrap();
    let err = ws.end();
    assert!(matches!(err, Err(BuildError::MissingWorksetParameter { .. })));
}

#[test]
fn wrong_cell_count_is_rejected() {
    let conn = fresh_conn();
    let params = vec![grid_param()];
    let mut ws = begin_workset(&conn, "Default", &params).unwrap();
    let err = ws.add_parameter(&grid_param(), "pt_grid", ParameterValue::Cells(vec!["1".to_string()]));
    assert!(err.is_err());
}
