use super::*;

fn dims() -> Vec<String> {
    vec!["dim0".to_string(), "dim1".to_string()]
}

fn acc_names() -> HashSet<String> {
    ["x", "y"].iter().map(|s| s.to_string()).collect()
}

#[test]
fn simple_avg_matches_spec_scenario_s3() {
    let sql = rewrite("OM_AVG(x)", "ta_T", &dims(), &acc_names()).unwrap();
    assert_eq!(
        sql,
        "SELECT M1.run_id, M1.dim0, M1.dim1, AVG(M1.x) AS ex1 FROM ta_T M1 GROUP BY M1.run_id, M1.dim0, M1.dim1"
    );
}

#[test]
fn combined_aggregates_share_one_level() {
    let sql = rewrite("OM_SUM(x) - OM_SUM(y)", "ta_T", &dims(), &acc_names()).unwrap();
    assert!(sql.starts_with("SELECT M1.run_id, M1.dim0, M1.dim1, "));
    assert!(sql.contains("SUM(M1.x) - SUM(M1.y) AS ex1"));
    assert!(!sql.contains("JOIN"));
}

#[test]
fn variance_pushes_avg_to_a_deeper_level_with_matching_group_by() {
    let sql = rewrite("OM_VAR(x)", "ta_T", &dims(), &acc_names()).unwrap();

    assert!(sql.starts_with("SELECT M1.run_id, M1.dim0, M1.dim1,"));
    assert!(sql.contains("FROM ta_T M1"));
    assert!(sql.contains("INNER JOIN ("));
    assert!(sql.contains("AVG(M2.x)"));
    assert!(sql.contains(") T2 ON M1.run_id = T2.run_id AND M1.dim0 = T2.dim0 AND M1.dim1 = T2.dim1"));
    assert!(sql.contains("COUNT(M1.x)"));
    assert!(sql.contains("- 1)"));
    // The two identical OM_AVG(x) references inside the squared-diff term
    // share one deduplicated join column rather than two redundant joins.
    assert_eq!(sql.matches("T2.ex1").count(), 2);
    assert_eq!(sql.matches("INNER JOIN").count(), 1);

    // Invariant 7: GROUP BY is run_id + every dim at every nesting level.
    let group_bys: Vec<&str> = sql.match_indices("GROUP BY").map(|(i, _)| &sql[i..]).collect();
    assert_eq!(group_bys.len(), 2);
    for gb in group_bys {
        let clause = gb.split(')').next().unwrap();
        assert!(clause.contains("run_id"));
        assert!(clause.contains("dim0"));
        assert!(clause.contains("dim1"));
    }
}

#[test]
fn unsupported_function_is_a_malformed_aggregation_error() {
    let err = rewrite("OM_MEDIAN(x)", "ta_T", &dims(), &acc_names());
    assert!(err.is_err());
}

#[test]
fn unbalanced_parens_is_an_error() {
    let err = rewrite("OM_AVG(x", "ta_T", &dims(), &acc_names());
    assert!(err.is_err());
}

#[test]
fn expression_with_no_aggregate_call_is_rejected() {
    let err = rewrite("x + y", "ta_T", &dims(), &acc_names());
    assert!(err.is_err());
}
