use super::*;

const SCHEMA_SQL: &str = "CREATE TABLE id_lst (id_key TEXT PRIMARY KEY, id_value INT);\n\
INSERT INTO id_lst (id_key, id_value) VALUES ('model_hid', 0);\n\
CREATE TABLE model_dic (model_id INT, model_name TEXT, model_digest TEXT, model_type INT, model_ver TEXT);\n";

#[test]
fn build_database_creates_a_fresh_file_and_runs_every_script() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.sqlite");

    build_database(&db_path, SCHEMA_SQL, "", "").unwrap();
    assert!(db_path.exists());

    let conn = Connection::open(&db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM id_lst", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn build_database_overwrites_an_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.sqlite");
    std::fs::write(&db_path, b"not a real sqlite file").unwrap();

    build_database(&db_path, SCHEMA_SQL, "", "").unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM id_lst", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn build_database_leaves_no_file_behind_on_a_bad_script() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.sqlite");

    let err = build_database(&db_path, "NOT VALID SQL;", "", "");
    assert!(err.is_err());
    assert!(!db_path.exists());
}
