use super::*;

#[test]
fn parse_list_accepts_comma_separated_case_insensitive() {
    let providers = Provider::parse_list("Sqlite, MYSQL ,postgres").unwrap();
    assert_eq!(
        providers,
        vec![Provider::Sqlite, Provider::Mysql, Provider::Postgresql]
    );
}

#[test]
fn parse_list_rejects_empty() {
    assert!(Provider::parse_list("").is_err());
    assert!(Provider::parse_list("   ").is_err());
}

#[test]
fn parse_list_rejects_unknown_provider() {
    assert!(Provider::parse_list("sqlite,db2").is_err());
}

#[test]
fn oracle_has_the_tightest_identifier_limit() {
    assert_eq!(Provider::Oracle.max_identifier_length(), 30);
    assert!(Provider::Sqlite.max_identifier_length() > 30);
}

#[test]
fn create_table_uses_if_not_exists_except_oracle() {
    assert_eq!(
        Provider::Sqlite.create_table_if_not_exists("t"),
        "CREATE TABLE IF NOT EXISTS t"
    );
    assert_eq!(Provider::Oracle.create_table_if_not_exists("t"), "CREATE TABLE t");
}

#[test]
fn reserved_word_check_is_case_insensitive() {
    assert!(Provider::Sqlite.is_reserved_word("SELECT"));
    assert!(!Provider::Sqlite.is_reserved_word("age"));
}
