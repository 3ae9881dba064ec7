//! Per-provider SQL dialect strategies (§4.7, §9: "SQL dialect portability
//! is handled by small per-provider strategy functions (begin/commit,
//! `CREATE TABLE IF NOT EXISTS`, type mapping, max-identifier length,
//! reserved-word check)."). Each [`Provider`] is a thin strategy, not a
//! connection: the compiler never talks to a live non-SQLite database, it
//! only ever emits text for one.

use omc_core::BuildError;
use omc_core::ident::ReservedWords;

use crate::meta::TypeKind;

/// A target SQL dialect the metadata/create-tables scripts are rendered
/// for (§6: "provider list (comma-separated; at least one)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Sqlite,
    Mysql,
    Postgresql,
    Mssql,
    Oracle,
}

impl Provider {
    /// Parses a comma-separated provider list. Case-insensitive,
    /// whitespace around entries is trimmed. At least one provider is
    /// required; an unrecognized name is a fatal validation error.
    pub fn parse_list(raw: &str) -> Result<Vec<Provider>, BuildError> {
        let providers: Result<Vec<Provider>, BuildError> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Provider::parse_one)
            .collect();
        let providers = providers?;
        if providers.is_empty() {
            return Err(BuildError::Validation {
                loc: omc_core::SourceLoc::unknown(),
                message: "provider list must name at least one SQL provider".to_string(),
            });
        }
        Ok(providers)
    }

    fn parse_one(name: &str) -> Result<Provider, BuildError> {
        match name.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Provider::Sqlite),
            "mysql" => Ok(Provider::Mysql),
            "postgresql" | "postgres" => Ok(Provider::Postgresql),
            "mssql" | "sqlserver" => Ok(Provider::Mssql),
            "oracle" => Ok(Provider::Oracle),
            other => Err(BuildError::Validation {
                loc: omc_core::SourceLoc::unknown(),
                message: format!("unrecognized SQL provider '{other}'"),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Provider::Sqlite => "sqlite",
            Provider::Mysql => "mysql",
            Provider::Postgresql => "postgresql",
            Provider::Mssql => "mssql",
            Provider::Oracle => "oracle",
        }
    }

    /// Maximum length of a DB identifier for this provider. The emitter
    /// uses the minimum over every configured provider.
    pub fn max_identifier_length(self) -> usize {
        match self {
            Provider::Sqlite => 128,
            Provider::Mysql => 64,
            Provider::Postgresql => 63,
            Provider::Mssql => 128,
            Provider::Oracle => 30,
        }
    }

    pub fn begin_transaction(self) -> &'static str {
        "BEGIN TRANSACTION;"
    }

    pub fn commit(self) -> &'static str {
        "COMMIT;"
    }

    /// `CREATE TABLE IF NOT EXISTS` spelling; every provider in the pick
    /// list supports the ANSI form directly except Oracle, which has no
    /// native `IF NOT EXISTS` and is emitted as a plain `CREATE TABLE`
    /// guarded by the caller dropping the table first (`drop_tables.sql`).
    pub fn create_table_if_not_exists(self, name: &str) -> String {
        match self {
            Provider::Oracle => format!("CREATE TABLE {name}"),
            _ => format!("CREATE TABLE IF NOT EXISTS {name}"),
        }
    }

    pub fn drop_table_if_exists(self, name: &str) -> String {
        match self {
            Provider::Oracle => format!("DROP TABLE {name}"),
            _ => format!("DROP TABLE IF EXISTS {name}"),
        }
    }

    pub fn create_view_if_not_exists(self, name: &str, select: &str) -> String {
        match self {
            Provider::Oracle => format!("CREATE VIEW {name} AS\n{select}"),
            Provider::Mssql => format!("CREATE OR ALTER VIEW {name} AS\n{select}"),
            _ => format!("CREATE VIEW IF NOT EXISTS {name} AS\n{select}"),
        }
    }

    pub fn drop_view_if_exists(self, name: &str) -> String {
        match self {
            Provider::Oracle => format!("DROP VIEW {name}"),
            _ => format!("DROP VIEW IF EXISTS {name}"),
        }
    }

    /// Maps a type-lattice member to this dialect's column type.
    pub fn sql_type_for(self, kind: &TypeKind) -> String {
        match (self, kind) {
            (_, TypeKind::Bool) => "INT".to_string(),
            (Provider::Postgresql, TypeKind::String) => "VARCHAR(255)".to_string(),
            (_, TypeKind::String) => "VARCHAR(255)".to_string(),
            (Provider::Sqlite, TypeKind::Time) => "REAL".to_string(),
            (_, TypeKind::Time) => "FLOAT".to_string(),
            (Provider::Sqlite, TypeKind::Numeric(_)) => "REAL".to_string(),
            (_, TypeKind::Numeric(n))
                if n.eq_ignore_ascii_case("int") || n.eq_ignore_ascii_case("counter") =>
            {
                "INT".to_string()
            }
            (_, TypeKind::Numeric(_)) => "FLOAT".to_string(),
            (_, TypeKind::Classification { .. })
            | (_, TypeKind::Range { .. })
            | (_, TypeKind::Partition { .. }) => "INT".to_string(),
        }
    }

    pub fn id_column_type(self) -> &'static str {
        "INT"
    }

    pub fn reserved_words(self) -> &'static [&'static str] {
        // Small, dialect-specific slice of the ANSI reserved-word list;
        // enough to catch the common collisions the DB-name uniqueness
        // pass needs to avoid, not an exhaustive grammar.
        match self {
            Provider::Sqlite => SQLITE_RESERVED,
            Provider::Mysql => MYSQL_RESERVED,
            Provider::Postgresql => POSTGRES_RESERVED,
            Provider::Mssql => MSSQL_RESERVED,
            Provider::Oracle => ORACLE_RESERVED,
        }
    }

    pub fn is_reserved_word(self, candidate: &str) -> bool {
        self.reserved_words().is_reserved(candidate)
    }
}

const SQLITE_RESERVED: &[&str] = &[
    "select", "from", "where", "group", "order", "by", "table", "index", "key", "primary",
    "foreign", "insert", "update", "delete", "create", "drop", "alter", "and", "or", "not",
    "null", "default", "value", "values", "int", "float", "char", "date", "time",
];
const MYSQL_RESERVED: &[&str] = &[
    "select", "from", "where", "group", "order", "by", "table", "index", "key", "primary",
    "foreign", "insert", "update", "delete", "create", "drop", "alter", "and", "or", "not",
    "null", "default", "value", "values", "int", "float", "char", "date", "time", "rank",
];
const POSTGRES_RESERVED: &[&str] = &[
    "select", "from", "where", "group", "order", "by", "table", "index", "key", "primary",
    "foreign", "insert", "update", "delete", "create", "drop", "alter", "and", "or", "not",
    "null", "default", "value", "values", "int", "float", "char", "date", "time", "user",
];
const MSSQL_RESERVED: &[&str] = &[
    "select", "from", "where", "group", "order", "by", "table", "index", "key", "primary",
    "foreign", "insert", "update", "delete", "create", "drop", "alter", "and", "or", "not",
    "null", "default", "value", "values", "int", "float", "char", "date", "time", "identity",
];
const ORACLE_RESERVED: &[&str] = &[
    "select", "from", "where", "group", "order", "by", "table", "index", "key", "primary",
    "foreign", "insert", "update", "delete", "create", "drop", "alter", "and", "or", "not",
    "null", "default", "value", "values", "int", "float", "char", "date", "time", "number",
];

#[cfg(test)]
#[path = "dialect_tests.rs"]
mod dialect_tests;
