//! SQLite database bootstrap: executes the metadata schema script, then the
//! create-model script, then the create-tables script, against a fresh
//! file.

use std::path::Path;

use omc_core::BuildError;
use rusqlite::Connection;

fn io_error(path: &Path, source: std::io::Error) -> BuildError {
    BuildError::Io { path: path.to_path_buf(), source }
}

/// Deletes `db_path` if present, opens a fresh connection, and runs
/// `schema_sql` (the openM++ metadata schema bootstrap, read from the SQL
/// support script directory), `create_model_sql`, and `create_tables_sql`
/// in that order. Any failure leaves no half-populated file behind: the
/// connection is dropped and the partial file removed before returning.
pub fn build_database(
    db_path: &Path,
    schema_sql: &str,
    create_model_sql: &str,
    create_tables_sql: &str,
) -> Result<(), BuildError> {
    if db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| io_error(db_path, e))?;
    }

    let result = (|| -> Result<(), BuildError> {
        let conn = Connection::open(db_path).map_err(|e| BuildError::Validation {
            loc: omc_core::SourceLoc::unknown(),
            message: format!("opening sqlite database {}: {e}", db_path.display()),
        })?;
        run_script(&conn, schema_sql)?;
        run_script(&conn, create_model_sql)?;
        run_script(&conn, create_tables_sql)?;
        Ok(())
    })();

    if result.is_err() && db_path.exists() {
        let _ = std::fs::remove_file(db_path);
    }
    result
}

fn run_script(conn: &Connection, script: &str) -> Result<(), BuildError> {
    conn.execute_batch(script).map_err(|e| BuildError::Validation {
        loc: omc_core::SourceLoc::unknown(),
        message: format!("executing sqlite script: {e}"),
    })
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod sqlite_tests;
