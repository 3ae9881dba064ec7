//! Workset construction: `beginWorkset` /
//! `addWorksetParameter` / `endWorkset` build a named, versioned parameter
//! set a model run can be launched from, over a live SQLite connection.

use omc_core::BuildError;
use rusqlite::Connection;

use crate::meta::ParameterMeta;

fn validation(message: impl Into<String>) -> BuildError {
    BuildError::Validation { loc: omc_core::SourceLoc::unknown(), message: message.into() }
}

/// One value provided to [`add_parameter`]: either a single scalar (rank 0)
/// or the flattened cell values of an n-dim parameter in odometer order
/// (innermost dimension varying fastest).
pub enum ParameterValue {
    Scalar(String),
    Cells(Vec<String>),
}

/// A workset under construction. Tracks which of the model's parameters
/// have been added so `end` can enforce completeness.
pub struct WorksetBuilder<'a> {
    conn: &'a Connection,
    set_id: i64,
    model_parameters: Vec<String>,
    added: std::collections::HashSet<String>,
}

/// Opens a DB transaction, inserts workset metadata (`workset_lst`), and
/// clears the "isAdded" bookkeeping for every parameter named in
/// `model_parameters`.
pub fn begin_workset<'a>(
    conn: &'a Connection,
    set_name: &str,
    model_parameters: &[ParameterMeta],
) -> Result<WorksetBuilder<'a>, BuildError> {
    conn.execute_batch("BEGIN TRANSACTION;").map_err(|e| validation(e.to_string()))?;
    conn.execute(
        "INSERT INTO workset_lst (set_name, is_readonly) VALUES (?1, 0)",
        rusqlite::params![set_name],
    )
    .map_err(|e| validation(format!("inserting workset_lst row: {e}")))?;
    let set_id = conn.last_insert_rowid();
    Ok(WorksetBuilder {
        conn,
        set_id,
        model_parameters: model_parameters.iter().map(|p| p.name.clone()).collect(),
        added: std::collections::HashSet::new(),
    })
}

/// Row-major odometer over `sizes`: the innermost (last) dimension varies
/// fastest, matching `addWorksetParameter`'s cell iteration order.
fn odometer(sizes: &[u32]) -> Vec<Vec<u32>> {
    if sizes.is_empty() {
        return vec![vec![]];
    }
    let total: usize = sizes.iter().map(|&s| s as usize).product();
    let mut rows = Vec::with_capacity(total);
    let mut index = vec![0u32; sizes.len()];
    for _ in 0..total {
        rows.push(index.clone());
        for d in (0..sizes.len()).rev() {
            index[d] += 1;
            if index[d] < sizes[d] {
                break;
            }
            index[d] = 0;
        }
    }
    rows
}

impl<'a> WorksetBuilder<'a> {
    /// Inserts `parameter`'s value(s) into its workset table: one row for
    /// a scalar, one row per cell (odometer order) for an n-dim parameter.
    pub fn add_parameter(
        &mut self,
        parameter: &ParameterMeta,
        table_name: &str,
        value: ParameterValue,
    ) -> Result<(), BuildError> {
        match (&value, parameter.rank()) {
            (ParameterValue::Scalar(v), 0) => {
                let sql = format!("INSERT INTO {table_name} (set_id, param_value) VALUES (?1, ?2)");
                self.conn
                    .execute(&sql, rusqlite::params![self.set_id, v])
                    .map_err(|e| validation(format!("inserting parameter '{}': {e}", parameter.name)))?;
            }
            (ParameterValue::Cells(values), rank) if rank > 0 => {
                let sizes: Vec<u32> = parameter.dimensions.iter().map(|d| d.size).collect();
                let cells = odometer(&sizes);
                if values.len() != cells.len() {
                    return Err(validation(format!(
                        "parameter '{}' expects {} cells, got {}",
                        parameter.name,
                        cells.len(),
                        values.len()
                    )));
                }
                let dim_cols: Vec<String> =
                    parameter.dimensions.iter().map(|d| d.short_name.clone()).collect();
                let sql = format!(
                    "INSERT INTO {table_name} (set_id, {dims}, param_value) VALUES (?1, {placeholders})",
                    dims = dim_cols.join(", "),
                    placeholders = (0..dim_cols.len() + 1)
                        .map(|i| format!("?{}", i + 2))
                        .collect::<Vec<_>>()
                        .join(", "),
                );
                for (cell_index, value) in cells.iter().zip(values.iter()) {
                    let mut params: Vec<Box<dyn rusqlite::ToSql>> =
                        vec![Box::new(self.set_id)];
                    for idx in cell_index {
                        params.push(Box::new(*idx));
                    }
                    params.push(Box::new(value.clone()));
                    let param_refs: Vec<&dyn rusqlite::ToSql> =
                        params.iter().map(|p| p.as_ref()).collect();
                    self.conn.execute(&sql, param_refs.as_slice()).map_err(|e| {
                        validation(format!("inserting parameter '{}' cell: {e}", parameter.name))
                    })?;
                }
            }
            _ => {
                return Err(validation(format!(
                    "parameter '{}' value shape does not match its rank {}",
                    parameter.name,
                    parameter.rank()
                )));
            }
        }
        self.added.insert(parameter.name.clone());
        Ok(())
    }

    /// Requires every model parameter to have been added, flips
    /// `is_readonly = 1`, and commits.
    pub fn end(self) -> Result<(), BuildError> {
        let missing: Vec<&String> =
            self.model_parameters.iter().filter(|p| !self.added.contains(*p)).collect();
        if let Some(first) = missing.first() {
            return Err(BuildError::MissingWorksetParameter {
                parameter: (*first).clone(),
                workset: self.set_id.to_string(),
            });
        }
        self.conn
            .execute("UPDATE workset_lst SET is_readonly = 1 WHERE set_id = ?1", rusqlite::params![self.set_id])
            .map_err(|e| validation(format!("finalizing workset: {e}")))?;
        self.conn.execute_batch("COMMIT;").map_err(|e| validation(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "workset_tests.rs"]
mod workset_tests;
