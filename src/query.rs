use crate::constants::FINAL_ATTRIBUTES;
use crate::error::{EtlError, Result};
use crate::load::with_connection;
use crate::types::{format_amount, render_grid, BankRecord, BankTable};
use rusqlite::types::Value;
use std::fmt;
use std::path::Path;
use tracing::{info, instrument};

/// Rows returned by an arbitrary query, with the statement's column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Execute `sql` against the database file and collect every row.
/// The statement is run as given; callers are responsible for its contents.
#[instrument(skip(db_path))]
pub fn run_query(db_path: &Path, sql: &str) -> Result<QueryResult> {
    let result = with_connection(db_path, |conn| {
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(QueryResult { columns, rows })
    })?;

    info!("Query returned {} rows", result.len());
    Ok(result)
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> QueryResult {
        QueryResult {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Interpret the result as a bank table. Fails unless the columns are exactly
    /// the final bank attributes with a text name and numeric amounts.
    pub fn to_bank_table(&self) -> Result<BankTable> {
        if self.columns.iter().map(String::as_str).ne(FINAL_ATTRIBUTES) {
            return Err(EtlError::Schema(format!("columns {:?}", self.columns)));
        }

        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(n, row)| -> Result<BankRecord> {
                let name = match row.first() {
                    Some(Value::Text(name)) => name.clone(),
                    other => {
                        return Err(EtlError::Schema(format!("row {}: name is {:?}", n, other)))
                    }
                };
                let amount = |i: usize| -> Result<f64> {
                    match row.get(i) {
                        Some(Value::Real(v)) => Ok(*v),
                        Some(Value::Integer(v)) => Ok(*v as f64),
                        other => Err(EtlError::Schema(format!(
                            "row {}: {} is {:?}",
                            n, FINAL_ATTRIBUTES[i], other
                        ))),
                    }
                };
                Ok(BankRecord {
                    name,
                    mc_usd_billion: amount(1)?,
                    mc_gbp_billion: amount(2)?,
                    mc_eur_billion: amount(3)?,
                    mc_inr_billion: amount(4)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BankTable { rows })
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(v) => v.to_string(),
        Value::Real(v) => format_amount(*v),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(display_value).collect())
            .collect::<Vec<Vec<String>>>();
        f.write_str(&render_grid(&self.columns, &rows, true))
    }
}
