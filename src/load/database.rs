use crate::config::validate_identifier;
use crate::constants::{COL_NAME, FINAL_ATTRIBUTES};
use crate::error::{EtlError, Result};
use crate::types::BankTable;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Open the database at `path`, hand the connection to `f`, and close it again
/// whether or not `f` succeeded. An error from `f` wins over a close error.
pub fn with_connection<T>(path: &Path, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
    let mut conn = Connection::open(path)?;
    debug!("Opened {}", path.display());
    let outcome = f(&mut conn);
    let closed = conn.close().map_err(|(_, e)| EtlError::from(e));
    let value = outcome?;
    closed?;
    Ok(value)
}

/// Replace `table_name` with the contents of `table`. Drop, create and inserts
/// run in a single transaction.
#[instrument(skip(table), fields(rows = table.len()))]
pub fn load_to_db(table: &BankTable, db_path: &Path, table_name: &str) -> Result<()> {
    validate_identifier(table_name)?;

    with_connection(db_path, |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS \"{table}\"; CREATE TABLE \"{table}\" ({columns});",
            table = table_name,
            columns = column_definitions(),
        ))?;

        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO \"{}\" ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                table_name,
                quoted_columns(),
            ))?;
            for row in &table.rows {
                insert.execute(params![
                    row.name,
                    row.mc_usd_billion,
                    row.mc_gbp_billion,
                    row.mc_eur_billion,
                    row.mc_inr_billion,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    })?;

    info!("Loaded {} rows into {}", table.len(), table_name);
    Ok(())
}

fn column_definitions() -> String {
    FINAL_ATTRIBUTES
        .iter()
        .map(|c| {
            let sql_type = if *c == COL_NAME { "TEXT" } else { "REAL" };
            format!("\"{}\" {}", c, sql_type)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn quoted_columns() -> String {
    FINAL_ATTRIBUTES
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}
