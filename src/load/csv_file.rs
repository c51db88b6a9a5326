use crate::constants::FINAL_ATTRIBUTES;
use crate::error::{EtlError, Result};
use crate::types::{format_amount, BankRecord, BankTable};
use csv::{ReaderBuilder, Writer};
use std::path::Path;
use tracing::{info, instrument};

/// Write the table to `path`, replacing any previous file. The first column is
/// the zero-based row index under an empty header.
#[instrument(skip(table), fields(rows = table.len()))]
pub fn load_to_csv(table: &BankTable, path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;

    let mut header = Vec::with_capacity(FINAL_ATTRIBUTES.len() + 1);
    header.push("");
    header.extend_from_slice(&FINAL_ATTRIBUTES);
    writer.write_record(&header)?;

    for (index, row) in table.rows.iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(index.to_string());
        record.push(row.name.clone());
        record.extend(row.amounts().iter().map(|v| format_amount(*v)));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Read a file produced by [`load_to_csv`] back into a table, dropping the index column.
pub fn read_csv(path: &Path) -> Result<BankTable> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let expected: Vec<&str> = std::iter::once("").chain(FINAL_ATTRIBUTES).collect();
    if headers.iter().collect::<Vec<_>>() != expected {
        return Err(EtlError::Schema(format!(
            "unexpected CSV header {:?}",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or_default();
        let number = |i: usize| -> Result<f64> {
            field(i).parse::<f64>().map_err(|_| EtlError::Parse {
                row,
                value: field(i).to_string(),
            })
        };
        rows.push(BankRecord {
            name: field(1).to_string(),
            mc_usd_billion: number(2)?,
            mc_gbp_billion: number(3)?,
            mc_eur_billion: number(4)?,
            mc_inr_billion: number(5)?,
        });
    }
    Ok(BankTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample() -> BankTable {
        BankTable {
            rows: vec![
                BankRecord {
                    name: "JPMorgan Chase".to_string(),
                    mc_usd_billion: 432.92,
                    mc_gbp_billion: 342.01,
                    mc_eur_billion: 402.62,
                    mc_inr_billion: 35940.98,
                },
                BankRecord {
                    name: "Industrial and Commercial Bank of China".to_string(),
                    mc_usd_billion: 100.0,
                    mc_gbp_billion: 79.0,
                    mc_eur_billion: 93.0,
                    mc_inr_billion: 8302.0,
                },
            ],
        }
    }

    #[test]
    fn writes_index_column_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");
        load_to_csv(&sample(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            ",Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion"
        );
        assert_eq!(lines[1], "0,JPMorgan Chase,432.92,342.01,402.62,35940.98");
        assert_eq!(lines[2], "1,Industrial and Commercial Bank of China,100.0,79.0,93.0,8302.0");
    }

    #[test]
    fn overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");
        fs::write(&path, "stale\nstale\nstale\nstale\nstale\n").unwrap();

        load_to_csv(&BankTable::default(), &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn reads_back_what_it_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");
        let table = sample();
        load_to_csv(&table, &path).unwrap();

        assert_eq!(read_csv(&path).unwrap(), table);
    }

    #[test]
    fn rejects_foreign_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        assert!(matches!(read_csv(&path), Err(EtlError::Schema(_))));
    }
}
