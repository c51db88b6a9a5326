use crate::config::ExchangeRates;
use crate::error::{EtlError, Result};
use crate::types::{BankRecord, BankTable, ExtractedTable};
use tracing::{info, instrument};

/// Coerce the scraped USD column to numbers and derive the GBP, EUR and INR columns.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn transform(table: &ExtractedTable, rates: &ExchangeRates) -> Result<BankTable> {
    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, raw)| -> Result<BankRecord> {
            let usd = parse_usd(&raw.mc_usd_billion, row)?;
            Ok(convert(&raw.name, usd, rates))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Converted {} rows", rows.len());
    Ok(BankTable { rows })
}

/// Build a record from a USD amount. Deterministic for a given input and rate set.
pub fn convert(name: &str, usd: f64, rates: &ExchangeRates) -> BankRecord {
    BankRecord {
        name: name.to_string(),
        mc_usd_billion: usd,
        mc_gbp_billion: round2(usd * rates.gbp),
        mc_eur_billion: round2(usd * rates.eur),
        mc_inr_billion: round2(usd * rates.inr),
    }
}

/// Round to cents, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn parse_usd(value: &str, row: usize) -> Result<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EtlError::Parse {
            row,
            value: value.to_string(),
        })
}
