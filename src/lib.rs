//! Extract the list of the world's largest banks from an archived web page,
//! convert market capitalisation into several currencies, and load the result
//! into a CSV file and a SQLite table.

pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod load;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod transform;
pub mod types;

pub use config::EtlConfig;
pub use error::{EtlError, Result};
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{BankRecord, BankTable, ExtractedTable, RawBank};
