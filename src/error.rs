use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unexpected page structure: {0}")]
    Structure(String),

    #[error("Row {row}: cannot parse '{value}' as a number")]
    Parse { row: usize, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Result does not match the bank table schema: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
