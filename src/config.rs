use crate::constants::*;
use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Everything a pipeline run needs to know about its surroundings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EtlConfig {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub rates: ExchangeRates,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
    pub progress_log_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            progress_log_path: PathBuf::from(DEFAULT_PROGRESS_LOG_PATH),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

/// Multipliers from USD billions to the target currency.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExchangeRates {
    pub gbp: f64,
    pub eur: f64,
    pub inr: f64,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            gbp: DEFAULT_GBP_RATE,
            eur: DEFAULT_EUR_RATE,
            inr: DEFAULT_INR_RATE,
        }
    }
}

impl EtlConfig {
    /// Load configuration from an explicit path, or from `banks_etl.toml` in the
    /// working directory when present, falling back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: EtlConfig = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(EtlError::Config("source.url must not be empty".to_string()));
        }
        validate_identifier(&self.output.table_name)?;

        for (label, path) in [
            ("output.csv_path", &self.output.csv_path),
            ("output.db_path", &self.output.db_path),
            ("output.progress_log_path", &self.output.progress_log_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(EtlError::Config(format!("{} must not be empty", label)));
            }
        }

        for (label, rate) in [
            ("rates.gbp", self.rates.gbp),
            ("rates.eur", self.rates.eur),
            ("rates.inr", self.rates.inr),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(EtlError::Config(format!(
                    "{} must be a positive number, got {}",
                    label, rate
                )));
            }
        }
        Ok(())
    }

    /// The verification query issued at the end of a run.
    pub fn select_all_query(&self) -> String {
        format!("SELECT * FROM \"{}\"", self.output.table_name)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(EtlError::Config(format!(
            "'{}' is not a valid table name (letters, digits and '_' only)",
            name
        )))
    }
}
