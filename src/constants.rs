/// Column names used across the CSV file, the database table and printed output.
pub const COL_NAME: &str = "Name";
pub const COL_USD: &str = "MC_USD_Billion";
pub const COL_GBP: &str = "MC_GBP_Billion";
pub const COL_EUR: &str = "MC_EUR_Billion";
pub const COL_INR: &str = "MC_INR_Billion";

/// Columns present after extraction.
pub const EXTRACT_ATTRIBUTES: [&str; 2] = [COL_NAME, COL_USD];

/// Columns present after transformation. Extends `EXTRACT_ATTRIBUTES` without reordering.
pub const FINAL_ATTRIBUTES: [&str; 5] = [COL_NAME, COL_USD, COL_GBP, COL_EUR, COL_INR];

// Archived snapshot so the table layout stays stable
pub const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_CSV_PATH: &str = "./Largest_banks_data.csv";
pub const DEFAULT_DB_PATH: &str = "Banks.db";
pub const DEFAULT_TABLE_NAME: &str = "Largest_banks";
pub const DEFAULT_PROGRESS_LOG_PATH: &str = "./code_log.txt";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_CONFIG_FILE: &str = "banks_etl.toml";

pub const DEFAULT_GBP_RATE: f64 = 0.79;
pub const DEFAULT_EUR_RATE: f64 = 0.93;
pub const DEFAULT_INR_RATE: f64 = 83.02;

/// Number of query rows printed after a pipeline run.
pub const DEFAULT_HEAD_ROWS: usize = 5;

/// `strftime` layout of progress log timestamps, e.g. `2024-Mar-05-14:02:09`.
pub const PROGRESS_TIMESTAMP_FORMAT: &str = "%Y-%h-%d-%H:%M:%S";
