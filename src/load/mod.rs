pub mod csv_file;
pub mod database;

pub use csv_file::{load_to_csv, read_csv};
pub use database::{load_to_db, with_connection};
