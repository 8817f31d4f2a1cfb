//! Market-data providers

pub mod csv_file;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_file::CsvProvider;
pub use provider::{DataError, DataProvider, DataSource};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
