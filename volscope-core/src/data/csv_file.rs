//! CSV price provider: offline analysis from exported price files.
//!
//! Reads `<dir>/<TICKER>.csv`. The header must contain `date` and `close`;
//! an `adj_close` column is preferred when present and non-empty. Header
//! matching is case-insensitive and ignores spaces, so Yahoo's own
//! `Date,Open,High,Low,Close,Adj Close,Volume` export loads as-is.

use super::provider::{non_empty, DataError, DataProvider, DataSource};
use crate::domain::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use std::io::Read;
use std::path::PathBuf;

pub struct CsvProvider {
    dir: PathBuf,
    adjusted: bool,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            adjusted: true,
        }
    }

    /// Ignore the adjusted-close column even when the file has one.
    pub fn adjusted(mut self, adjusted: bool) -> Self {
        self.adjusted = adjusted;
        self
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    /// Parse CSV rows into points within `[start, end)`.
    pub fn parse<R: Read>(
        reader: R,
        start: NaiveDate,
        end: NaiveDate,
        adjusted: bool,
    ) -> Result<Vec<PricePoint>, DataError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| normalize_header(h) == name)
        };
        let date_col = column("date")
            .ok_or_else(|| DataError::ResponseFormatChanged("CSV has no 'date' column".into()))?;
        let close_col = column("close")
            .ok_or_else(|| DataError::ResponseFormatChanged("CSV has no 'close' column".into()))?;
        let adj_col = if adjusted { column("adjclose") } else { None };

        let mut points = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let raw_date = record.get(date_col).unwrap_or_default();
            let date = parse_date(raw_date).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("unparseable date '{raw_date}'"))
            })?;
            if date < start || date >= end {
                continue;
            }

            let adj = adj_col
                .and_then(|i| record.get(i))
                .and_then(|v| v.parse::<f64>().ok());
            let close = record.get(close_col).and_then(|v| v.parse::<f64>().ok());

            // Empty or "null" cells are gaps, not errors.
            if let Some(close) = adj.or(close) {
                points.push(PricePoint::new(date, close));
            }
        }
        Ok(points)
    }
}

fn normalize_header(h: &str) -> String {
    h.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                ticker: ticker.to_string(),
            });
        }
        let file = std::fs::File::open(&path)?;
        let points = Self::parse(file, start, end, self.adjusted)?;
        non_empty(PriceSeries::new(ticker, points)?, start, end)
    }
}
