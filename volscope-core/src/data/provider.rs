//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over price sources (Yahoo Finance, CSV files,
//! synthetic walks) so the pipeline can swap implementations and mock for tests.
//! Providers neither cache nor retry: each `fetch` is exactly one attempt.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceSeries, SeriesError};

/// Structured error types for data operations.
///
/// Each one is reported per ticker and never aborts a multi-ticker run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} for {ticker}")]
    Http { ticker: String, status: u16 },

    #[error("symbol not found: {ticker}")]
    SymbolNotFound { ticker: String },

    #[error("no data for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid price: {0}")]
    InvalidPrice(#[from] SeriesError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::YahooFinance => "yahoo",
            DataSource::CsvImport => "csv",
            DataSource::Synthetic => "synthetic",
        }
    }
}

/// Trait for price providers.
///
/// `end` is exclusive: a request for `[2024-01-01, 2024-02-01)` never returns
/// a February close.
pub trait DataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Which source tag results from this provider carry.
    fn source(&self) -> DataSource;

    /// Fetch daily closes for a ticker over a date range.
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries, DataError>;
}

/// Turn an empty series into `NoData`; providers call this before returning.
pub(crate) fn non_empty(
    series: PriceSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, DataError> {
    if series.is_empty() {
        return Err(DataError::NoData {
            ticker: series.ticker,
            start,
            end,
        });
    }
    Ok(series)
}
