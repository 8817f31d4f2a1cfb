//! Serializable analysis configuration.
//!
//! Resolution order: built-in defaults, then a TOML file, then CLI flags
//! (the CLI applies its overrides on top of whatever this module loads).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use volscope_core::stats::TRADING_DAYS_PER_YEAR;

use crate::ranking::{RankingMetric, SortOrder};

/// Tickers analysed when none are given: a tech giant, a bank, a retailer,
/// an EV maker and two more large caps.
pub const DEFAULT_TICKERS: [&str; 6] = ["AAPL", "MSFT", "JPM", "WMT", "TSLA", "GOOG"];

/// Two years of history by default.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365 * 2;

/// Roughly one trading month.
pub const DEFAULT_ROLLING_WINDOW: usize = 21;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything one analysis run needs besides the data provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Ticker symbols, processed in this order.
    pub tickers: Vec<String>,

    /// First day of history (inclusive). Defaults to `end - lookback_days`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,

    /// Last day of history (exclusive). Defaults to today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,

    /// Calendar days of history when `start` is not set.
    pub lookback_days: i64,

    /// Periods per year used to annualize volatility and Sharpe.
    pub trading_days_per_year: u32,

    /// Returns per rolling-volatility window.
    pub rolling_window: usize,

    /// Annual risk-free rate subtracted in the Sharpe ratio.
    pub risk_free_rate: f64,

    /// Use split/dividend-adjusted closes where the provider has them.
    pub adjusted_close: bool,

    pub sort_by: RankingMetric,
    pub order: SortOrder,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            start: None,
            end: None,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            risk_free_rate: 0.0,
            adjusted_close: true,
            sort_by: RankingMetric::default(),
            order: SortOrder::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve the half-open `[start, end)` range against today's date.
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        let end = self.end.unwrap_or(today);
        let start = match self.start {
            Some(start) => start,
            None => chrono::TimeDelta::try_days(self.lookback_days)
                .and_then(|lookback| end.checked_sub_signed(lookback))
                .ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "lookback_days out of range: {}",
                        self.lookback_days
                    ))
                })?,
        };
        Ok((start, end))
    }

    /// Normalise tickers (trim, upper-case, drop blanks and repeats) and check bounds.
    pub fn validate(&mut self, today: NaiveDate) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        self.tickers = self
            .tickers
            .iter()
            .map(|t| t.trim().to_ascii_uppercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect();

        if self.tickers.is_empty() {
            return Err(ConfigError::Invalid("no tickers given".into()));
        }
        if self.rolling_window < 2 {
            return Err(ConfigError::Invalid(format!(
                "rolling_window must be at least 2, got {}",
                self.rolling_window
            )));
        }
        if self.trading_days_per_year == 0 {
            return Err(ConfigError::Invalid(
                "trading_days_per_year must be positive".into(),
            ));
        }
        if self.lookback_days <= 0 {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be positive, got {}",
                self.lookback_days
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ConfigError::Invalid("risk_free_rate must be finite".into()));
        }
        let (start, end) = self.date_range(today)?;
        if start >= end {
            return Err(ConfigError::Invalid(format!(
                "start date {start} must be before end date {end}"
            )));
        }
        Ok(())
    }
}
