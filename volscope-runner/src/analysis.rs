//! Per-ticker analysis pipeline: fetch → log returns → statistics → ranking.
//!
//! Tickers are processed one at a time. A failure on one ticker (network,
//! empty data, too little history) is logged and recorded, then the loop moves
//! on; it never aborts the run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use volscope_core::data::{DataError, DataProvider, DataSource};
use volscope_core::domain::PriceSeries;
use volscope_core::stats;

use crate::config::AnalysisConfig;
use crate::ranking::rank;

/// Errors from analysing a single ticker.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("{ticker}: need at least 3 prices for a volatility estimate, got {observations}")]
    InsufficientData { ticker: String, observations: usize },
}

/// Scalar statistics for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of closes used.
    pub observations: usize,
    pub daily_volatility: f64,
    pub annualized_volatility: f64,
    pub total_return: f64,
    pub sharpe_ratio: f64,
    /// Non-positive fraction, e.g. -0.25 for a 25% peak-to-trough fall.
    pub max_drawdown: f64,
}

/// Rolling annualized volatility, dated by the last return in each window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingSeries {
    pub ticker: String,
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone)]
pub struct TickerAnalysis {
    pub summary: TickerSummary,
    pub rolling: RollingSeries,
    pub source: DataSource,
}

/// A ticker that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub reason: String,
}

/// Outcome of a multi-ticker run, already ranked.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub results: Vec<TickerAnalysis>,
    pub failures: Vec<TickerFailure>,
}

impl AnalysisReport {
    /// True when no ticker produced a result.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summaries(&self) -> impl Iterator<Item = &TickerSummary> {
        self.results.iter().map(|r| &r.summary)
    }
}

/// Progress callback for multi-ticker runs.
pub trait AnalysisProgress {
    /// Called once before the first ticker.
    fn on_batch_start(&self, total: usize, start: NaiveDate, end: NaiveDate);

    /// Called when starting to fetch a ticker.
    fn on_start(&self, ticker: &str, index: usize, total: usize);

    /// Called when a ticker completes, successfully or not.
    fn on_complete(&self, ticker: &str, result: &Result<(), String>);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl AnalysisProgress for StdoutProgress {
    fn on_batch_start(&self, total: usize, start: NaiveDate, end: NaiveDate) {
        println!("Fetching data for {total} tickers from {start} to {end}...");
    }

    fn on_start(&self, ticker: &str, index: usize, total: usize) {
        println!("[{}/{}] {ticker}", index + 1, total);
    }

    fn on_complete(&self, ticker: &str, result: &Result<(), String>) {
        match result {
            Ok(()) => println!("  OK: {ticker}"),
            Err(_) => println!("  SKIPPED: {ticker}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nProcessed {succeeded}/{total} tickers, {failed} skipped");
    }
}

/// Progress reporter that stays quiet.
pub struct SilentProgress;

impl AnalysisProgress for SilentProgress {
    fn on_batch_start(&self, _total: usize, _start: NaiveDate, _end: NaiveDate) {}
    fn on_start(&self, _ticker: &str, _index: usize, _total: usize) {}
    fn on_complete(&self, _ticker: &str, _result: &Result<(), String>) {}
    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}

/// Compute all statistics for one price series.
pub fn analyze_series(
    series: &PriceSeries,
    source: DataSource,
    config: &AnalysisConfig,
) -> Result<TickerAnalysis, AnalysisError> {
    let closes = series.closes();
    let returns = stats::log_returns(&closes);

    let insufficient = || AnalysisError::InsufficientData {
        ticker: series.ticker.clone(),
        observations: series.len(),
    };
    let daily = stats::daily_volatility(&returns).ok_or_else(insufficient)?;
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(insufficient()),
    };

    let periods = config.trading_days_per_year;
    let summary = TickerSummary {
        ticker: series.ticker.clone(),
        start_date: first.date,
        end_date: last.date,
        observations: series.len(),
        daily_volatility: daily,
        annualized_volatility: stats::annualize_volatility(daily, periods),
        total_return: stats::total_return(&closes),
        sharpe_ratio: stats::sharpe_ratio(&returns, config.risk_free_rate, periods),
        max_drawdown: stats::max_drawdown(&returns),
    };

    // Return i sits on price date i + 1; window k ends on return k + window - 1.
    let dates = series.dates();
    let window = config.rolling_window;
    let points = stats::rolling_volatility(&returns, window, periods)
        .into_iter()
        .enumerate()
        .map(|(k, v)| (dates[k + window], v))
        .collect();

    Ok(TickerAnalysis {
        summary,
        rolling: RollingSeries {
            ticker: series.ticker.clone(),
            points,
        },
        source,
    })
}

/// Fetch and analyse one ticker.
pub fn analyze_ticker(
    provider: &dyn DataProvider,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    config: &AnalysisConfig,
) -> Result<TickerAnalysis, AnalysisError> {
    debug!(%ticker, provider = provider.name(), %start, %end, "fetching");
    let series = provider.fetch(ticker, start, end)?;
    analyze_series(&series, provider.source(), config)
}

/// Analyse every configured ticker over `[start, end)` and rank the results.
pub fn run_analysis(
    provider: &dyn DataProvider,
    config: &AnalysisConfig,
    start: NaiveDate,
    end: NaiveDate,
    progress: &dyn AnalysisProgress,
) -> AnalysisReport {
    let total = config.tickers.len();
    progress.on_batch_start(total, start, end);

    let mut results = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (i, ticker) in config.tickers.iter().enumerate() {
        progress.on_start(ticker, i, total);

        match analyze_ticker(provider, ticker, start, end, config) {
            Ok(analysis) => {
                info!(
                    %ticker,
                    observations = analysis.summary.observations,
                    annualized_volatility = analysis.summary.annualized_volatility,
                    "processed"
                );
                progress.on_complete(ticker, &Ok(()));
                results.push(analysis);
            }
            Err(e) => {
                warn!(%ticker, error = %e, "skipping ticker");
                let reason = e.to_string();
                progress.on_complete(ticker, &Err(reason.clone()));
                failures.push(TickerFailure {
                    ticker: ticker.clone(),
                    reason,
                });
            }
        }
    }

    progress.on_batch_complete(results.len(), failures.len(), total);

    rank(&mut results, config.sort_by, config.order);

    AnalysisReport {
        start,
        end,
        results,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volscope_core::domain::PricePoint;

    fn series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(base + chrono::Duration::days(i as i64), c))
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    fn config(window: usize) -> AnalysisConfig {
        AnalysisConfig {
            rolling_window: window,
            ..Default::default()
        }
    }

    #[test]
    fn summary_matches_formulas() {
        let s = series(&[100.0, 120.0, 90.0, 110.0]);
        let a = analyze_series(&s, DataSource::Synthetic, &config(2)).unwrap();
        let returns = stats::log_returns(&s.closes());
        let daily = stats::std_dev(&returns);

        assert_eq!(a.summary.observations, 4);
        assert!((a.summary.daily_volatility - daily).abs() < 1e-12);
        assert!((a.summary.annualized_volatility - daily * 252.0_f64.sqrt()).abs() < 1e-12);
        assert!((a.summary.total_return - 0.1).abs() < 1e-12);
        assert!((a.summary.max_drawdown - (-0.25)).abs() < 1e-10);
        assert_eq!(a.summary.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(a.summary.end_date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn rolling_points_dated_by_window_end() {
        let s = series(&[100.0, 101.0, 99.0, 102.0, 103.0]);
        let a = analyze_series(&s, DataSource::Synthetic, &config(2)).unwrap();
        // 4 returns, window 2 → 3 values; first window covers returns 0..=1 → price date 2
        assert_eq!(a.rolling.points.len(), 3);
        assert_eq!(a.rolling.points[0].0, s.dates()[2]);
        assert_eq!(a.rolling.points[2].0, s.dates()[4]);
    }

    #[test]
    fn rolling_empty_when_window_exceeds_history() {
        let s = series(&[100.0, 101.0, 99.0]);
        let a = analyze_series(&s, DataSource::Synthetic, &config(21)).unwrap();
        assert!(a.rolling.points.is_empty());
    }

    #[test]
    fn two_prices_is_insufficient() {
        let s = series(&[100.0, 101.0]);
        let err = analyze_series(&s, DataSource::Synthetic, &config(2)).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { observations: 2, .. }
        ));
    }

    #[test]
    fn data_error_message_passes_through() {
        let err: AnalysisError = DataError::SymbolNotFound {
            ticker: "ZZZZ".into(),
        }
        .into();
        assert_eq!(err.to_string(), "symbol not found: ZZZZ");
    }
}
