//! Integration tests for the multi-ticker pipeline.
//!
//! A fixed in-memory provider stands in for the network so the tests cover
//! fetch → statistics → ranking → report without any I/O besides temp files.

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;

use volscope_core::data::{DataError, DataProvider, DataSource, SyntheticProvider};
use volscope_core::domain::{PricePoint, PriceSeries};
use volscope_runner::{
    render_table, run_analysis, write_csv, write_json, AnalysisConfig, AnalysisProgress,
    RankingMetric, SilentProgress, SortOrder,
};

struct FixedProvider {
    series: HashMap<String, Vec<f64>>,
}

impl FixedProvider {
    fn new(entries: &[(&str, &[f64])]) -> Self {
        Self {
            series: entries
                .iter()
                .map(|(t, closes)| (t.to_string(), closes.to_vec()))
                .collect(),
        }
    }
}

impl DataProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
        let closes = self.series.get(ticker).ok_or_else(|| DataError::SymbolNotFound {
            ticker: ticker.to_string(),
        })?;
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + chrono::Duration::days(i as i64), c))
            .filter(|p| p.date < end)
            .collect();
        let series = PriceSeries::new(ticker, points)?;
        if series.is_empty() {
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
                start,
                end,
            });
        }
        Ok(series)
    }
}

fn range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    )
}

fn config(tickers: &[&str]) -> AnalysisConfig {
    AnalysisConfig {
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        rolling_window: 3,
        ..Default::default()
    }
}

const CALM: &[f64] = &[100.0, 100.5, 100.2, 100.8, 101.0, 100.7, 101.2];
const WILD: &[f64] = &[100.0, 110.0, 95.0, 115.0, 90.0, 120.0, 100.0];
const MILD: &[f64] = &[100.0, 102.0, 99.0, 103.0, 100.0, 104.0, 101.0];

#[test]
fn ranks_by_annualized_volatility_descending() {
    let provider = FixedProvider::new(&[("CALM", CALM), ("WILD", WILD), ("MILD", MILD)]);
    let (start, end) = range();
    let report = run_analysis(
        &provider,
        &config(&["CALM", "WILD", "MILD"]),
        start,
        end,
        &SilentProgress,
    );

    let order: Vec<&str> = report.summaries().map(|s| s.ticker.as_str()).collect();
    assert_eq!(order, vec!["WILD", "MILD", "CALM"]);
    assert!(report.failures.is_empty());
    for r in &report.results {
        assert_eq!(r.summary.observations, 7);
        assert_eq!(r.source, DataSource::CsvImport);
        // 6 returns, window 3 → 4 rolling points
        assert_eq!(r.rolling.points.len(), 4);
    }
}

#[test]
fn failing_ticker_is_skipped_not_fatal() {
    let provider = FixedProvider::new(&[("CALM", CALM), ("WILD", WILD)]);
    let (start, end) = range();
    let report = run_analysis(
        &provider,
        &config(&["CALM", "ZZZZ", "WILD"]),
        start,
        end,
        &SilentProgress,
    );

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].ticker, "ZZZZ");
    assert!(report.failures[0].reason.contains("not found"));

    let table = render_table(&report);
    assert!(table.contains("SKIPPED ZZZZ"));
    assert!(table.contains("WILD"));
}

#[test]
fn too_short_history_is_a_failure() {
    let provider = FixedProvider::new(&[("ONE", &[100.0]), ("TWO", &[100.0, 101.0])]);
    let (start, end) = range();
    let report = run_analysis(&provider, &config(&["ONE", "TWO"]), start, end, &SilentProgress);

    assert!(report.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(render_table(&report).lines().next(), Some("No results to display."));
}

#[test]
fn ascending_sharpe_ordering_is_honoured() {
    let provider = FixedProvider::new(&[("CALM", CALM), ("WILD", WILD), ("MILD", MILD)]);
    let (start, end) = range();
    let mut cfg = config(&["CALM", "WILD", "MILD"]);
    cfg.sort_by = RankingMetric::Sharpe;
    cfg.order = SortOrder::Ascending;
    let report = run_analysis(&provider, &cfg, start, end, &SilentProgress);

    let sharpes: Vec<f64> = report.summaries().map(|s| s.sharpe_ratio).collect();
    assert!(sharpes.windows(2).all(|w| w[0] <= w[1]), "{sharpes:?}");
}

#[derive(Default)]
struct RecordingProgress {
    events: RefCell<Vec<String>>,
}

impl AnalysisProgress for RecordingProgress {
    fn on_batch_start(&self, total: usize, _start: NaiveDate, _end: NaiveDate) {
        self.events.borrow_mut().push(format!("batch:{total}"));
    }
    fn on_start(&self, ticker: &str, index: usize, _total: usize) {
        self.events.borrow_mut().push(format!("start:{index}:{ticker}"));
    }
    fn on_complete(&self, ticker: &str, result: &Result<(), String>) {
        let tag = if result.is_ok() { "ok" } else { "err" };
        self.events.borrow_mut().push(format!("{tag}:{ticker}"));
    }
    fn on_batch_complete(&self, succeeded: usize, failed: usize, _total: usize) {
        self.events.borrow_mut().push(format!("done:{succeeded}:{failed}"));
    }
}

#[test]
fn progress_sees_every_ticker_in_input_order() {
    let provider = FixedProvider::new(&[("CALM", CALM)]);
    let (start, end) = range();
    let progress = RecordingProgress::default();
    run_analysis(&provider, &config(&["CALM", "NOPE"]), start, end, &progress);

    assert_eq!(
        progress.events.into_inner(),
        vec![
            "batch:2",
            "start:0:CALM",
            "ok:CALM",
            "start:1:NOPE",
            "err:NOPE",
            "done:1:1",
        ]
    );
}

#[test]
fn synthetic_provider_feeds_the_pipeline() {
    let provider = SyntheticProvider::default();
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let cfg = AnalysisConfig {
        tickers: vec!["AAA".into(), "BBB".into()],
        ..Default::default()
    };
    let report = run_analysis(&provider, &cfg, start, end, &SilentProgress);

    assert_eq!(report.results.len(), 2);
    for r in &report.results {
        assert_eq!(r.source, DataSource::Synthetic);
        assert!(r.summary.annualized_volatility > 0.0);
        assert!(r.summary.max_drawdown <= 0.0);
        assert_eq!(r.rolling.points.len(), r.summary.observations - 21);
    }
}

#[test]
fn exports_write_ranked_rows() {
    let provider = FixedProvider::new(&[("CALM", CALM), ("WILD", WILD)]);
    let (start, end) = range();
    let report = run_analysis(&provider, &config(&["CALM", "WILD", "GONE"]), start, end, &SilentProgress);

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("summary.csv");
    let json_path = dir.path().join("summary.json");
    write_csv(&csv_path, &report).unwrap();
    write_json(&json_path, &report).unwrap();

    let csv_text = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_text.lines().collect();
    assert!(lines[0].starts_with("ticker,start_date,end_date,observations"));
    assert!(lines[1].starts_with("WILD,"));
    assert!(lines[2].starts_with("CALM,"));
    assert_eq!(lines.len(), 3);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["start"], "2024-01-01");
    assert_eq!(json["summaries"][0]["ticker"], "WILD");
    assert_eq!(json["failures"][0]["ticker"], "GONE");
}

#[test]
fn export_to_missing_directory_reports_path() {
    let provider = FixedProvider::new(&[("CALM", CALM)]);
    let (start, end) = range();
    let report = run_analysis(&provider, &config(&["CALM"]), start, end, &SilentProgress);

    let err = write_csv(std::path::Path::new("/no/such/dir/out.csv"), &report).unwrap_err();
    assert!(format!("{err:#}").contains("/no/such/dir/out.csv"));
}
