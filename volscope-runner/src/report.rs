//! Report rendering and export: text table for the terminal, CSV and JSON files.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use crate::analysis::{AnalysisReport, TickerFailure, TickerSummary};

const HEADERS: [&str; 7] = [
    "Ticker",
    "Daily Vol",
    "Annual Vol",
    "Total Return",
    "Sharpe",
    "Max Drawdown",
    "Obs",
];

/// Render the ranked summary as a fixed-width table.
pub fn render_table(report: &AnalysisReport) -> String {
    let mut out = String::new();

    if report.is_empty() {
        out.push_str("No results to display.\n");
        write_failures(&mut out, &report.failures);
        return out;
    }

    let rows: Vec<[String; 7]> = report.summaries().map(format_row).collect();

    // Column width = widest of header and cells
    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let _ = writeln!(out, "--- Volatility Analysis Report ---");
    let _ = writeln!(out, "Period: {} to {}", report.start, report.end);
    let _ = writeln!(out);

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (h, &w))| align(h, w, i == 0))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").trim_end());
    let total_width = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let _ = writeln!(out, "{}", "-".repeat(total_width));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(i, (c, &w))| align(c, w, i == 0))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }

    write_failures(&mut out, &report.failures);
    out
}

fn format_row(s: &TickerSummary) -> [String; 7] {
    [
        s.ticker.clone(),
        format!("{:.4}", s.daily_volatility),
        format_pct(s.annualized_volatility),
        format_pct(s.total_return),
        format!("{:.2}", s.sharpe_ratio),
        format_pct(s.max_drawdown),
        s.observations.to_string(),
    ]
}

/// Fraction → percent with two decimals.
pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn align(cell: &str, width: usize, left: bool) -> String {
    if left {
        format!("{cell:<width$}")
    } else {
        format!("{cell:>width$}")
    }
}

fn write_failures(out: &mut String, failures: &[TickerFailure]) {
    if failures.is_empty() {
        return;
    }
    let _ = writeln!(out);
    for f in failures {
        let _ = writeln!(out, "SKIPPED {}: {}", f.ticker, f.reason);
    }
}

// ─── Export ─────────────────────────────────────────────────────────

/// JSON shape of an exported report.
#[derive(Debug, Serialize)]
struct ReportExport<'a> {
    start: NaiveDate,
    end: NaiveDate,
    summaries: Vec<&'a TickerSummary>,
    failures: &'a [TickerFailure],
}

/// Write one CSV row per ranked ticker with unformatted values.
pub fn write_csv(path: &Path, report: &AnalysisReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary CSV {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for summary in report.summaries() {
        writer
            .serialize(summary)
            .with_context(|| format!("Failed to write row for {}", summary.ticker))?;
    }
    writer.flush().context("Failed to flush summary CSV")?;
    Ok(())
}

/// Write the ranked summaries and skipped tickers as pretty JSON.
pub fn write_json(path: &Path, report: &AnalysisReport) -> Result<()> {
    let export = ReportExport {
        start: report.start,
        end: report.end,
        summaries: report.summaries().collect(),
        failures: &report.failures,
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary JSON {}", path.display()))?;
    serde_json::to_writer_pretty(file, &export).context("Failed to write summary JSON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{RollingSeries, TickerAnalysis};
    use volscope_core::data::DataSource;

    fn summary(ticker: &str, annual_vol: f64) -> TickerSummary {
        TickerSummary {
            ticker: ticker.into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            observations: 251,
            daily_volatility: 0.0189,
            annualized_volatility: annual_vol,
            total_return: 0.1234,
            sharpe_ratio: 1.5,
            max_drawdown: -0.2,
        }
    }

    fn report(summaries: Vec<TickerSummary>, failures: Vec<TickerFailure>) -> AnalysisReport {
        AnalysisReport {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            results: summaries
                .into_iter()
                .map(|s| TickerAnalysis {
                    rolling: RollingSeries {
                        ticker: s.ticker.clone(),
                        points: Vec::new(),
                    },
                    summary: s,
                    source: DataSource::Synthetic,
                })
                .collect(),
            failures,
        }
    }

    #[test]
    fn table_formats_values() {
        let table = render_table(&report(vec![summary("TSLA", 0.5512)], vec![]));
        assert!(table.starts_with("--- Volatility Analysis Report ---"));
        assert!(table.contains("Period: 2024-01-01 to 2025-01-01"));
        let row = table.lines().find(|l| l.starts_with("TSLA")).unwrap();
        assert!(row.contains("0.0189"));
        assert!(row.contains("55.12%"));
        assert!(row.contains("12.34%"));
        assert!(row.contains("1.50"));
        assert!(row.contains("-20.00%"));
        assert!(row.ends_with("251"));
    }

    #[test]
    fn table_keeps_report_order() {
        let table = render_table(&report(
            vec![summary("TSLA", 0.55), summary("AAPL", 0.25)],
            vec![],
        ));
        let tsla = table.find("TSLA").unwrap();
        let aapl = table.find("AAPL").unwrap();
        assert!(tsla < aapl);
    }

    #[test]
    fn table_lists_failures() {
        let table = render_table(&report(
            vec![summary("AAPL", 0.25)],
            vec![TickerFailure {
                ticker: "ZZZZ".into(),
                reason: "symbol not found: ZZZZ".into(),
            }],
        ));
        assert!(table.contains("SKIPPED ZZZZ: symbol not found: ZZZZ"));
    }

    #[test]
    fn empty_report_says_so() {
        let table = render_table(&report(vec![], vec![]));
        assert_eq!(table, "No results to display.\n");
    }

    #[test]
    fn columns_line_up() {
        let table = render_table(&report(
            vec![summary("A", 0.1), summary("GOOGL", 1.2345)],
            vec![],
        ));
        let header = table.lines().find(|l| l.starts_with("Ticker")).unwrap();
        let rows: Vec<&str> = table
            .lines()
            .filter(|l| l.starts_with("A ") || l.starts_with("GOOGL"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), header.len());
        assert_eq!(rows[1].len(), header.len());
    }

    #[test]
    fn format_pct_two_decimals() {
        assert_eq!(format_pct(0.123456), "12.35%");
        assert_eq!(format_pct(-0.05), "-5.00%");
    }
}
