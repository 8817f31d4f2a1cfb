//! volscope runner: analysis pipeline, ranking, configuration, reports.
//!
//! This crate builds on `volscope-core` to provide:
//! - Sequential per-ticker analysis with per-ticker failure isolation
//! - Ranking by any summary metric
//! - TOML configuration with defaults
//! - Text table rendering and CSV/JSON export

pub mod analysis;
pub mod config;
pub mod ranking;
pub mod report;

pub use analysis::{
    analyze_series, analyze_ticker, run_analysis, AnalysisError, AnalysisProgress,
    AnalysisReport, RollingSeries, SilentProgress, StdoutProgress, TickerAnalysis, TickerFailure,
    TickerSummary,
};
pub use config::{AnalysisConfig, ConfigError};
pub use ranking::{rank, RankingMetric, SortOrder};
pub use report::{render_table, write_csv, write_json};
