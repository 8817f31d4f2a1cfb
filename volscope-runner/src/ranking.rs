//! Ranking: ordering per-ticker results by a chosen metric.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::analysis::{TickerAnalysis, TickerSummary};

/// Which metric the summary table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMetric {
    #[default]
    AnnualizedVolatility,
    DailyVolatility,
    TotalReturn,
    Sharpe,
    MaxDrawdown,
    Ticker,
}

impl RankingMetric {
    pub const ALL: [RankingMetric; 6] = [
        RankingMetric::AnnualizedVolatility,
        RankingMetric::DailyVolatility,
        RankingMetric::TotalReturn,
        RankingMetric::Sharpe,
        RankingMetric::MaxDrawdown,
        RankingMetric::Ticker,
    ];

    /// Command-line / config spelling.
    pub fn key(self) -> &'static str {
        match self {
            RankingMetric::AnnualizedVolatility => "annualized-volatility",
            RankingMetric::DailyVolatility => "daily-volatility",
            RankingMetric::TotalReturn => "total-return",
            RankingMetric::Sharpe => "sharpe",
            RankingMetric::MaxDrawdown => "max-drawdown",
            RankingMetric::Ticker => "ticker",
        }
    }

    /// Numeric value for a summary; `None` for the ticker ordering.
    pub fn value(self, summary: &TickerSummary) -> Option<f64> {
        match self {
            RankingMetric::AnnualizedVolatility => Some(summary.annualized_volatility),
            RankingMetric::DailyVolatility => Some(summary.daily_volatility),
            RankingMetric::TotalReturn => Some(summary.total_return),
            RankingMetric::Sharpe => Some(summary.sharpe_ratio),
            RankingMetric::MaxDrawdown => Some(summary.max_drawdown),
            RankingMetric::Ticker => None,
        }
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RankingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        // Short aliases people actually type
        let wanted = match wanted.as_str() {
            "vol" | "volatility" | "annual-vol" => "annualized-volatility",
            "daily-vol" => "daily-volatility",
            "return" => "total-return",
            "drawdown" | "mdd" => "max-drawdown",
            other => other,
        };
        RankingMetric::ALL
            .into_iter()
            .find(|m| m.key() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = RankingMetric::ALL.iter().map(|m| m.key()).collect();
                format!("unknown metric '{s}'. Valid: {}", valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Largest first (most volatile ticker on top).
    #[default]
    Descending,
    Ascending,
}

/// Sort results in place.
///
/// Stable: ties keep their input order. NaN values always sort last, whatever
/// the direction. Values are compared signed, so a descending drawdown ranking
/// puts the shallowest drawdown (closest to zero) first.
pub fn rank(results: &mut [TickerAnalysis], metric: RankingMetric, order: SortOrder) {
    results.sort_by(|a, b| compare(&a.summary, &b.summary, metric, order));
}

fn compare(a: &TickerSummary, b: &TickerSummary, metric: RankingMetric, order: SortOrder) -> Ordering {
    let directed = |o: Ordering| match order {
        SortOrder::Ascending => o,
        SortOrder::Descending => o.reverse(),
    };

    match (metric.value(a), metric.value(b)) {
        (Some(x), Some(y)) => match (x.is_nan(), y.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => directed(x.total_cmp(&y)),
        },
        _ => directed(a.ticker.cmp(&b.ticker)),
    }
}
