//! Property tests for ranking.
//!
//! 1. Ordering: finite values come out monotone in the requested direction
//! 2. NaN placement: every NaN sits after every finite value
//! 3. Permutation: ranking never adds, drops or duplicates a ticker

use chrono::NaiveDate;
use proptest::prelude::*;
use volscope_core::data::DataSource;
use volscope_runner::{rank, RankingMetric, RollingSeries, SortOrder, TickerAnalysis, TickerSummary};

fn entry(i: usize, vol: f64) -> TickerAnalysis {
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let ticker = format!("T{i:03}");
    TickerAnalysis {
        summary: TickerSummary {
            ticker: ticker.clone(),
            start_date: date,
            end_date: date,
            observations: 100,
            daily_volatility: vol / 252.0_f64.sqrt(),
            annualized_volatility: vol,
            total_return: 0.0,
            sharpe_ratio: 0.0,
            max_drawdown: 0.0,
        },
        rolling: RollingSeries {
            ticker,
            points: Vec::new(),
        },
        source: DataSource::Synthetic,
    }
}

fn arb_vol() -> impl Strategy<Value = f64> {
    prop_oneof![9 => 0.0..2.0_f64, 1 => Just(f64::NAN)]
}

fn arb_order() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Ascending), Just(SortOrder::Descending)]
}

proptest! {
    #[test]
    fn finite_values_are_monotone(vols in prop::collection::vec(arb_vol(), 0..40), order in arb_order()) {
        let mut results: Vec<TickerAnalysis> =
            vols.iter().enumerate().map(|(i, &v)| entry(i, v)).collect();
        rank(&mut results, RankingMetric::AnnualizedVolatility, order);

        let finite: Vec<f64> = results
            .iter()
            .map(|r| r.summary.annualized_volatility)
            .filter(|v| !v.is_nan())
            .collect();
        for w in finite.windows(2) {
            match order {
                SortOrder::Ascending => prop_assert!(w[0] <= w[1]),
                SortOrder::Descending => prop_assert!(w[0] >= w[1]),
            }
        }
    }

    #[test]
    fn nan_values_sort_last(vols in prop::collection::vec(arb_vol(), 0..40), order in arb_order()) {
        let mut results: Vec<TickerAnalysis> =
            vols.iter().enumerate().map(|(i, &v)| entry(i, v)).collect();
        rank(&mut results, RankingMetric::AnnualizedVolatility, order);

        let first_nan = results
            .iter()
            .position(|r| r.summary.annualized_volatility.is_nan())
            .unwrap_or(results.len());
        prop_assert!(results[first_nan..]
            .iter()
            .all(|r| r.summary.annualized_volatility.is_nan()));
    }

    #[test]
    fn ranking_is_a_permutation(vols in prop::collection::vec(arb_vol(), 0..40)) {
        let mut results: Vec<TickerAnalysis> =
            vols.iter().enumerate().map(|(i, &v)| entry(i, v)).collect();
        rank(&mut results, RankingMetric::AnnualizedVolatility, SortOrder::Descending);

        let mut tickers: Vec<String> = results.iter().map(|r| r.summary.ticker.clone()).collect();
        tickers.sort();
        let expected: Vec<String> = (0..vols.len()).map(|i| format!("T{i:03}")).collect();
        prop_assert_eq!(tickers, expected);
    }
}
