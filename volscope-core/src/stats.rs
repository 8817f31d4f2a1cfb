//! Risk statistics: pure functions over price and return slices.
//!
//! Every statistic is a pure function: slice in, scalar or vector out.
//! No dependencies on providers, configuration, or the runner.

/// Trading sessions per year used to annualize daily figures.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

// ─── Returns ────────────────────────────────────────────────────────

/// Log returns `ln(p[t] / p[t-1])`.
///
/// One shorter than the input: the first period has no predecessor and is dropped.
/// Empty for fewer than two prices.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return Vec::new();
    }
    prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}

/// Total return as a fraction: last / first - 1.
///
/// Returns 0.0 for fewer than two prices or a non-positive first price.
pub fn total_return(prices: &[f64]) -> f64 {
    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if prices.len() >= 2 && first > 0.0 => last / first - 1.0,
        _ => 0.0,
    }
}

/// Cumulative simple return after each period: `exp(sum of log returns) - 1`.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    returns
        .iter()
        .map(|r| {
            acc += r;
            acc.exp() - 1.0
        })
        .collect()
}

// ─── Volatility ─────────────────────────────────────────────────────

/// Daily volatility: sample standard deviation of daily log returns.
///
/// `None` for fewer than two returns.
pub fn daily_volatility(returns: &[f64]) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    Some(std_dev(returns))
}

/// Scale a per-period volatility by `sqrt(periods)`.
pub fn annualize_volatility(daily: f64, periods: u32) -> f64 {
    daily * f64::from(periods).sqrt()
}

/// Annualized volatility over a trailing window.
///
/// Element `k` covers `returns[k ..= k + window - 1]`, so it lines up with the
/// return at index `k + window - 1`. Empty when the window is shorter than two
/// or longer than the series.
pub fn rolling_volatility(returns: &[f64], window: usize, periods: u32) -> Vec<f64> {
    if window < 2 || returns.len() < window {
        return Vec::new();
    }
    returns
        .windows(window)
        .map(|w| annualize_volatility(std_dev(w), periods))
        .collect()
}

// ─── Risk-adjusted return ───────────────────────────────────────────

/// Annualized Sharpe ratio from daily log returns.
///
/// Sharpe = mean(returns - rf/periods) / std(returns) * sqrt(periods).
/// Returns 0.0 if variance is zero or fewer than 2 returns.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods: u32) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let per_period_rf = risk_free_rate / f64::from(periods);
    let excess = mean(returns) - per_period_rf;
    let std = std_dev(returns);
    if std < 1e-15 {
        return 0.0;
    }
    (excess / std) * f64::from(periods).sqrt()
}

// ─── Drawdown ───────────────────────────────────────────────────────

/// Drawdown after each period, as a non-positive fraction of the running peak.
///
/// The wealth index starts at an implied 1.0 before the first return, so a
/// loss on day one already counts as drawdown.
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let mut log_wealth = 0.0_f64;
    let mut log_peak = 0.0_f64;
    returns
        .iter()
        .map(|r| {
            log_wealth += r;
            log_peak = log_peak.max(log_wealth);
            (log_wealth - log_peak).exp() - 1.0
        })
        .collect()
}

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% drawdown).
///
/// Returns 0.0 for empty or monotonically rising series.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    drawdown_series(returns).into_iter().fold(0.0, f64::min)
}

// ─── Helpers ────────────────────────────────────────────────────────

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
