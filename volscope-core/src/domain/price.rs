//! Price series: the ordered (date, close) input to every statistic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("non-positive close {close} on {date} for {ticker}")]
    NonPositiveClose {
        ticker: String,
        date: NaiveDate,
        close: f64,
    },
}

/// Daily closes for one ticker, strictly ascending by date.
///
/// Read-only once built. The constructor is the only place ordering is enforced,
/// so every consumer can rely on `points` being sorted with unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered points.
    ///
    /// Points are sorted by date. Non-finite closes (provider gaps) are dropped.
    /// On duplicate dates the later point wins. A close `<= 0.0` is rejected
    /// since no log return can be taken from it.
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let ticker = ticker.into();

        points.retain(|p| p.close.is_finite());
        if let Some(bad) = points.iter().find(|p| p.close <= 0.0) {
            return Err(SeriesError::NonPositiveClose {
                ticker,
                date: bad.date,
                close: bad.close,
            });
        }

        // Stable sort keeps arrival order within a date, so the last one survives dedup.
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for p in points {
            match deduped.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => deduped.push(p),
            }
        }

        Ok(Self {
            ticker,
            points: deduped,
        })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}
