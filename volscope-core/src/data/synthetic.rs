//! Synthetic price provider for demos and offline development.
//!
//! Produces a geometric random walk from a starting price of 100.0, one close
//! per weekday. The RNG is seeded from the ticker name, so the same ticker and
//! range always yield the same series. Results are tagged `DataSource::Synthetic`.

use super::provider::{non_empty, DataError, DataProvider, DataSource};
use crate::domain::{PricePoint, PriceSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    /// Mean daily log return.
    pub drift: f64,
    /// Half-width of the uniform daily shock; std of the shock is `amplitude / sqrt(3)`.
    pub amplitude: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            drift: 0.0003,
            amplitude: 0.03,
        }
    }
}

impl SyntheticProvider {
    pub fn generate(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
        // Deterministic seed from ticker name
        let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut points = Vec::new();
        let mut price = 100.0_f64;
        let mut current = start;

        while current < end {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                points.push(PricePoint::new(current, price));
                // Zero, negative or non-finite amplitude means a pure drift path
                let shock: f64 = if self.amplitude.is_finite() && self.amplitude > 0.0 {
                    rng.gen_range(-self.amplitude..self.amplitude)
                } else {
                    0.0
                };
                price *= (self.drift + shock).exp();
            }
            current += chrono::Duration::days(1);
        }

        points
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let points = self.generate(ticker, start, end);
        non_empty(PriceSeries::new(ticker, points)?, start, end)
    }
}
