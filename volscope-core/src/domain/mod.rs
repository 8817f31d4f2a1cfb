//! Domain types for volscope

pub mod price;

pub use price::{PricePoint, PriceSeries, SeriesError};

/// Ticker symbol type alias
pub type Ticker = String;
