//! volscope core: price series, market-data providers, risk statistics.
//!
//! This crate contains everything below the pipeline:
//! - Domain types (price points, ordered price series)
//! - Data providers (Yahoo Finance, CSV files, synthetic walks) behind one trait
//! - Closed-form statistics over price and log-return series

pub mod data;
pub mod domain;
pub mod stats;
