//! # Application Services
//!
//! - [`RateAggregationEngine`]: Concurrent multi-carrier rate collection

pub mod rate_aggregation;

pub use rate_aggregation::{AggregationConfig, AggregationResult, RateAggregationEngine};
