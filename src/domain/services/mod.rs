//! # Domain Services
//!
//! ## Services
//!
//! - [`rate_normalizer`]: Provider rate to canonical rate mapping

pub mod rate_normalizer;

pub use rate_normalizer::{normalize, normalize_at};
