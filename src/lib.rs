//! # Rate Bridge
//!
//! Shipping-rate bridge between an e-commerce checkout and a multi-carrier
//! rate provider.
//!
//! A checkout rate request is turned into one normalized shipment, quoted
//! against every active carrier concurrently, normalized, marked up and
//! returned cheapest first. A failing carrier only removes its own rates;
//! any other failure yields an empty list rather than an error.
//!
//! ## Layers
//!
//! - [`domain`]: Shipments, carriers, rates, unit conversion, normalization
//! - [`application`]: The aggregation pipeline
//! - [`infrastructure`]: Provider HTTP client
//! - [`api`]: axum REST surface
//! - [`config`]: Process configuration
//! - [`telemetry`]: Tracing setup

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use api::rest::{AppState, create_router};
pub use application::services::{AggregationConfig, RateAggregationEngine};
pub use config::BridgeConfig;
