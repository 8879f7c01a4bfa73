//! # Rate Provider
//!
//! Integration with the multi-carrier rate provider.
//!
//! ## Ports
//!
//! - [`CarrierDirectory`], [`RateSource`], [`ShippingProvider`]
//!
//! ## Adapters
//!
//! - [`ShipStationClient`]: ShipStation REST API
//! - [`HttpClient`]: Authenticated JSON transport

pub mod error;
pub mod http_client;
pub mod shipstation;
pub mod traits;

pub use error::{ProviderError, ProviderResult};
pub use http_client::HttpClient;
pub use shipstation::ShipStationClient;
pub use traits::{CarrierDirectory, RateSource, ShippingProvider};
