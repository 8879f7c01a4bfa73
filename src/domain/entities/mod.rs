//! # Domain Entities
//!
//! Request-scoped records created fresh for every quote and discarded
//! once the response is sent.
//!
//! ## Inbound
//!
//! - [`ShipmentRequest`]: What the checkout platform asked for
//! - [`NormalizedShipment`]: The package every carrier quotes
//!
//! ## Provider
//!
//! - [`Carrier`]: Directory entry
//! - [`ProviderRate`]: Raw per-service quote
//!
//! ## Outbound
//!
//! - [`CanonicalRate`]: Caller-facing shipping option
//! - [`RateList`]: Options sorted by price

pub mod carrier;
pub mod rate;
pub mod shipment;

pub use carrier::{Carrier, ProviderRate};
pub use rate::{CanonicalRate, Currency, RateList};
pub use shipment::{
    LineItem, NormalizedShipment, PackageDimensions, ShipmentRequest, Weight, WeightUnit,
};
