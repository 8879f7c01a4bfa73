//! # Provider Ports
//!
//! Port definitions for the multi-carrier rate provider.
//!
//! - [`CarrierDirectory`] lists the carriers enabled on the account
//! - [`RateSource`] quotes one carrier for a shipment
//! - [`ShippingProvider`] combines both with a credentials check
//!
//! # Examples
//!
//! ```ignore
//! use rate_bridge::infrastructure::provider::traits::{CarrierDirectory, RateSource};
//!
//! let carriers = provider.list_active_carriers().await?;
//! for carrier in &carriers {
//!     let rates = provider.fetch_rates(carrier.code(), &shipment).await?;
//! }
//! ```

use crate::domain::entities::carrier::{Carrier, ProviderRate};
use crate::domain::entities::shipment::NormalizedShipment;
use crate::infrastructure::provider::error::ProviderResult;
use async_trait::async_trait;
use std::fmt;

/// Lists the carriers that can be quoted.
#[async_trait]
pub trait CarrierDirectory: Send + Sync + fmt::Debug {
    /// Fetches the active carriers. Makes exactly one provider call and
    /// never retries.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the listing call fails.
    /// Returns `ProviderError::MalformedResponse` if the payload is not an array.
    async fn list_active_carriers(&self) -> ProviderResult<Vec<Carrier>>;
}

/// Quotes a single carrier.
#[async_trait]
pub trait RateSource: Send + Sync + fmt::Debug {
    /// Fetches every service rate one carrier offers for the shipment.
    ///
    /// An empty vector means the carrier has no service for this shipment
    /// and is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::CarrierRate` if the provider rejects the call.
    /// Returns `ProviderError::MalformedResponse` if the payload is not an array.
    async fn fetch_rates(
        &self,
        carrier_code: &str,
        shipment: &NormalizedShipment,
    ) -> ProviderResult<Vec<ProviderRate>>;
}

/// A complete rate provider.
pub trait ShippingProvider: CarrierDirectory + RateSource {
    /// Returns true if API credentials are configured.
    fn has_credentials(&self) -> bool;

    /// Returns the provider name, for logging.
    fn name(&self) -> &'static str;
}
