//! # Rate Aggregation Engine
//!
//! Orchestrates multi-carrier rate collection.
//!
//! This module provides the [`RateAggregationEngine`], which runs the
//! quoting pipeline for one checkout request:
//!
//! 1. Check that provider credentials are configured
//! 2. Build one [`NormalizedShipment`] shared by every carrier
//! 3. List the active carriers (a failure here aborts the request)
//! 4. Fetch and normalize each carrier's rates concurrently; a failing or
//!    slow carrier contributes no rates and never affects the others
//! 5. Apply the configured markup to each rate
//! 6. Sort by price, ties kept in carrier-then-service order
//!
//! [`RateAggregationEngine::quote_or_empty`] turns every pipeline failure
//! into an empty list, which is what the checkout platform receives.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::carrier::Carrier;
use crate::domain::entities::rate::{CanonicalRate, RateList};
use crate::domain::entities::shipment::{
    LineItem, NormalizedShipment, PackageDimensions, ShipmentRequest,
};
use crate::domain::services::rate_normalizer::normalize;
use crate::domain::value_objects::address::PostalAddress;
use crate::domain::value_objects::units::apply_markup;
use crate::infrastructure::provider::error::ProviderError;
use crate::infrastructure::provider::traits::ShippingProvider;
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Configuration for rate aggregation.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Ship-from address applied to every request.
    pub origin: PostalAddress,
    /// Package dimensions sent with every rate request.
    pub dimensions: PackageDimensions,
    /// Whether destinations are quoted as residential.
    pub residential: bool,
    /// Markup applied to every rate, in percent.
    pub markup_percent: Decimal,
    /// Per-carrier timeout in milliseconds.
    pub per_carrier_timeout_ms: u64,
    /// Maximum number of carriers quoted at once.
    pub max_concurrent_carriers: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            origin: PostalAddress::default(),
            dimensions: PackageDimensions::default(),
            residential: true,
            markup_percent: Decimal::ZERO,
            per_carrier_timeout_ms: 10000,
            max_concurrent_carriers: 8,
        }
    }
}

impl AggregationConfig {
    /// Creates a configuration shipping from `origin`.
    #[must_use]
    pub fn with_origin(origin: PostalAddress) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    /// Sets the package dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: PackageDimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets whether destinations are residential.
    #[must_use]
    pub fn with_residential(mut self, residential: bool) -> Self {
        self.residential = residential;
        self
    }

    /// Sets the markup percentage.
    #[must_use]
    pub fn with_markup_percent(mut self, percent: Decimal) -> Self {
        self.markup_percent = percent;
        self
    }

    /// Sets the per-carrier timeout.
    #[must_use]
    pub fn with_per_carrier_timeout(mut self, timeout_ms: u64) -> Self {
        self.per_carrier_timeout_ms = timeout_ms;
        self
    }

    /// Sets the concurrency bound. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_carriers(mut self, max: usize) -> Self {
        self.max_concurrent_carriers = max;
        self
    }
}

/// Result of rate aggregation.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Rates sorted by price.
    pub rates: RateList,
    /// Number of carriers quoted.
    pub carriers_queried: usize,
    /// Number of carriers that answered successfully.
    pub carriers_responded: usize,
    /// Codes of carriers whose rates were dropped.
    pub failed_carriers: Vec<String>,
}

impl AggregationResult {
    /// Returns true if at least one carrier failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed_carriers.is_empty()
    }
}

/// A normalized rate tagged with its position in fetch order.
#[derive(Debug)]
struct CollectedRate {
    carrier_index: usize,
    service_index: usize,
    rate: CanonicalRate,
}

/// Engine for collecting and ranking shipping rates across carriers.
#[derive(Debug)]
pub struct RateAggregationEngine {
    provider: Arc<dyn ShippingProvider>,
    config: AggregationConfig,
}

impl RateAggregationEngine {
    /// Creates a new RateAggregationEngine.
    ///
    /// # Arguments
    ///
    /// * `provider` - Carrier directory and rate source.
    /// * `config` - Origin, package, markup and fan-out settings.
    #[must_use]
    pub fn new(provider: Arc<dyn ShippingProvider>, config: AggregationConfig) -> Self {
        Self { provider, config }
    }

    /// Creates a new engine with default configuration.
    #[must_use]
    pub fn with_defaults(provider: Arc<dyn ShippingProvider>) -> Self {
        Self::new(provider, AggregationConfig::default())
    }

    /// Builds a request to `destination` from the configured origin.
    #[must_use]
    pub fn request_for(&self, destination: PostalAddress, items: Vec<LineItem>) -> ShipmentRequest {
        ShipmentRequest::new(self.config.origin.clone(), destination, items)
    }

    /// Runs the pipeline, degrading any failure to an empty list.
    pub async fn quote_or_empty(&self, request: &ShipmentRequest) -> RateList {
        match self.quote(request).await {
            Ok(result) => result.rates,
            Err(e) => {
                tracing::error!(error = %e, "rate aggregation failed; returning no rates");
                RateList::empty()
            }
        }
    }

    /// Collects rates from all carriers and ranks them.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Provider credentials are not configured
    /// - The carrier listing fails or is malformed
    pub async fn quote(&self, request: &ShipmentRequest) -> ApplicationResult<AggregationResult> {
        if !self.provider.has_credentials() {
            return Err(ApplicationError::configuration(format!(
                "{} credentials are not configured",
                self.provider.name()
            )));
        }

        let shipment = NormalizedShipment::build(
            request,
            self.config.dimensions.clone(),
            self.config.residential,
        );
        tracing::debug!(
            weight_oz = shipment.total_weight().value,
            destination = %shipment.destination(),
            "built shipment"
        );

        let carriers = self.list_carriers().await?;
        let quotable: Vec<(usize, String)> = carriers
            .iter()
            .enumerate()
            .filter(|(_, carrier)| carrier.is_quotable())
            .map(|(index, carrier)| (index, carrier.code().trim().to_string()))
            .collect();
        let carriers_queried = quotable.len();

        let (mut collected, failed_carriers) = self
            .collect_from_carriers(quotable, Arc::new(shipment))
            .await;

        if !self.config.markup_percent.is_zero() {
            for item in &mut collected {
                let price = apply_markup(item.rate.total_price(), self.config.markup_percent);
                item.rate = item.rate.clone().repriced(price);
            }
        }

        collected.sort_by_key(|c| (c.carrier_index, c.service_index));
        let rates = RateList::from_unsorted(collected.into_iter().map(|c| c.rate).collect());

        tracing::info!(
            carriers = carriers_queried,
            failed = failed_carriers.len(),
            rates = rates.len(),
            "aggregated shipping rates"
        );

        Ok(AggregationResult {
            rates,
            carriers_queried,
            carriers_responded: carriers_queried - failed_carriers.len(),
            failed_carriers,
        })
    }

    async fn list_carriers(&self) -> ApplicationResult<Vec<Carrier>> {
        let limit = Duration::from_millis(self.config.per_carrier_timeout_ms);
        match timeout(limit, self.provider.list_active_carriers()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ProviderError::unavailable("carrier listing timed out").into()),
        }
    }

    /// Quotes carriers concurrently. Results are tagged with the carrier's
    /// position in the directory listing, not completion order.
    async fn collect_from_carriers(
        &self,
        carriers: Vec<(usize, String)>,
        shipment: Arc<NormalizedShipment>,
    ) -> (Vec<CollectedRate>, Vec<String>) {
        let timeout_ms = self.config.per_carrier_timeout_ms;
        let limit = Duration::from_millis(timeout_ms);

        let outcomes: Vec<_> = stream::iter(carriers)
            .map(|(carrier_index, code)| {
                let provider = Arc::clone(&self.provider);
                let shipment = Arc::clone(&shipment);
                async move {
                    let outcome =
                        match timeout(limit, provider.fetch_rates(&code, &shipment)).await {
                            Ok(result) => result,
                            Err(_) => Err(ProviderError::timeout_with_duration(
                                format!("rate request for {} timed out", code),
                                timeout_ms,
                            )),
                        };
                    (carrier_index, code, outcome)
                }
            })
            .buffer_unordered(self.config.max_concurrent_carriers.max(1))
            .collect()
            .await;

        let mut collected = Vec::new();
        let mut failed = Vec::new();

        for (carrier_index, code, outcome) in outcomes {
            match outcome {
                Ok(rates) => {
                    collected.extend(rates.iter().enumerate().map(|(service_index, rate)| {
                        CollectedRate {
                            carrier_index,
                            service_index,
                            rate: normalize(rate),
                        }
                    }));
                }
                Err(e) => {
                    tracing::warn!(carrier_code = %code, error = %e, "carrier rate fetch failed");
                    failed.push(code);
                }
            }
        }

        (collected, failed)
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }
}
