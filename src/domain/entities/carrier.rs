//! # Carrier Entities
//!
//! Provider-side records: the [`Carrier`] directory entry and the raw
//! [`ProviderRate`] quote for one carrier service.
//!
//! Both are fetched fresh for every request and never cached.
//!
//! # Examples
//!
//! ```
//! use rate_bridge::domain::entities::carrier::ProviderRate;
//! use rust_decimal::Decimal;
//!
//! let rate = ProviderRate::new()
//!     .with_carrier_code("ups")
//!     .with_service_code("ups_ground")
//!     .with_shipment_cost(Decimal::new(1250, 2));
//!
//! assert_eq!(rate.amount(), Decimal::new(1250, 2));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A carrier account enabled on the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    code: String,
    name: Option<String>,
    account_number: Option<String>,
}

impl Carrier {
    /// Creates a carrier with only a code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: None,
            account_number: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the provider account number.
    #[must_use]
    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    /// Returns the carrier code.
    #[inline]
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the display name, if the provider sent one.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the account number, if the provider sent one.
    #[inline]
    #[must_use]
    pub fn account_number(&self) -> Option<&str> {
        self.account_number.as_deref()
    }

    /// Returns true if the carrier can be quoted, i.e. its code is not blank.
    #[must_use]
    pub fn is_quotable(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

/// A raw quote for one (carrier, service) pair.
///
/// Every field is optional: providers omit fields freely and the
/// normalizer falls back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRate {
    carrier_code: Option<String>,
    carrier_name: Option<String>,
    service_code: Option<String>,
    service_name: Option<String>,
    shipment_cost: Option<Decimal>,
    other_cost: Option<Decimal>,
    delivery_days: Option<u32>,
}

impl ProviderRate {
    /// Creates an empty rate record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the carrier code.
    #[must_use]
    pub fn with_carrier_code(mut self, code: impl Into<String>) -> Self {
        self.carrier_code = Some(code.into());
        self
    }

    /// Sets the carrier display name.
    #[must_use]
    pub fn with_carrier_name(mut self, name: impl Into<String>) -> Self {
        self.carrier_name = Some(name.into());
        self
    }

    /// Sets the service code.
    #[must_use]
    pub fn with_service_code(mut self, code: impl Into<String>) -> Self {
        self.service_code = Some(code.into());
        self
    }

    /// Sets the service display name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Sets the primary cost, in major currency units.
    #[must_use]
    pub fn with_shipment_cost(mut self, cost: Decimal) -> Self {
        self.shipment_cost = Some(cost);
        self
    }

    /// Sets the secondary cost, in major currency units.
    #[must_use]
    pub fn with_other_cost(mut self, cost: Decimal) -> Self {
        self.other_cost = Some(cost);
        self
    }

    /// Sets the transit time in whole days.
    #[must_use]
    pub fn with_delivery_days(mut self, days: u32) -> Self {
        self.delivery_days = Some(days);
        self
    }

    /// Returns the carrier code.
    #[inline]
    #[must_use]
    pub fn carrier_code(&self) -> Option<&str> {
        self.carrier_code.as_deref()
    }

    /// Returns the carrier display name.
    #[inline]
    #[must_use]
    pub fn carrier_name(&self) -> Option<&str> {
        self.carrier_name.as_deref()
    }

    /// Returns the service code.
    #[inline]
    #[must_use]
    pub fn service_code(&self) -> Option<&str> {
        self.service_code.as_deref()
    }

    /// Returns the service display name.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    /// Returns the transit time in days.
    #[inline]
    #[must_use]
    pub fn delivery_days(&self) -> Option<u32> {
        self.delivery_days
    }

    /// Returns the quoted amount in major units: the primary cost, else the
    /// secondary cost, else zero.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.shipment_cost
            .or(self.other_cost)
            .unwrap_or(Decimal::ZERO)
    }
}
