//! # Canonical Rates
//!
//! The caller-facing shipping option ([`CanonicalRate`]) and the ordered
//! list returned to the checkout platform ([`RateList`]).
//!
//! # Examples
//!
//! ```
//! use rate_bridge::domain::entities::rate::{CanonicalRate, RateList};
//!
//! let list = RateList::from_unsorted(vec![
//!     CanonicalRate::new("UPS Ground", "ups:ground", 900),
//!     CanonicalRate::new("USPS Priority", "usps:priority", 700),
//! ]);
//!
//! assert_eq!(list.cheapest().map(CanonicalRate::total_price), Some(700));
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Currency of every quoted price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    /// United States dollar.
    #[default]
    #[serde(rename = "USD")]
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
        }
    }
}

/// A normalized shipping option.
///
/// # Invariants
///
/// - `total_price` is in minor units and never negative
/// - `service_code` is `carrier:service`, unique per pair
/// - `delivery_date` is omitted from JSON when unknown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRate {
    service_name: String,
    service_code: String,
    total_price: u64,
    currency: Currency,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_millis"
    )]
    delivery_date: Option<DateTime<Utc>>,
}

impl CanonicalRate {
    /// Creates a USD rate with no delivery estimate.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        service_code: impl Into<String>,
        total_price: u64,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            service_code: service_code.into(),
            total_price,
            currency: Currency::Usd,
            delivery_date: None,
        }
    }

    /// Sets the estimated delivery instant.
    #[must_use]
    pub fn with_delivery_date(mut self, delivery_date: DateTime<Utc>) -> Self {
        self.delivery_date = Some(delivery_date);
        self
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the `carrier:service` code.
    #[inline]
    #[must_use]
    pub fn service_code(&self) -> &str {
        &self.service_code
    }

    /// Returns the price in minor units.
    #[inline]
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    /// Returns the currency.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the estimated delivery instant.
    #[inline]
    #[must_use]
    pub fn delivery_date(&self) -> Option<DateTime<Utc>> {
        self.delivery_date
    }

    /// Returns a copy with the price replaced.
    #[must_use]
    pub fn repriced(mut self, total_price: u64) -> Self {
        self.total_price = total_price;
        self
    }
}

impl fmt::Display for CanonicalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} {}",
            self.service_name, self.service_code, self.total_price, self.currency
        )
    }
}

fn serialize_millis<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

/// Shipping options ordered by ascending price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateList(Vec<CanonicalRate>);

impl RateList {
    /// Creates an empty list.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Sorts rates by price. The sort is stable: equal prices keep their
    /// input order.
    #[must_use]
    pub fn from_unsorted(mut rates: Vec<CanonicalRate>) -> Self {
        rates.sort_by_key(CanonicalRate::total_price);
        Self(rates)
    }

    /// Returns the number of rates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the cheapest rate.
    #[must_use]
    pub fn cheapest(&self) -> Option<&CanonicalRate> {
        self.0.first()
    }

    /// Iterates over the rates in order.
    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRate> {
        self.0.iter()
    }

    /// Consumes the list.
    #[must_use]
    pub fn into_inner(self) -> Vec<CanonicalRate> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RateList {
    type Item = &'a CanonicalRate;
    type IntoIter = std::slice::Iter<'a, CanonicalRate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sorts_ascending_by_price() {
        let list = RateList::from_unsorted(vec![
            CanonicalRate::new("a", "x:a", 150),
            CanonicalRate::new("b", "x:b", 50),
            CanonicalRate::new("c", "x:c", 100),
        ]);
        let prices: Vec<u64> = list.iter().map(CanonicalRate::total_price).collect();
        assert_eq!(prices, vec![50, 100, 150]);
    }

    #[test]
    fn equal_prices_keep_input_order() {
        let list = RateList::from_unsorted(vec![
            CanonicalRate::new("first", "a:1", 100),
            CanonicalRate::new("cheap", "b:1", 10),
            CanonicalRate::new("second", "c:1", 100),
        ]);
        let codes: Vec<&str> = list.iter().map(CanonicalRate::service_code).collect();
        assert_eq!(codes, vec!["b:1", "a:1", "c:1"]);
    }

    #[test]
    fn serializes_snake_case_without_missing_date() {
        let json = serde_json::to_value(CanonicalRate::new("UPS Ground", "ups:ground", 500)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "service_name": "UPS Ground",
                "service_code": "ups:ground",
                "total_price": 500,
                "currency": "USD",
            })
        );
    }

    #[test]
    fn serializes_delivery_date_with_millis() {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let rate = CanonicalRate::new("UPS Ground", "ups:ground", 500).with_delivery_date(date);
        let json = serde_json::to_value(rate).unwrap();
        assert_eq!(json["delivery_date"], "2026-10-19T08:30:00.000Z");
    }

    #[test]
    fn empty_list_serializes_as_array() {
        assert_eq!(serde_json::to_string(&RateList::empty()).unwrap(), "[]");
    }
}
