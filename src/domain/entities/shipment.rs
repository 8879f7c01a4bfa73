//! # Shipment Entities
//!
//! The inbound [`ShipmentRequest`] and the provider-facing
//! [`NormalizedShipment`] derived from it.
//!
//! A `NormalizedShipment` is built once per request and shared read-only
//! by every carrier call, so all carriers quote the same package.
//!
//! # Examples
//!
//! ```
//! use rate_bridge::domain::entities::shipment::{
//!     LineItem, NormalizedShipment, PackageDimensions, ShipmentRequest,
//! };
//! use rate_bridge::domain::value_objects::address::PostalAddress;
//!
//! let request = ShipmentRequest::new(
//!     PostalAddress::new("94107", "CA", "US"),
//!     PostalAddress::new("10001", "NY", "US"),
//!     vec![LineItem::new(250.0), LineItem::new(250.0)],
//! );
//! let shipment = NormalizedShipment::build(&request, PackageDimensions::default(), true);
//! assert_eq!(shipment.total_weight().value, 17.64);
//! ```

use crate::domain::value_objects::address::PostalAddress;
use crate::domain::value_objects::units::mass_to_ounces;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default package length in inches.
const DEFAULT_LENGTH: f64 = 12.0;

/// Default package width in inches.
const DEFAULT_WIDTH: f64 = 8.0;

/// Default package height in inches.
const DEFAULT_HEIGHT: f64 = 4.0;

/// One line of the cart. Only its mass matters for rating.
///
/// Built only through [`LineItem::new`], so the mass is always finite and
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem {
    mass_grams: f64,
}

impl LineItem {
    /// Creates a line item. Negative or non-finite masses count as zero.
    #[must_use]
    pub fn new(mass_grams: f64) -> Self {
        let mass_grams = if mass_grams.is_finite() && mass_grams > 0.0 {
            mass_grams
        } else {
            0.0
        };
        Self { mass_grams }
    }

    /// Returns the mass in grams (never negative).
    #[inline]
    #[must_use]
    pub fn mass_grams(&self) -> f64 {
        self.mass_grams
    }
}

/// A rate request as received from the checkout platform.
///
/// The origin is process configuration, never taken from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRequest {
    origin: PostalAddress,
    destination: PostalAddress,
    items: Vec<LineItem>,
}

impl ShipmentRequest {
    /// Creates a new shipment request.
    #[must_use]
    pub fn new(origin: PostalAddress, destination: PostalAddress, items: Vec<LineItem>) -> Self {
        Self {
            origin,
            destination,
            items,
        }
    }

    /// Returns the origin address.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &PostalAddress {
        &self.origin
    }

    /// Returns the destination address.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &PostalAddress {
        &self.destination
    }

    /// Returns the line items in request order.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the summed mass of all items in grams.
    #[must_use]
    pub fn total_grams(&self) -> f64 {
        self.items.iter().map(LineItem::mass_grams).sum()
    }
}

/// Weight unit understood by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Avoirdupois ounces.
    #[default]
    Ounces,
}

impl WeightUnit {
    /// Returns the provider's name for the unit.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ounces => "ounces",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A weight with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    /// Numeric value.
    pub value: f64,
    /// Unit of `value`.
    pub units: WeightUnit,
}

impl Weight {
    /// Creates a weight in ounces.
    #[must_use]
    pub fn ounces(value: f64) -> Self {
        Self {
            value,
            units: WeightUnit::Ounces,
        }
    }
}

/// Package dimensions sent with every rate request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageDimensions {
    /// Length.
    pub length: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Length unit, as named by the provider.
    pub units: String,
}

impl Default for PackageDimensions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            units: "inches".to_string(),
        }
    }
}

/// The shipment every carrier is asked to quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedShipment {
    origin: PostalAddress,
    destination: PostalAddress,
    total_weight: Weight,
    dimensions: PackageDimensions,
    residential: bool,
}

impl NormalizedShipment {
    /// Builds the normalized shipment for a request.
    ///
    /// Item masses are summed, then converted to ounces once.
    #[must_use]
    pub fn build(
        request: &ShipmentRequest,
        dimensions: PackageDimensions,
        residential: bool,
    ) -> Self {
        Self {
            origin: request.origin().clone(),
            destination: request.destination().clone(),
            total_weight: Weight::ounces(mass_to_ounces(request.total_grams())),
            dimensions,
            residential,
        }
    }

    /// Returns the ship-from address.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &PostalAddress {
        &self.origin
    }

    /// Returns the ship-to address.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &PostalAddress {
        &self.destination
    }

    /// Returns the total package weight.
    #[inline]
    #[must_use]
    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    /// Returns the package dimensions.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &PackageDimensions {
        &self.dimensions
    }

    /// Returns true if the destination is residential.
    #[inline]
    #[must_use]
    pub fn is_residential(&self) -> bool {
        self.residential
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::units::MIN_OUNCES;

    fn request(items: Vec<LineItem>) -> ShipmentRequest {
        ShipmentRequest::new(
            PostalAddress::new("94107", "CA", "US"),
            PostalAddress::new("10001", "NY", "US"),
            items,
        )
    }

    #[test]
    fn line_item_clamps_invalid_mass() {
        assert_eq!(LineItem::new(-5.0).mass_grams(), 0.0);
        assert_eq!(LineItem::new(f64::NAN).mass_grams(), 0.0);
        assert_eq!(LineItem::new(f64::INFINITY).mass_grams(), 0.0);
        assert_eq!(LineItem::new(120.5).mass_grams(), 120.5);
    }

    #[test]
    fn total_grams_sums_items() {
        let req = request(vec![LineItem::new(100.0), LineItem::new(-20.0), LineItem::new(400.0)]);
        assert_eq!(req.total_grams(), 500.0);
    }

    #[test]
    fn build_converts_summed_weight() {
        let req = request(vec![LineItem::new(200.0), LineItem::new(300.0)]);
        let shipment = NormalizedShipment::build(&req, PackageDimensions::default(), true);

        assert_eq!(shipment.total_weight().value, 17.64);
        assert_eq!(shipment.total_weight().units, WeightUnit::Ounces);
        assert_eq!(shipment.origin().postal_code, "94107");
        assert_eq!(shipment.destination().postal_code, "10001");
        assert!(shipment.is_residential());
    }

    #[test]
    fn overflowing_cart_saturates_weight() {
        let req = request(vec![LineItem::new(f64::MAX), LineItem::new(f64::MAX)]);
        let shipment = NormalizedShipment::build(&req, PackageDimensions::default(), true);

        assert_eq!(shipment.total_weight().value, f64::MAX);
    }

    #[test]
    fn empty_cart_gets_minimum_weight() {
        let shipment = NormalizedShipment::build(&request(vec![]), PackageDimensions::default(), false);
        assert_eq!(shipment.total_weight().value, MIN_OUNCES);
        assert!(!shipment.is_residential());
    }

    #[test]
    fn default_dimensions() {
        let dims = PackageDimensions::default();
        assert_eq!(dims.length, 12.0);
        assert_eq!(dims.width, 8.0);
        assert_eq!(dims.height, 4.0);
        assert_eq!(dims.units, "inches");
    }
}
