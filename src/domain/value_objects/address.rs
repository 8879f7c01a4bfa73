//! # Postal Address
//!
//! Minimal address used for rating: postal code, state/region and country.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A postal address as far as rating is concerned.
///
/// Every component is optional upstream and defaults to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalAddress {
    /// Postal or ZIP code.
    pub postal_code: String,
    /// State, province or region code.
    pub state: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
}

impl PostalAddress {
    /// Creates a new address.
    #[must_use]
    pub fn new(
        postal_code: impl Into<String>,
        state: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            postal_code: postal_code.into(),
            state: state.into(),
            country_code: country_code.into(),
        }
    }

    /// Returns true if no component is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.postal_code.is_empty() && self.state.is_empty() && self.country_code.is_empty()
    }
}

impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.postal_code, self.state, self.country_code)
    }
}
