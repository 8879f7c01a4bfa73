//! # Rate Normalizer
//!
//! Maps a raw [`ProviderRate`] onto the caller-facing [`CanonicalRate`].
//!
//! Normalization is total: missing or blank fields fall back through an
//! ordered chain of alternatives and finally to a literal, so a record with
//! no fields at all still produces a valid rate.
//!
//! | Output          | Chain                                                  |
//! |-----------------|--------------------------------------------------------|
//! | carrier label   | carrier name, carrier code, `"Carrier"`                |
//! | service label   | service name, service code, `"Service"`                |
//! | `service_name`  | `"{carrier label} {service label}"`, whitespace folded |
//! | `service_code`  | `"{carrier code or UNKNOWN}:{service code or label}"`  |
//! | `total_price`   | primary cost, secondary cost, `0`; in cents, `>= 0`    |
//! | `delivery_date` | now + delivery days, only when days are known          |
//!
//! # Examples
//!
//! ```
//! use rate_bridge::domain::entities::carrier::ProviderRate;
//! use rate_bridge::domain::services::rate_normalizer::normalize;
//!
//! let rate = normalize(&ProviderRate::new());
//! assert_eq!(rate.service_name(), "Carrier Service");
//! assert_eq!(rate.service_code(), "UNKNOWN:Service");
//! assert_eq!(rate.total_price(), 0);
//! assert!(rate.delivery_date().is_none());
//! ```

use crate::domain::entities::carrier::ProviderRate;
use crate::domain::entities::rate::CanonicalRate;
use crate::domain::value_objects::units::major_to_minor_currency;
use chrono::{DateTime, Duration, Utc};

/// Carrier code used in `service_code` when the record has none.
pub const UNKNOWN_CARRIER_CODE: &str = "UNKNOWN";

/// Carrier label used when neither name nor code is present.
pub const DEFAULT_CARRIER_LABEL: &str = "Carrier";

/// Service label used when neither name nor code is present.
pub const DEFAULT_SERVICE_LABEL: &str = "Service";

/// Normalizes a provider rate, dating delivery estimates from now.
#[must_use]
pub fn normalize(rate: &ProviderRate) -> CanonicalRate {
    normalize_at(rate, Utc::now())
}

/// Normalizes a provider rate, dating delivery estimates from `now`.
#[must_use]
pub fn normalize_at(rate: &ProviderRate, now: DateTime<Utc>) -> CanonicalRate {
    let carrier_code = first_present([rate.carrier_code()]);
    let carrier_label = first_present([rate.carrier_name(), rate.carrier_code()])
        .unwrap_or(DEFAULT_CARRIER_LABEL);
    let service_label = first_present([rate.service_name(), rate.service_code()])
        .unwrap_or(DEFAULT_SERVICE_LABEL);
    let service_key = first_present([rate.service_code()]).unwrap_or(service_label);

    let service_name = collapse_whitespace(&format!("{carrier_label} {service_label}"));
    let service_code = format!(
        "{}:{}",
        carrier_code.unwrap_or(UNKNOWN_CARRIER_CODE),
        service_key
    );
    let total_price = u64::try_from(major_to_minor_currency(rate.amount())).unwrap_or(0);

    let canonical = CanonicalRate::new(service_name, service_code, total_price);
    match rate
        .delivery_days()
        .and_then(|days| now.checked_add_signed(Duration::days(i64::from(days))))
    {
        Some(date) => canonical.with_delivery_date(date),
        None => canonical,
    }
}

/// Returns the first candidate that is present and not blank, trimmed.
fn first_present<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
