//! # Unit Conversion
//!
//! Pure conversions between the units used by checkout platforms and the
//! units expected by the rate provider.
//!
//! - [`mass_to_ounces`] - grams to ounces, floored at [`MIN_OUNCES`]
//! - [`major_to_minor_currency`] - currency major units to minor units
//!
//! All rounding is half away from zero.
//!
//! # Examples
//!
//! ```
//! use rate_bridge::domain::value_objects::units::{major_to_minor_currency, mass_to_ounces};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(major_to_minor_currency(Decimal::new(1999, 2)), 1999);
//! assert_eq!(mass_to_ounces(0.0), 0.1);
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Grams per avoirdupois ounce.
pub const GRAMS_PER_OUNCE: f64 = 28.3495;

/// Smallest weight sent to the provider; zero-weight shipments are rejected.
pub const MIN_OUNCES: f64 = 0.1;

/// Converts grams to ounces, rounded to two decimals and floored at
/// [`MIN_OUNCES`].
///
/// Negative and NaN inputs yield [`MIN_OUNCES`]. Positive infinity
/// saturates at `f64::MAX`. Masses too large for `Decimal` are rounded in
/// `f64` instead.
#[must_use]
pub fn mass_to_ounces(grams: f64) -> f64 {
    if grams.is_nan() || grams <= 0.0 {
        return MIN_OUNCES;
    }
    if grams.is_infinite() {
        return f64::MAX;
    }

    let ounces = grams / GRAMS_PER_OUNCE;
    let rounded = Decimal::from_f64(ounces)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| round_cents_f64(ounces));

    rounded.max(MIN_OUNCES)
}

/// Rounds to two decimals, half away from zero. Past the point where
/// scaling overflows, `f64` carries no fractional digits anyway.
fn round_cents_f64(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

/// Converts a major-unit currency amount to integer minor units.
///
/// The amount is multiplied by 100 and rounded half away from zero. Sign is
/// preserved, so `-1` becomes `-100`; callers that need a non-negative
/// price clamp afterwards. Amounts beyond the `i64` range saturate.
#[must_use]
pub fn major_to_minor_currency(amount: Decimal) -> i64 {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    minor.to_i64().unwrap_or(if minor.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Scales an integer minor-unit price by `(1 + percent / 100)`, rounding
/// half away from zero and clamping at zero.
#[must_use]
pub fn apply_markup(price: u64, percent: Decimal) -> u64 {
    if percent.is_zero() {
        return price;
    }

    let factor = Decimal::ONE + percent / Decimal::ONE_HUNDRED;
    Decimal::from(price)
        .checked_mul(factor)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .map(|d| d.max(Decimal::ZERO))
        .and_then(|d| d.to_u64())
        .unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mass_to_ounces_converts_and_rounds() {
        assert_eq!(mass_to_ounces(500.0), 17.64);
        assert_eq!(mass_to_ounces(28.3495), 1.0);
        assert_eq!(mass_to_ounces(1000.0), 35.27);
    }

    #[test]
    fn mass_to_ounces_floors_small_weights() {
        assert_eq!(mass_to_ounces(0.0), MIN_OUNCES);
        assert_eq!(mass_to_ounces(1.0), MIN_OUNCES);
    }

    #[test]
    fn mass_to_ounces_handles_negative_and_nan() {
        assert_eq!(mass_to_ounces(-250.0), MIN_OUNCES);
        assert_eq!(mass_to_ounces(f64::NAN), MIN_OUNCES);
        assert_eq!(mass_to_ounces(f64::NEG_INFINITY), MIN_OUNCES);
    }

    #[test]
    fn mass_to_ounces_keeps_huge_masses() {
        assert!(mass_to_ounces(1e31) > 1e28);
        assert!((mass_to_ounces(1e31) - 1e31 / GRAMS_PER_OUNCE).abs() <= 1e31 * 1e-12);
        assert!(mass_to_ounces(f64::MAX) > 1e300);
        assert_eq!(mass_to_ounces(f64::INFINITY), f64::MAX);
    }

    #[test]
    fn major_to_minor_vectors() {
        assert_eq!(major_to_minor_currency(Decimal::new(1999, 2)), 1999);
        assert_eq!(major_to_minor_currency(Decimal::ZERO), 0);
        assert_eq!(major_to_minor_currency(Decimal::new(5, 0)), 500);
        assert_eq!(major_to_minor_currency(Decimal::new(750, 2)), 750);
    }

    #[test]
    fn major_to_minor_rounds_half_away_from_zero() {
        assert_eq!(major_to_minor_currency(Decimal::new(10005, 4)), 100);
        assert_eq!(major_to_minor_currency(Decimal::new(12345, 3)), 1235);
        assert_eq!(major_to_minor_currency(Decimal::new(-12345, 3)), -1235);
    }

    #[test]
    fn major_to_minor_preserves_sign() {
        assert_eq!(major_to_minor_currency(Decimal::NEGATIVE_ONE), -100);
    }

    #[test]
    fn major_to_minor_saturates() {
        assert_eq!(major_to_minor_currency(Decimal::MAX), i64::MAX);
        assert_eq!(major_to_minor_currency(Decimal::MIN), i64::MIN);
    }

    #[test]
    fn markup_scales_price() {
        assert_eq!(apply_markup(1000, Decimal::new(10, 0)), 1100);
        assert_eq!(apply_markup(999, Decimal::new(15, 1)), 1014);
    }

    #[test]
    fn zero_markup_is_identity() {
        assert_eq!(apply_markup(1234, Decimal::ZERO), 1234);
    }

    #[test]
    fn negative_markup_clamps_at_zero() {
        assert_eq!(apply_markup(1000, Decimal::new(-10, 0)), 900);
        assert_eq!(apply_markup(1000, Decimal::new(-150, 0)), 0);
    }

    proptest! {
        #[test]
        fn ounces_never_below_floor(grams in 0.0f64..1e40) {
            prop_assert!(mass_to_ounces(grams) >= MIN_OUNCES);
        }

        #[test]
        fn ounces_match_rounded_conversion(grams in 3.0f64..1_000_000.0) {
            let expected = (grams / GRAMS_PER_OUNCE * 100.0).round() / 100.0;
            prop_assert!((mass_to_ounces(grams) - expected).abs() < 0.011);
        }

        #[test]
        fn adding_mass_never_lowers_ounces(
            masses in proptest::collection::vec(0.0f64..5_000.0, 1..20),
            extra in 0.0f64..5_000.0,
        ) {
            let total: f64 = masses.iter().sum();
            prop_assert!(mass_to_ounces(total + extra) >= mass_to_ounces(total));
        }
    }
}
