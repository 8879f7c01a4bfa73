//! # Value Objects
//!
//! - [`PostalAddress`]: Rating-relevant address components
//! - [`units`]: Mass and currency conversions

pub mod address;
pub mod units;

pub use address::PostalAddress;
pub use units::{apply_markup, major_to_minor_currency, mass_to_ounces};
