//! # Domain Layer
//!
//! Shipping-rate concepts, independent of any provider or transport.
//!
//! - [`entities`]: shipments, carriers and rates
//! - [`value_objects`]: addresses and unit conversion
//! - [`services`]: rate normalization

pub mod entities;
pub mod services;
pub mod value_objects;
