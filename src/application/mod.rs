//! # Application Layer
//!
//! Use cases orchestrating the domain and the provider ports.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
