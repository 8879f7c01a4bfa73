//! # Application Errors
//!
//! Pipeline-level failures of the rate aggregation use case.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Configuration(String)   - Provider credentials missing
//! └── Provider(ProviderError) - Carrier listing failed or was malformed
//! ```
//!
//! Carrier-scoped provider errors never reach this level: the pipeline
//! absorbs them per carrier.
//!
//! # Examples
//!
//! ```
//! use rate_bridge::application::error::ApplicationError;
//! use rate_bridge::infrastructure::provider::error::ProviderError;
//!
//! let err = ApplicationError::configuration("missing API key");
//! assert!(err.is_configuration());
//!
//! let err: ApplicationError = ProviderError::unavailable("503").into();
//! assert!(!err.is_configuration());
//! ```

use crate::infrastructure::provider::error::ProviderError;
use thiserror::Error;

/// Error type for the aggregation pipeline.
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// Required configuration is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider failed in a way that prevents any quoting.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApplicationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_display() {
        let err = ApplicationError::configuration("missing API key");
        assert_eq!(err.to_string(), "configuration error: missing API key");
    }

    #[test]
    fn provider_error_is_transparent() {
        let err: ApplicationError = ProviderError::unavailable("503").into();
        assert_eq!(err.to_string(), "provider unavailable: 503");
    }
}
