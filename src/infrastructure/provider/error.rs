//! # Provider Errors
//!
//! Error types for calls to the rate provider.
//!
//! Carrier-scoped errors ([`ProviderError::CarrierRate`],
//! [`ProviderError::MalformedResponse`], [`ProviderError::Timeout`]) only
//! remove one carrier's rates. [`ProviderError::Unavailable`] means the
//! carrier list could not be fetched, so nothing can be quoted.
//!
//! # Examples
//!
//! ```
//! use rate_bridge::infrastructure::provider::error::ProviderError;
//!
//! let error = ProviderError::carrier_rate("ups", Some(500), "internal error");
//! assert!(error.is_carrier_scoped());
//! assert_eq!(error.status_code(), Some(500));
//!
//! let error = ProviderError::unavailable("carrier listing returned 503");
//! assert!(!error.is_carrier_scoped());
//! ```

use thiserror::Error;

/// Error type for rate provider operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The carrier listing could not be fetched.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// One carrier's rate request failed.
    #[error(
        "rate request failed for carrier {carrier_code} (status {status}): {body}",
        status = .status_code.map_or_else(|| "none".to_string(), |s| s.to_string())
    )]
    CarrierRate {
        /// The carrier that was being quoted.
        carrier_code: String,
        /// HTTP status, when the provider answered.
        status_code: Option<u16>,
        /// Response body or transport error text.
        body: String,
    },

    /// The provider answered with something other than a JSON array.
    #[error("malformed provider response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// A call exceeded its deadline.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Non-success HTTP status from the transport.
    #[error("provider returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The client could not be set up.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a carrier rate error.
    #[must_use]
    pub fn carrier_rate(
        carrier_code: impl Into<String>,
        status_code: Option<u16>,
        body: impl Into<String>,
    ) -> Self {
        Self::CarrierRate {
            carrier_code: carrier_code.into(),
            status_code,
            body: body.into(),
        }
    }

    /// Creates a malformed response error.
    #[must_use]
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the error only affects a single carrier.
    #[must_use]
    pub fn is_carrier_scoped(&self) -> bool {
        matches!(
            self,
            Self::CarrierRate { .. } | Self::MalformedResponse { .. } | Self::Timeout { .. }
        )
    }

    /// Returns the HTTP status code, if the provider answered.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::CarrierRate { status_code, .. } => *status_code,
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_rate_display_includes_details() {
        let error = ProviderError::carrier_rate("fedex", Some(400), "bad zip");
        let display = error.to_string();
        assert!(display.contains("fedex"));
        assert!(display.contains("400"));
        assert!(display.contains("bad zip"));
    }

    #[test]
    fn carrier_rate_without_status() {
        let error = ProviderError::carrier_rate("fedex", None, "connection reset");
        assert!(error.to_string().contains("status none"));
        assert_eq!(error.status_code(), None);
    }

    #[test]
    fn scope_classification() {
        assert!(ProviderError::malformed_response("object").is_carrier_scoped());
        assert!(ProviderError::timeout_with_duration("slow", 100).is_carrier_scoped());
        assert!(!ProviderError::unavailable("down").is_carrier_scoped());
        assert!(!ProviderError::connection("refused").is_carrier_scoped());
    }

    #[test]
    fn status_code_from_status_error() {
        assert_eq!(ProviderError::status(503, "").status_code(), Some(503));
    }
}
