//! # Telemetry
//!
//! Tracing subscriber setup. `RUST_LOG` takes precedence over the
//! configured filter.

use crate::config::LogConfig;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns `TryInitError` if a global subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let json = config.json.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .json()
            .with_current_span(false)
    });
    let compact = (!config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .try_init()
}
