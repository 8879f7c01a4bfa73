//! Rate bridge server.

use anyhow::Context;
use rate_bridge::infrastructure::provider::ShippingProvider;
use rate_bridge::{AppState, BridgeConfig, RateAggregationEngine, create_router, telemetry};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BridgeConfig::load().context("failed to load configuration")?;
    telemetry::init_tracing(&config.log).context("failed to initialize tracing")?;

    let provider = Arc::new(config.build_provider().context("failed to build provider client")?);
    if !provider.has_credentials() {
        tracing::warn!("provider credentials are not configured; every quote will be empty");
    }
    let inbound_auth = config.inbound.credentials();
    if inbound_auth.is_none() {
        tracing::warn!("inbound credentials are not configured; /rates is open");
    }

    let engine = Arc::new(RateAggregationEngine::new(
        provider,
        config.aggregation_config(),
    ));
    let router = create_router(Arc::new(AppState::new(engine, inbound_auth)));

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!(%address, "rate bridge listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("rate bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
