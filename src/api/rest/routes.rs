//! # REST Routes
//!
//! Router construction.

use crate::api::rest::handlers::{AppState, health, quote_rates, require_credentials};
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builds the application router.
///
/// `POST /rates` sits behind the inbound credential gate; `GET /health`
/// is always open.
pub fn create_router(state: Arc<AppState>) -> Router {
    let rates = Router::new()
        .route("/rates", post(quote_rates))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_credentials,
        ));

    Router::new()
        .merge(rates)
        .route("/health", get(health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
