//! # REST API
//!
//! Inbound HTTP surface using axum.
//!
//! # Endpoints
//!
//! - `POST /rates` - Quote shipping options for a checkout. Always answers
//!   `200` with `{"rates": [...]}`, possibly empty. Gated by HTTP Basic
//!   credentials when `inbound.username`/`inbound.password` are configured.
//! - `GET /health` - Liveness probe.
//!
//! # Usage
//!
//! ```ignore
//! use rate_bridge::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(engine, None));
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    AppState, DestinationDto, HealthResponse, ItemDto, RateRequestDto, RateRequestEnvelope,
    RatesResponse,
};
pub use routes::create_router;
