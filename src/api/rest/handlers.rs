//! # REST Handlers
//!
//! Request handlers, wire DTOs and the inbound credential gate.

use crate::application::services::rate_aggregation::RateAggregationEngine;
use crate::config::InboundCredentials;
use crate::domain::entities::rate::RateList;
use crate::domain::entities::shipment::LineItem;
use crate::domain::value_objects::address::PostalAddress;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The quoting pipeline.
    pub engine: Arc<RateAggregationEngine>,
    /// Credentials required on `POST /rates`; `None` leaves it open.
    pub inbound_auth: Option<InboundCredentials>,
}

impl AppState {
    /// Creates the handler state.
    #[must_use]
    pub fn new(engine: Arc<RateAggregationEngine>, inbound_auth: Option<InboundCredentials>) -> Self {
        Self {
            engine,
            inbound_auth,
        }
    }
}

/// Body of `POST /rates`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateRequestEnvelope {
    /// The rate request; absent means nothing to quote.
    pub rate: Option<RateRequestDto>,
}

/// The `rate` object sent by the checkout platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateRequestDto {
    /// Ship-to address.
    pub destination: DestinationDto,
    /// Cart lines.
    pub items: Vec<ItemDto>,
}

/// Ship-to address as sent by the checkout platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DestinationDto {
    /// Postal code.
    pub postal_code: Option<String>,
    /// Province, preferred over `province_code`.
    pub province: Option<String>,
    /// Province code.
    pub province_code: Option<String>,
    /// Country, preferred over `country_code`.
    pub country: Option<String>,
    /// Country code.
    pub country_code: Option<String>,
}

impl From<DestinationDto> for PostalAddress {
    fn from(dto: DestinationDto) -> Self {
        PostalAddress::new(
            first_non_blank([dto.postal_code]),
            first_non_blank([dto.province, dto.province_code]),
            first_non_blank([dto.country, dto.country_code]),
        )
    }
}

/// One cart line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemDto {
    /// Mass in grams; numbers or numeric strings, anything else is zero.
    pub grams: Value,
}

impl From<ItemDto> for LineItem {
    fn from(dto: ItemDto) -> Self {
        let grams = match &dto.grams {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        LineItem::new(grams)
    }
}

/// Body of every `POST /rates` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesResponse {
    /// Shipping options, cheapest first.
    pub rates: RateList,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
}

fn first_non_blank<const N: usize>(candidates: [Option<String>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// `POST /rates`: always answers 200, with an empty list when nothing
/// could be quoted.
pub async fn quote_rates(State(state): State<Arc<AppState>>, body: Bytes) -> Json<RatesResponse> {
    let envelope = match serde_json::from_slice::<RateRequestEnvelope>(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable rate request; returning no rates");
            return Json(RatesResponse::default());
        }
    };

    let Some(rate) = envelope.rate else {
        tracing::warn!("rate request without a rate object; returning no rates");
        return Json(RatesResponse::default());
    };

    let items: Vec<LineItem> = rate.items.into_iter().map(LineItem::from).collect();
    let request = state.engine.request_for(rate.destination.into(), items);
    let rates = state.engine.quote_or_empty(&request).await;

    Json(RatesResponse { rates })
}

/// `GET /health`.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Rejects requests lacking the configured HTTP Basic credentials.
pub async fn require_credentials(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = &state.inbound_auth else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .typed_get::<Authorization<Basic>>()
        .is_some_and(|auth| expected.matches(auth.username(), auth.password()));

    if authorized {
        next.run(request).await
    } else {
        tracing::warn!(uri = %request.uri(), "rejected request with missing or invalid credentials");
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"rates\"")],
        )
            .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn destination_prefers_full_fields() {
        let dto: DestinationDto = serde_json::from_value(serde_json::json!({
            "postal_code": " 10001 ",
            "province": "NY",
            "province_code": "XX",
            "country_code": "US"
        }))
        .unwrap();
        let address = PostalAddress::from(dto);

        assert_eq!(address, PostalAddress::new("10001", "NY", "US"));
    }

    #[test]
    fn destination_falls_back_to_codes() {
        let dto: DestinationDto = serde_json::from_value(serde_json::json!({
            "province": "",
            "province_code": "ON",
            "country": null,
            "country_code": "CA"
        }))
        .unwrap();
        let address = PostalAddress::from(dto);

        assert_eq!(address.state, "ON");
        assert_eq!(address.country_code, "CA");
        assert_eq!(address.postal_code, "");
    }

    #[test]
    fn item_grams_are_lenient() {
        let items: Vec<ItemDto> = serde_json::from_value(serde_json::json!([
            {"grams": 500},
            {"grams": "250.5"},
            {"grams": "heavy"},
            {"grams": -10},
            {}
        ]))
        .unwrap();
        let masses: Vec<f64> = items
            .into_iter()
            .map(|i| LineItem::from(i).mass_grams())
            .collect();

        assert_eq!(masses, vec![500.0, 250.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn envelope_without_rate() {
        let envelope: RateRequestEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.rate.is_none());
    }

    #[test]
    fn empty_response_serializes_rates_array() {
        let json = serde_json::to_value(RatesResponse::default()).unwrap();
        assert_eq!(json, serde_json::json!({"rates": []}));
    }
}
