//! # ShipStation Provider
//!
//! Carrier directory and rate fetch client for the ShipStation API.
//!
//! - `GET /carriers` lists the carriers enabled on the account
//! - `POST /shipments/getrates` quotes one carrier for a shipment
//!
//! Payloads are read leniently. Numeric fields accept JSON numbers or
//! numeric strings, and anything unreadable is treated as absent so the
//! normalizer can fall back to its defaults.

use crate::domain::entities::carrier::{Carrier, ProviderRate};
use crate::domain::entities::shipment::NormalizedShipment;
use crate::infrastructure::provider::error::{ProviderError, ProviderResult};
use crate::infrastructure::provider::http_client::HttpClient;
use crate::infrastructure::provider::traits::{CarrierDirectory, RateSource, ShippingProvider};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

const CARRIERS_PATH: &str = "/carriers";
const RATES_PATH: &str = "/shipments/getrates";

/// ShipStation API client.
#[derive(Debug, Clone)]
pub struct ShipStationClient {
    http: HttpClient,
}

impl ShipStationClient {
    /// Creates a client over an already-authenticated transport.
    ///
    /// # Arguments
    ///
    /// * `http` - Transport pointed at the provider's base URL.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Returns the underlying transport.
    #[inline]
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

#[async_trait]
impl CarrierDirectory for ShipStationClient {
    async fn list_active_carriers(&self) -> ProviderResult<Vec<Carrier>> {
        let body = self
            .http
            .get_json(CARRIERS_PATH)
            .await
            .map_err(|e| ProviderError::unavailable(e.to_string()))?;

        let entries = body.as_array().ok_or_else(|| {
            ProviderError::malformed_response(format!("carrier listing is not an array: {}", kind(&body)))
        })?;

        let carriers: Vec<Carrier> = entries
            .iter()
            .filter_map(Value::as_object)
            .map(parse_carrier)
            .collect();

        tracing::debug!(count = carriers.len(), "listed carriers");
        Ok(carriers)
    }
}

#[async_trait]
impl RateSource for ShipStationClient {
    async fn fetch_rates(
        &self,
        carrier_code: &str,
        shipment: &NormalizedShipment,
    ) -> ProviderResult<Vec<ProviderRate>> {
        let request = RateRequestBody::new(carrier_code, shipment);
        let body = self
            .http
            .post_json(RATES_PATH, &request)
            .await
            .map_err(|e| match e {
                ProviderError::Status { status, body } => {
                    ProviderError::carrier_rate(carrier_code, Some(status), body)
                }
                ProviderError::MalformedResponse { message } => {
                    ProviderError::malformed_response(format!("{}: {}", carrier_code, message))
                }
                timeout @ ProviderError::Timeout { .. } => timeout,
                other => ProviderError::carrier_rate(carrier_code, None, other.to_string()),
            })?;

        let entries = body.as_array().ok_or_else(|| {
            ProviderError::malformed_response(format!(
                "rates for {} are not an array: {}",
                carrier_code,
                kind(&body)
            ))
        })?;

        let rates: Vec<ProviderRate> = entries
            .iter()
            .filter_map(|entry| match entry.as_object() {
                Some(fields) => Some(parse_rate(carrier_code, fields)),
                None => {
                    tracing::debug!(carrier_code, "skipping non-object rate entry");
                    None
                }
            })
            .collect();

        tracing::debug!(carrier_code, count = rates.len(), "fetched rates");
        Ok(rates)
    }
}

impl ShippingProvider for ShipStationClient {
    fn has_credentials(&self) -> bool {
        self.http.has_credentials()
    }

    fn name(&self) -> &'static str {
        "shipstation"
    }
}

/// Body of `POST /shipments/getrates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateRequestBody<'a> {
    carrier_code: &'a str,
    from_postal_code: &'a str,
    from_state: &'a str,
    from_country_code: &'a str,
    to_state: &'a str,
    to_country_code: &'a str,
    to_postal_code: &'a str,
    residential: bool,
    weight: WeightBody,
    dimensions: DimensionsBody<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct WeightBody {
    value: f64,
    units: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct DimensionsBody<'a> {
    units: &'a str,
    length: f64,
    width: f64,
    height: f64,
}

impl<'a> RateRequestBody<'a> {
    fn new(carrier_code: &'a str, shipment: &'a NormalizedShipment) -> Self {
        let origin = shipment.origin();
        let destination = shipment.destination();
        let weight = shipment.total_weight();
        let dimensions = shipment.dimensions();

        Self {
            carrier_code,
            from_postal_code: &origin.postal_code,
            from_state: &origin.state,
            from_country_code: &origin.country_code,
            to_state: &destination.state,
            to_country_code: &destination.country_code,
            to_postal_code: &destination.postal_code,
            residential: shipment.is_residential(),
            weight: WeightBody {
                value: weight.value,
                units: weight.units.as_str(),
            },
            dimensions: DimensionsBody {
                units: &dimensions.units,
                length: dimensions.length,
                width: dimensions.width,
                height: dimensions.height,
            },
        }
    }
}

fn parse_carrier(fields: &Map<String, Value>) -> Carrier {
    let code = string_field(fields, "code")
        .or_else(|| string_field(fields, "carrierCode"))
        .unwrap_or_default();

    let mut carrier = Carrier::new(code);
    if let Some(name) = string_field(fields, "name") {
        carrier = carrier.with_name(name);
    }
    if let Some(account) = string_field(fields, "accountNumber") {
        carrier = carrier.with_account_number(account);
    }
    carrier
}

fn parse_rate(carrier_code: &str, fields: &Map<String, Value>) -> ProviderRate {
    let mut rate = ProviderRate::new().with_carrier_code(carrier_code);

    if let Some(name) = string_field(fields, "carrierName") {
        rate = rate.with_carrier_name(name);
    }
    if let Some(code) = string_field(fields, "serviceCode") {
        rate = rate.with_service_code(code);
    }
    if let Some(name) = string_field(fields, "serviceName") {
        rate = rate.with_service_name(name);
    }
    if let Some(cost) = decimal_field(fields, "shipmentCost") {
        rate = rate.with_shipment_cost(cost);
    }
    if let Some(cost) = decimal_field(fields, "otherCost") {
        rate = rate.with_other_cost(cost);
    }
    if let Some(days) = days_field(fields, "deliveryDays") {
        rate = rate.with_delivery_days(days);
    }
    rate
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decimal_field(fields: &Map<String, Value>, key: &str) -> Option<Decimal> {
    let text = match fields.get(key)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn days_field(fields: &Map<String, Value>, key: &str) -> Option<u32> {
    match fields.get(key)? {
        Value::Number(n) => match n.as_u64() {
            Some(days) => u32::try_from(days).ok(),
            None => n
                .as_f64()
                .filter(|d| d.is_finite() && *d >= 0.0 && *d <= f64::from(u32::MAX))
                .map(|d| d.floor() as u32),
        },
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::entities::shipment::{LineItem, PackageDimensions, ShipmentRequest};
    use crate::domain::value_objects::address::PostalAddress;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn shipment() -> NormalizedShipment {
        let request = ShipmentRequest::new(
            PostalAddress::new("94107", "CA", "US"),
            PostalAddress::new("10001", "NY", "US"),
            vec![LineItem::new(500.0)],
        );
        NormalizedShipment::build(&request, PackageDimensions::default(), true)
    }

    fn client(server: &MockServer) -> ShipStationClient {
        let http = HttpClient::new(server.uri(), 1000)
            .unwrap()
            .with_basic_auth("key", "secret");
        ShipStationClient::new(http)
    }

    #[tokio::test]
    async fn lists_carriers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/carriers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Stamps.com", "code": "stamps_com", "accountNumber": "A1"},
                {"carrierCode": "ups"},
                "garbage",
                {"name": "No code"}
            ])))
            .mount(&server)
            .await;

        let carriers = client(&server).list_active_carriers().await.unwrap();
        let codes: Vec<&str> = carriers.iter().map(Carrier::code).collect();

        assert_eq!(codes, vec!["stamps_com", "ups", ""]);
        assert_eq!(carriers.first().unwrap().name(), Some("Stamps.com"));
        assert_eq!(carriers.first().unwrap().account_number(), Some("A1"));
    }

    #[tokio::test]
    async fn carrier_listing_failure_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/carriers"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).list_active_carriers().await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn carrier_listing_object_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/carriers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"carriers": []})))
            .mount(&server)
            .await;

        let err = client(&server).list_active_carriers().await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn posts_rate_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shipments/getrates"))
            .and(body_json(json!({
                "carrierCode": "ups",
                "fromPostalCode": "94107",
                "fromState": "CA",
                "fromCountryCode": "US",
                "toState": "NY",
                "toCountryCode": "US",
                "toPostalCode": "10001",
                "residential": true,
                "weight": {"value": 17.64, "units": "ounces"},
                "dimensions": {"units": "inches", "length": 12.0, "width": 8.0, "height": 4.0}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"serviceName": "UPS Ground", "serviceCode": "ups_ground", "shipmentCost": 9.5, "otherCost": 0.25},
                {"serviceName": "UPS Next Day Air", "serviceCode": "ups_next_day_air", "shipmentCost": "31.10", "deliveryDays": 1}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let rates = client(&server).fetch_rates("ups", &shipment()).await.unwrap();

        assert_eq!(rates.len(), 2);
        let ground = rates.first().unwrap();
        assert_eq!(ground.carrier_code(), Some("ups"));
        assert_eq!(ground.service_code(), Some("ups_ground"));
        assert_eq!(ground.amount(), Decimal::new(95, 1));
        assert_eq!(ground.delivery_days(), None);

        let next_day = rates.get(1).unwrap();
        assert_eq!(next_day.amount(), Decimal::new(3110, 2));
        assert_eq!(next_day.delivery_days(), Some(1));
    }

    #[tokio::test]
    async fn empty_rate_array_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let rates = client(&server).fetch_rates("fedex", &shipment()).await.unwrap();
        assert!(rates.is_empty());
    }

    #[tokio::test]
    async fn rejected_rate_call_carries_details() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("carrier offline"))
            .mount(&server)
            .await;

        let err = client(&server).fetch_rates("fedex", &shipment()).await.unwrap_err();
        match err {
            ProviderError::CarrierRate {
                carrier_code,
                status_code,
                body,
            } => {
                assert_eq!(carrier_code, "fedex");
                assert_eq!(status_code, Some(500));
                assert_eq!(body, "carrier offline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_array_rates_are_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "nope"})))
            .mount(&server)
            .await;

        let err = client(&server).fetch_rates("usps", &shipment()).await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse { .. }));
    }

    #[test]
    fn lenient_field_parsing() {
        let fields = json!({
            "shipmentCost": "abc",
            "otherCost": 1.5e1,
            "deliveryDays": -2,
            "serviceName": null,
            "serviceCode": 42
        });
        let rate = parse_rate("dhl", fields.as_object().unwrap());

        assert_eq!(rate.amount(), Decimal::new(15, 0));
        assert_eq!(rate.delivery_days(), None);
        assert_eq!(rate.service_name(), None);
        assert_eq!(rate.service_code(), Some("42"));
    }

    #[test]
    fn fractional_delivery_days_round_down() {
        let fields = json!({"deliveryDays": 2.7});
        let rate = parse_rate("dhl", fields.as_object().unwrap());
        assert_eq!(rate.delivery_days(), Some(2));
    }
}
