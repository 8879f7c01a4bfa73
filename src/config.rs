//! # Configuration
//!
//! Process configuration, resolved once at startup and shared read-only.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. An optional config file (`config/rate-bridge.{toml,json,yaml}`, or
//!    the path in `RATE_BRIDGE_CONFIG`)
//! 3. Environment variables prefixed `RATE_BRIDGE_`, with `__` between
//!    nested keys, e.g. `RATE_BRIDGE_PROVIDER__API_KEY`
//!
//! A `.env` file is loaded into the environment first when present.
//!
//! # Examples
//!
//! ```no_run
//! use rate_bridge::config::BridgeConfig;
//!
//! let config = BridgeConfig::load()?;
//! println!("listening on {}", config.server.bind_address());
//! # Ok::<(), config::ConfigError>(())
//! ```

use crate::application::services::rate_aggregation::AggregationConfig;
use crate::domain::entities::shipment::PackageDimensions;
use crate::domain::value_objects::address::PostalAddress;
use crate::infrastructure::provider::error::ProviderResult;
use crate::infrastructure::provider::http_client::HttpClient;
use crate::infrastructure::provider::shipstation::ShipStationClient;
use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Prefix of environment variables read by [`BridgeConfig::load`].
pub const ENV_PREFIX: &str = "RATE_BRIDGE";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "RATE_BRIDGE_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config/rate-bridge";

/// Inbound HTTP listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Rate provider endpoint and credentials.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API base URL.
    pub base_url: String,
    /// API key.
    pub api_key: Option<String>,
    /// API secret.
    pub api_secret: Option<String>,
    /// Transport timeout per call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://ssapi.shipstation.com".to_string(),
            api_key: None,
            api_secret: None,
            timeout_ms: 10000,
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ProviderSettings {
    /// Returns true if both key and secret are set and non-empty.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        non_empty(&self.api_key).is_some() && non_empty(&self.api_secret).is_some()
    }
}

/// Pricing adjustments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Percentage added to every rate; negative values discount.
    pub markup_percent: Decimal,
}

/// Fan-out behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Deadline for each carrier call, in milliseconds.
    pub per_carrier_timeout_ms: u64,
    /// Maximum number of carriers quoted at once.
    pub max_concurrent_carriers: usize,
    /// Quote destinations as residential.
    pub residential: bool,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        let defaults = AggregationConfig::default();
        Self {
            per_carrier_timeout_ms: defaults.per_carrier_timeout_ms,
            max_concurrent_carriers: defaults.max_concurrent_carriers,
            residential: defaults.residential,
        }
    }
}

/// Credentials the checkout platform must present on `POST /rates`.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct InboundAuthConfig {
    /// Expected HTTP Basic username.
    pub username: Option<String>,
    /// Expected HTTP Basic password.
    pub password: Option<String>,
}

impl fmt::Debug for InboundAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundAuthConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl InboundAuthConfig {
    /// Returns the configured credentials. The gate is disabled when
    /// neither is set; a lone username or password still gates.
    #[must_use]
    pub fn credentials(&self) -> Option<InboundCredentials> {
        let username = non_empty(&self.username);
        let password = non_empty(&self.password);
        if username.is_none() && password.is_none() {
            return None;
        }
        Some(InboundCredentials::new(
            username.unwrap_or_default(),
            password.unwrap_or_default(),
        ))
    }
}

/// An expected username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct InboundCredentials {
    username: String,
    password: String,
}

impl InboundCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true if the presented pair matches.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl fmt::Debug for InboundCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Logging output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "rate_bridge=info,tower_http=info".to_string(),
            json: false,
        }
    }
}

/// Complete process configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Inbound listener.
    pub server: ServerConfig,
    /// Rate provider.
    pub provider: ProviderSettings,
    /// Ship-from address.
    pub origin: PostalAddress,
    /// Package dimensions.
    pub package: PackageDimensions,
    /// Pricing adjustments.
    pub pricing: PricingConfig,
    /// Fan-out behaviour.
    pub aggregation: AggregationSettings,
    /// Inbound credential gate.
    pub inbound: InboundAuthConfig,
    /// Logging.
    pub log: LogConfig,
}

impl BridgeConfig {
    /// Loads `.env`, the optional config file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let file = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Config::builder()
            .add_source(File::with_name(&file).required(false))
            .add_source(environment(None))
            .build()?
            .try_deserialize()
    }

    /// Builds configuration from explicit `RATE_BRIDGE_*` variables only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value has the wrong type.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment(Some(vars)))
            .build()?
            .try_deserialize()
    }

    /// Returns the pipeline configuration.
    #[must_use]
    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig::with_origin(self.origin.clone())
            .with_dimensions(self.package.clone())
            .with_residential(self.aggregation.residential)
            .with_markup_percent(self.pricing.markup_percent)
            .with_per_carrier_timeout(self.aggregation.per_carrier_timeout_ms)
            .with_max_concurrent_carriers(self.aggregation.max_concurrent_carriers)
    }

    /// Builds the provider client. Missing credentials are not an error
    /// here; the pipeline reports them per request.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be created.
    pub fn build_provider(&self) -> ProviderResult<ShipStationClient> {
        let mut http = HttpClient::new(self.provider.base_url.clone(), self.provider.timeout_ms)?;
        if let (Some(key), Some(secret)) = (
            non_empty(&self.provider.api_key),
            non_empty(&self.provider.api_secret),
        ) {
            http = http.with_basic_auth(key, secret);
        }
        Ok(ShipStationClient::new(http))
    }
}

fn environment(vars: Option<HashMap<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .source(vars)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
