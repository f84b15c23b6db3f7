//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Facade listener (bind address, limits).
    pub listener: ListenerConfig,

    /// Connection settings for the spd daemon.
    pub daemon: DaemonConfig,

    /// Quote provider endpoints and credentials.
    pub quotes: QuoteConfig,

    /// Refresh cadences for the cached feeds.
    pub sync: SyncConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:14280").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:14280".to_string(),
            request_timeout_secs: 30,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping the host.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.bind_address = format!("{}:{}", host, port);
    }
}

/// spd daemon connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Base URL without port (e.g., "http://127.0.0.1").
    pub url: String,

    /// API port of the daemon.
    pub port: u16,

    /// API password, sent as HTTP basic auth with an empty username.
    pub password: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent the daemon requires on API calls.
    pub user_agent: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1".to_string(),
            port: 4280,
            password: String::new(),
            timeout_secs: 10,
            user_agent: "ScPrime-Agent".to_string(),
        }
    }
}

impl DaemonConfig {
    /// Full base URL of the daemon API, port included.
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.url.trim_end_matches('/'), self.port)
    }
}

/// Quote provider settings.
///
/// A provider without an API key is treated as permanently unavailable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// CoinMarketCap API host.
    pub cmc_api_url: String,

    /// CoinMarketCap API key.
    pub cmc_api_key: Option<String>,

    /// CoinMarketCap id of SCP.
    pub cmc_currency_id: String,

    /// getgeoapi host for the USD exchange rate table.
    pub rates_api_url: String,

    /// getgeoapi key.
    pub rates_api_key: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            cmc_api_url: "https://pro-api.coinmarketcap.com".to_string(),
            cmc_api_key: None,
            cmc_currency_id: "4074".to_string(),
            rates_api_url: "https://api.getgeoapi.com".to_string(),
            rates_api_key: None,
            timeout_secs: 15,
        }
    }
}

impl QuoteConfig {
    /// CoinMarketCap key, ignoring blank values.
    pub fn cmc_key(&self) -> Option<&str> {
        self.cmc_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// getgeoapi key, ignoring blank values.
    pub fn rates_key(&self) -> Option<&str> {
        self.rates_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Refresh cadences (seconds) for the three cached feeds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    pub chain_interval_secs: u64,
    pub chain_error_interval_secs: u64,
    pub quote_interval_secs: u64,
    pub quote_error_interval_secs: u64,
    pub rates_interval_secs: u64,
    pub rates_error_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            chain_interval_secs: 10,
            chain_error_interval_secs: 60,
            quote_interval_secs: 300,
            quote_error_interval_secs: 300,
            rates_interval_secs: 1000,
            rates_error_interval_secs: 1000,
        }
    }
}

/// Cooldowns applied by a feed scheduler after each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Cooldown after a successful fetch.
    pub interval: Duration,
    /// Cooldown after a failed fetch.
    pub error_interval: Duration,
}

impl RefreshPolicy {
    pub fn from_secs(interval: u64, error_interval: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval),
            error_interval: Duration::from_secs(error_interval),
        }
    }

    /// Cooldown to apply after a cycle with the given outcome.
    pub fn cooldown(&self, succeeded: bool) -> Duration {
        if succeeded {
            self.interval
        } else {
            self.error_interval
        }
    }
}

impl SyncConfig {
    pub fn chain_policy(&self) -> RefreshPolicy {
        RefreshPolicy::from_secs(self.chain_interval_secs, self.chain_error_interval_secs)
    }

    pub fn quote_policy(&self) -> RefreshPolicy {
        RefreshPolicy::from_secs(self.quote_interval_secs, self.quote_error_interval_secs)
    }

    pub fn rates_policy(&self) -> RefreshPolicy {
        RefreshPolicy::from_secs(self.rates_interval_secs, self.rates_error_interval_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
