//! Quote provider clients.
//!
//! Two independent providers:
//! - CoinMarketCap for the SCP/USD price (`X-CMC_PRO_API_KEY` header)
//! - getgeoapi for the USD → fiat rate table (`api_key` query parameter)
//!
//! Each is only constructed when its key is configured.

use std::time::Duration;

use crate::config::QuoteConfig;
use crate::upstream::error::{UpstreamError, UpstreamResult};
use crate::upstream::request::{build_http_client, send_json};
use crate::upstream::types::{CmcQuoteResponse, RateConversionResponse};

pub const CMC_QUOTES_LATEST: &str = "/v1/cryptocurrency/quotes/latest";
pub const RATES_CONVERT: &str = "/v2/currency/convert";

const CMC_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// CoinMarketCap client for a single USD quote.
#[derive(Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    currency_id: String,
}

impl QuoteClient {
    /// Build the client if a CoinMarketCap key is configured.
    pub fn from_config(config: &QuoteConfig) -> UpstreamResult<Option<Self>> {
        let Some(key) = config.cmc_key() else {
            return Ok(None);
        };
        let http = build_http_client("coinmarketcap", Duration::from_secs(config.timeout_secs), None)?;
        Ok(Some(Self {
            http,
            base_url: config.cmc_api_url.trim_end_matches('/').to_string(),
            api_key: key.to_string(),
            currency_id: config.cmc_currency_id.clone(),
        }))
    }

    /// Fetch the latest USD price of the configured currency.
    pub async fn usd_price(&self) -> UpstreamResult<f64> {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, CMC_QUOTES_LATEST))
            .query(&[("id", self.currency_id.as_str())])
            .header(CMC_KEY_HEADER, &self.api_key);

        let response: CmcQuoteResponse = send_json(CMC_QUOTES_LATEST, request).await?;
        response
            .quotes
            .values()
            .find_map(|quote| quote.quote.get("USD"))
            .map(|usd| usd.price)
            .ok_or_else(|| UpstreamError::decode(CMC_QUOTES_LATEST, "USD quote not found"))
    }
}

/// getgeoapi client for the USD exchange rate table.
#[derive(Clone)]
pub struct RateClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RateClient {
    /// Build the client if a getgeoapi key is configured.
    pub fn from_config(config: &QuoteConfig) -> UpstreamResult<Option<Self>> {
        let Some(key) = config.rates_key() else {
            return Ok(None);
        };
        let http = build_http_client("getgeoapi", Duration::from_secs(config.timeout_secs), None)?;
        Ok(Some(Self {
            http,
            base_url: config.rates_api_url.trim_end_matches('/').to_string(),
            api_key: key.to_string(),
        }))
    }

    /// Fetch USD conversion rates for the given currency codes.
    pub async fn usd_rates(&self, codes: &[&str]) -> UpstreamResult<RateConversionResponse> {
        let to = codes.join(",");
        let request = self
            .http
            .get(format!("{}{}", self.base_url, RATES_CONVERT))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("from", "USD"),
                ("to", to.as_str()),
                ("format", "json"),
            ]);
        send_json(RATES_CONVERT, request).await
    }
}

impl std::fmt::Debug for QuoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteClient")
            .field("base_url", &self.base_url)
            .field("currency_id", &self.currency_id)
            .finish()
    }
}

impl std::fmt::Debug for RateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
