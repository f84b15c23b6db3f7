//! Values published by the three cached feeds.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::upstream::types::ProviderRate;

/// Fiat codes exposed in the USD rate table.
pub const SUPPORTED_FIATS: [&str; 11] = [
    "EUR", "JPY", "GBP", "AUD", "CAD", "CHF", "CNY", "HKD", "NZD", "SEK", "INR",
];

/// Identifies one of the cached feeds in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    ChainSummary,
    Quote,
    Rates,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::ChainSummary => "chain_summary",
            FeedKind::Quote => "usd_quote",
            FeedKind::Rates => "usd_rates",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consensus height and fee bounds of a synced daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    #[serde(rename = "consensusHeight")]
    pub height: u64,
    #[serde(rename = "minFee")]
    pub min_fee: String,
    #[serde(rename = "maxFee")]
    pub max_fee: String,
}

/// SCP price in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Quote {
    pub price_usd: f64,
}

/// USD → fiat conversion rates restricted to [`SUPPORTED_FIATS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<String, f64>);

impl RateTable {
    /// Ingest a provider response, dropping unsupported codes and
    /// rates that do not parse.
    pub fn from_provider(rates: &HashMap<String, ProviderRate>) -> Self {
        let table = rates
            .iter()
            .filter(|(code, _)| SUPPORTED_FIATS.contains(&code.as_str()))
            .filter_map(|(code, rate)| {
                rate.rate
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .map(|value| (code.clone(), value))
            })
            .collect();
        Self(table)
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}
