//! The three cached feeds read by the request facade.

use serde::Serialize;
use std::sync::Arc;

use crate::sync::feed::{Feed, SharedSource};
use crate::sync::types::{ChainSummary, FeedKind, Quote, RateTable};

/// Shared store holding one feed per data source.
///
/// Cloning is cheap; all clones observe the same slots.
#[derive(Clone, Debug)]
pub struct CacheStore {
    chain: Arc<Feed<ChainSummary>>,
    quote: Arc<Feed<Quote>>,
    rates: Arc<Feed<RateTable>>,
}

/// Everything `GET /{version}/scprime/data` returns; `None` while unavailable.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetworkOverview {
    #[serde(rename = "scpPrice")]
    pub scp_price: Option<Quote>,
    #[serde(rename = "networkData")]
    pub network_data: Option<ChainSummary>,
    #[serde(rename = "usdExchangeRates")]
    pub usd_exchange_rates: Option<RateTable>,
}

/// Point-in-time health of one feed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeedStatus {
    pub feed: &'static str,
    pub configured: bool,
    pub available: bool,
    pub last_refreshed_at: Option<u64>,
    pub consecutive_failures: u64,
}

impl CacheStore {
    /// Create a store with empty slots. `None` sources are permanently
    /// unavailable.
    pub fn new(
        chain: SharedSource<ChainSummary>,
        quote: Option<SharedSource<Quote>>,
        rates: Option<SharedSource<RateTable>>,
    ) -> Self {
        Self {
            chain: Arc::new(Feed::new(FeedKind::ChainSummary, Some(chain))),
            quote: Arc::new(Feed::new(FeedKind::Quote, quote)),
            rates: Arc::new(Feed::new(FeedKind::Rates, rates)),
        }
    }

    pub fn chain_feed(&self) -> &Arc<Feed<ChainSummary>> {
        &self.chain
    }

    pub fn quote_feed(&self) -> &Arc<Feed<Quote>> {
        &self.quote
    }

    pub fn rates_feed(&self) -> &Arc<Feed<RateTable>> {
        &self.rates
    }

    pub async fn chain_summary(&self) -> Option<ChainSummary> {
        self.chain.read().await.map(|s| s.value.clone())
    }

    pub async fn usd_quote(&self) -> Option<Quote> {
        self.quote.read().await.map(|s| s.value)
    }

    pub async fn usd_rates(&self) -> Option<RateTable> {
        self.rates.read().await.map(|s| s.value.clone())
    }

    /// Read all three feeds concurrently.
    pub async fn overview(&self) -> NetworkOverview {
        let (network_data, scp_price, usd_exchange_rates) =
            tokio::join!(self.chain_summary(), self.usd_quote(), self.usd_rates());
        NetworkOverview {
            scp_price,
            network_data,
            usd_exchange_rates,
        }
    }

    /// Status of every feed without triggering fetches.
    pub fn status(&self) -> Vec<FeedStatus> {
        vec![
            feed_status(&self.chain),
            feed_status(&self.quote),
            feed_status(&self.rates),
        ]
    }
}

fn feed_status<T: Send + Sync + 'static>(feed: &Feed<T>) -> FeedStatus {
    let snapshot = feed.peek();
    FeedStatus {
        feed: feed.kind().as_str(),
        configured: feed.is_configured(),
        available: snapshot.is_some(),
        last_refreshed_at: snapshot.map(|s| s.refreshed_at_unix()),
        consecutive_failures: feed.slot().consecutive_failures(),
    }
}
