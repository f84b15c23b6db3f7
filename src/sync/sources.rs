//! Feed sources backed by the upstream clients.

use async_trait::async_trait;
use std::sync::Arc;

use crate::observability::metrics;
use crate::sync::cache::CacheStore;
use crate::sync::feed::{FeedError, FeedSource, SharedSource};
use crate::sync::types::{ChainSummary, Quote, RateTable, SUPPORTED_FIATS};
use crate::upstream::{DaemonClient, QuoteClient, RateClient};

/// Combines `/consensus` and `/tpool/fee` into a [`ChainSummary`].
pub struct ChainSummarySource {
    daemon: DaemonClient,
}

impl ChainSummarySource {
    pub fn new(daemon: DaemonClient) -> Self {
        Self { daemon }
    }
}

#[async_trait]
impl FeedSource for ChainSummarySource {
    type Output = ChainSummary;

    async fn fetch(&self) -> Result<ChainSummary, FeedError> {
        let consensus = self.daemon.consensus().await?;
        if !consensus.synced {
            return Err(FeedError::NotSynced {
                height: consensus.height,
            });
        }

        let fees = self.daemon.fee_bounds().await?;
        metrics::record_chain_height(consensus.height);

        Ok(ChainSummary {
            height: consensus.height,
            min_fee: fees.min_fee,
            max_fee: fees.max_fee,
        })
    }
}

/// SCP/USD price from CoinMarketCap.
pub struct QuoteSource {
    client: QuoteClient,
}

impl QuoteSource {
    pub fn new(client: QuoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for QuoteSource {
    type Output = Quote;

    async fn fetch(&self) -> Result<Quote, FeedError> {
        let price_usd = self.client.usd_price().await?;
        Ok(Quote { price_usd })
    }
}

/// USD → fiat table from getgeoapi, restricted to supported codes.
pub struct RateSource {
    client: RateClient,
}

impl RateSource {
    pub fn new(client: RateClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for RateSource {
    type Output = RateTable;

    async fn fetch(&self) -> Result<RateTable, FeedError> {
        let response = self.client.usd_rates(&SUPPORTED_FIATS).await?;
        let table = RateTable::from_provider(&response.rates);
        if table.len() < SUPPORTED_FIATS.len() {
            tracing::debug!(
                received = table.len(),
                expected = SUPPORTED_FIATS.len(),
                "Rate table is missing supported currencies"
            );
        }
        Ok(table)
    }
}

impl CacheStore {
    /// Wire the store to the real upstream clients.
    pub fn from_clients(
        daemon: DaemonClient,
        quote: Option<QuoteClient>,
        rates: Option<RateClient>,
    ) -> Self {
        let chain: SharedSource<ChainSummary> = Arc::new(ChainSummarySource::new(daemon));
        let quote = quote.map(|c| Arc::new(QuoteSource::new(c)) as SharedSource<Quote>);
        let rates = rates.map(|c| Arc::new(RateSource::new(c)) as SharedSource<RateTable>);
        CacheStore::new(chain, quote, rates)
    }
}
