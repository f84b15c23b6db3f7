//! spd daemon API client.
//!
//! # Responsibilities
//! - Authenticate every call (basic auth, empty user, configured password)
//! - Query chain state, fee bounds, pool contents and the explorer index
//! - Validate and broadcast client-built transaction sets
//!
//! Calls are single attempts; retrying is the feed scheduler's job.

use std::time::Duration;

use crate::config::DaemonConfig;
use crate::upstream::error::UpstreamResult;
use crate::upstream::request::{build_http_client, send, send_json};
use crate::upstream::types::{
    AddressesBatchRequest, AddressesBatchResponse, ConsensusResponse, FeeBoundsResponse,
    TransactionPoolResponse,
};

pub const CONSENSUS: &str = "/consensus";
pub const TPOOL_FEE: &str = "/tpool/fee";
pub const TPOOL_TRANSACTIONS: &str = "/tpool/transactions";
pub const TPOOL_RAW: &str = "/tpool/raw";
pub const VALIDATE_TRANSACTION_SET: &str = "/consensus/validate/transactionset";
pub const EXPLORER_ADDRESSES_BATCH: &str = "/explorer/addresses/batch";

/// Authenticated client for the daemon HTTP API.
#[derive(Clone)]
pub struct DaemonClient {
    http: reqwest::Client,
    base_url: String,
    password: String,
}

impl DaemonClient {
    /// Create a client from the daemon section of the configuration.
    pub fn new(config: &DaemonConfig) -> UpstreamResult<Self> {
        let http = build_http_client(
            "daemon",
            Duration::from_secs(config.timeout_secs),
            Some(&config.user_agent),
        )?;
        Ok(Self {
            http,
            base_url: config.base_url(),
            password: config.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(self.url(path))
            .basic_auth("", Some(&self.password))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(self.url(path))
            .basic_auth("", Some(&self.password))
    }

    /// `GET /consensus`
    pub async fn consensus(&self) -> UpstreamResult<ConsensusResponse> {
        send_json(CONSENSUS, self.get(CONSENSUS)).await
    }

    /// `GET /tpool/fee`
    pub async fn fee_bounds(&self) -> UpstreamResult<FeeBoundsResponse> {
        send_json(TPOOL_FEE, self.get(TPOOL_FEE)).await
    }

    /// `GET /tpool/transactions`
    pub async fn transaction_pool(&self) -> UpstreamResult<TransactionPoolResponse> {
        send_json(TPOOL_TRANSACTIONS, self.get(TPOOL_TRANSACTIONS)).await
    }

    /// `POST /tpool/raw` with form-encoded parents and transaction.
    pub async fn broadcast(&self, parents: &str, transaction: &str) -> UpstreamResult<()> {
        let form = [("parents", parents), ("transaction", transaction)];
        send(TPOOL_RAW, self.post(TPOOL_RAW).form(&form)).await?;
        Ok(())
    }

    /// `POST /consensus/validate/transactionset` with a raw JSON body.
    pub async fn validate_transaction_set(&self, transaction_set: &str) -> UpstreamResult<()> {
        let request = self
            .post(VALIDATE_TRANSACTION_SET)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(transaction_set.to_string());
        send(VALIDATE_TRANSACTION_SET, request).await?;
        Ok(())
    }

    /// `POST /explorer/addresses/batch`
    pub async fn explorer_addresses(
        &self,
        addresses: &[String],
    ) -> UpstreamResult<AddressesBatchResponse> {
        let request = self
            .post(EXPLORER_ADDRESSES_BATCH)
            .json(&AddressesBatchRequest { addresses });
        send_json(EXPLORER_ADDRESSES_BATCH, request).await
    }
}

impl std::fmt::Debug for DaemonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
