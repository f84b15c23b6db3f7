//! Route handlers.
//!
//! Bodies are read as raw bytes and decoded here so a malformed body maps to
//! the facade's own `{"status":"ko"}` reply instead of axum's rejection text.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::http::response::{ApiError, StatusBody};
use crate::http::server::AppState;
use crate::sync::{FeedStatus, NetworkOverview};
use crate::transactions::{
    reconcile, NewTransactionRequest, TransactionFilter, TransactionsBatchResponse,
};

/// `GET /{version}/scprime/data`
pub async fn scprime_data(State(state): State<AppState>) -> Json<NetworkOverview> {
    Json(state.cache.overview().await)
}

/// `POST /{version}/addresses/transactions/batch`
pub async fn addresses_transactions_batch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TransactionsBatchResponse>, ApiError> {
    let filter: TransactionFilter = serde_json::from_slice(&body)?;
    tracing::debug!(
        addresses = filter.addresses.len(),
        public_keys = filter.public_keys.len(),
        "Transactions batch query"
    );

    let confirmed = state.daemon.explorer_addresses(&filter.addresses).await?;
    let pool = state.daemon.transaction_pool().await?;

    let transactions = reconcile(confirmed.addresses, pool.transactions, &filter);
    Ok(Json(TransactionsBatchResponse { transactions }))
}

/// `POST /{version}/transactions`
///
/// Validation runs first; nothing is broadcast if the daemon rejects the set.
pub async fn new_transaction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusBody>, ApiError> {
    let request: NewTransactionRequest = serde_json::from_slice(&body)?;

    state
        .daemon
        .validate_transaction_set(&request.validate_data)
        .await
        .map_err(ApiError::Rejected)?;

    let broadcast = &request.broadcast_data;
    state
        .daemon
        .broadcast(&broadcast.parents, &broadcast.transaction)
        .await
        .map_err(ApiError::Rejected)?;

    tracing::info!("Transaction set broadcast");
    Ok(Json(StatusBody::OK))
}

/// `GET /health`: feed availability without triggering fetches.
pub async fn health(State(state): State<AppState>) -> Json<Vec<FeedStatus>> {
    Json(state.cache.status())
}
