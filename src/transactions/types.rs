//! Client-facing transaction shapes.

use serde::{Deserialize, Serialize};

use crate::upstream::types::{
    null_as_empty, ExplorerTransaction, RawTransaction, SpendInput, SpendOutput,
};

/// One transaction as returned to clients.
///
/// Confirmed entries carry `id`, `height` and `blocktimestamp`; pool entries
/// carry none of them and the fields are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    #[serde(rename = "siacoininputs")]
    pub inputs: Vec<SpendInput>,
    #[serde(rename = "siacoinoutputs")]
    pub outputs: Vec<SpendOutput>,
    #[serde(rename = "minerfees")]
    pub fees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(rename = "blocktimestamp", skip_serializing_if = "Option::is_none")]
    pub block_timestamp: Option<u64>,
}

impl TransactionView {
    pub fn is_confirmed(&self) -> bool {
        self.id.is_some()
    }
}

impl From<ExplorerTransaction> for TransactionView {
    fn from(tx: ExplorerTransaction) -> Self {
        Self {
            inputs: tx.raw_transaction.inputs,
            outputs: tx.raw_transaction.outputs,
            fees: tx.raw_transaction.fees,
            id: Some(tx.id),
            height: Some(tx.height),
            block_timestamp: Some(tx.block_timestamp),
        }
    }
}

impl From<RawTransaction> for TransactionView {
    fn from(tx: RawTransaction) -> Self {
        Self {
            inputs: tx.inputs,
            outputs: tx.outputs,
            fees: tx.fees,
            ..Self::default()
        }
    }
}

/// Body of `POST /{version}/addresses/transactions/batch`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionFilter {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub addresses: Vec<String>,
    #[serde(rename = "publickeys", default, deserialize_with = "null_as_empty")]
    pub public_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionsBatchResponse {
    pub transactions: Vec<TransactionView>,
}

/// Body of `POST /{version}/transactions`.
///
/// `validate_data` is forwarded verbatim to the daemon validator; the
/// broadcast half is already in the daemon's form encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTransactionRequest {
    #[serde(rename = "broadcastData")]
    pub broadcast_data: BroadcastData,
    #[serde(rename = "validateData")]
    pub validate_data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BroadcastData {
    #[serde(default)]
    pub parents: String,
    #[serde(default)]
    pub transaction: String,
}
