//! Typed response contracts of the spd daemon and the quote providers.
//!
//! The daemon serializes empty slices as `null`, so every list field goes
//! through [`null_as_empty`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /consensus`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConsensusResponse {
    #[serde(default)]
    pub synced: bool,
    #[serde(default)]
    pub height: u64,
}

/// `GET /tpool/fee`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeeBoundsResponse {
    #[serde(rename = "minimum")]
    pub min_fee: String,
    #[serde(rename = "maximum")]
    pub max_fee: String,
}

/// `GET /tpool/transactions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPoolResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<RawTransaction>,
}

/// Body of `POST /explorer/addresses/batch`.
#[derive(Debug, Clone, Serialize)]
pub struct AddressesBatchRequest<'a> {
    pub addresses: &'a [String],
}

/// Response of `POST /explorer/addresses/batch`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressesBatchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub addresses: Vec<ExplorerAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplorerAddress {
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<ExplorerTransaction>,
}

/// A mined transaction as indexed by the explorer module.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplorerTransaction {
    #[serde(rename = "rawtransaction", default)]
    pub raw_transaction: RawTransaction,
    #[serde(rename = "blocktimestamp", default)]
    pub block_timestamp: u64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub height: u64,
}

/// Transaction body shared by pool entries and explorer records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "siacoininputs", default, deserialize_with = "null_as_empty")]
    pub inputs: Vec<SpendInput>,
    #[serde(rename = "siacoinoutputs", default, deserialize_with = "null_as_empty")]
    pub outputs: Vec<SpendOutput>,
    #[serde(rename = "minerfees", default, deserialize_with = "null_as_empty")]
    pub fees: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendOutput {
    #[serde(default)]
    pub value: String,
    #[serde(rename = "unlockhash", default)]
    pub unlock_hash: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendInput {
    #[serde(rename = "parentid", default)]
    pub parent_id: String,
    #[serde(rename = "unlockconditions", default)]
    pub unlock_conditions: UnlockConditions,
}

/// Spending policy of an input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockConditions {
    #[serde(default)]
    pub timelock: u64,
    #[serde(rename = "signaturesrequired", default)]
    pub signatures_required: u64,
    #[serde(rename = "publickeys", default, deserialize_with = "null_as_empty")]
    pub public_keys: Vec<PublicKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(default)]
    pub key: String,
}

/// CoinMarketCap `quotes/latest`: currency id → quote map.
#[derive(Debug, Clone, Deserialize)]
pub struct CmcQuoteResponse {
    #[serde(rename = "data", default)]
    pub quotes: HashMap<String, CmcQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmcQuote {
    #[serde(default)]
    pub quote: HashMap<String, CmcQuoteData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmcQuoteData {
    pub price: f64,
}

/// getgeoapi `currency/convert`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateConversionResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rates: HashMap<String, ProviderRate>,
}

/// Rate entry; the provider sends the number as a string.
///
/// A missing or `null` rate decodes as empty and is dropped at ingestion.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRate {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rate: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_lists_decode_as_empty() {
        let pool: TransactionPoolResponse =
            serde_json::from_str(r#"{"transactions": null}"#).unwrap();
        assert!(pool.transactions.is_empty());

        let raw: RawTransaction = serde_json::from_str(
            r#"{"siacoininputs": null, "siacoinoutputs": null, "minerfees": null}"#,
        )
        .unwrap();
        assert_eq!(raw, RawTransaction::default());
    }

    #[test]
    fn test_explorer_batch_decode() {
        let body = r#"{
            "addresses": [{
                "address": "A1",
                "transactions": [{
                    "id": "tx1",
                    "height": 42,
                    "blocktimestamp": 1600000000,
                    "rawtransaction": {
                        "siacoininputs": [{
                            "parentid": "p1",
                            "unlockconditions": {
                                "timelock": 0,
                                "signaturesrequired": 1,
                                "publickeys": [{"algorithm": "ed25519", "key": "PK1"}]
                            }
                        }],
                        "siacoinoutputs": [{"value": "10", "unlockhash": "A1", "id": "o1"}],
                        "minerfees": ["1"]
                    }
                }]
            }]
        }"#;
        let batch: AddressesBatchResponse = serde_json::from_str(body).unwrap();
        let tx = &batch.addresses[0].transactions[0];
        assert_eq!(tx.id, "tx1");
        assert_eq!(tx.height, 42);
        assert_eq!(tx.raw_transaction.inputs[0].unlock_conditions.public_keys[0].key, "PK1");
        assert_eq!(tx.raw_transaction.outputs[0].unlock_hash, "A1");
    }

    #[test]
    fn test_fee_bounds_field_names() {
        let fees: FeeBoundsResponse =
            serde_json::from_str(r#"{"minimum": "1000", "maximum": "9000"}"#).unwrap();
        assert_eq!(fees.min_fee, "1000");
        assert_eq!(fees.max_fee, "9000");
    }

    #[test]
    fn test_null_rate_entry_decodes() {
        let response: RateConversionResponse = serde_json::from_str(
            r#"{"rates": {"EUR": {"rate": null}, "GBP": {"rate": "0.79"}, "JPY": {}}}"#,
        )
        .unwrap();
        assert_eq!(response.rates["EUR"].rate, "");
        assert_eq!(response.rates["GBP"].rate, "0.79");
        assert_eq!(response.rates["JPY"].rate, "");
    }
}
