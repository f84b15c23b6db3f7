//! Merge confirmed history with matching unconfirmed pool entries.

use std::collections::HashSet;

use crate::transactions::types::{TransactionFilter, TransactionView};
use crate::upstream::types::{ExplorerAddress, RawTransaction};

/// Which criterion admitted a pool transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    /// An output pays one of the filter addresses.
    Address,
    /// An input is unlocked by one of the filter public keys.
    PublicKey,
}

/// Filter sets built once per request.
struct Predicate<'a> {
    addresses: HashSet<&'a str>,
    public_keys: HashSet<&'a str>,
}

impl<'a> Predicate<'a> {
    fn new(filter: &'a TransactionFilter) -> Self {
        Self {
            addresses: filter.addresses.iter().map(String::as_str).collect(),
            public_keys: filter.public_keys.iter().map(String::as_str).collect(),
        }
    }

    fn check(&self, tx: &RawTransaction) -> Option<MatchReason> {
        if tx
            .outputs
            .iter()
            .any(|output| self.addresses.contains(output.unlock_hash.as_str()))
        {
            return Some(MatchReason::Address);
        }

        tx.inputs
            .iter()
            .flat_map(|input| &input.unlock_conditions.public_keys)
            .any(|pk| self.public_keys.contains(pk.key.as_str()))
            .then_some(MatchReason::PublicKey)
    }
}

/// First criterion `tx` satisfies, address before public key.
pub fn match_reason(tx: &RawTransaction, filter: &TransactionFilter) -> Option<MatchReason> {
    Predicate::new(filter).check(tx)
}

/// Confirmed entries in explorer order, then matching pool entries in pool
/// order. Each pool transaction is appended at most once.
pub fn reconcile(
    confirmed: Vec<ExplorerAddress>,
    pool: Vec<RawTransaction>,
    filter: &TransactionFilter,
) -> Vec<TransactionView> {
    let mut transactions: Vec<TransactionView> = confirmed
        .into_iter()
        .flat_map(|address| address.transactions)
        .map(TransactionView::from)
        .collect();
    let confirmed_count = transactions.len();

    let predicate = Predicate::new(filter);
    for tx in pool {
        if let Some(reason) = predicate.check(&tx) {
            tracing::trace!(?reason, "Pool transaction matched filter");
            transactions.push(TransactionView::from(tx));
        }
    }

    tracing::debug!(
        confirmed = confirmed_count,
        unconfirmed = transactions.len() - confirmed_count,
        "Reconciled transactions"
    );
    transactions
}
