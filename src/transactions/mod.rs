//! Transaction history for a set of client addresses.
//!
//! # Data Flow
//! ```text
//! POST /{version}/addresses/transactions/batch
//!     → daemon explorer batch (confirmed, already address-scoped)
//!     → daemon transaction pool (all unconfirmed)
//!     → reconcile.rs (confirmed first, then matching pool entries)
//!     → types.rs (TransactionView in daemon field names)
//! ```

pub mod reconcile;
pub mod types;

pub use reconcile::{match_reason, reconcile, MatchReason};
pub use types::{
    BroadcastData, NewTransactionRequest, TransactionFilter, TransactionView,
    TransactionsBatchResponse,
};
