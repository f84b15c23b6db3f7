//! Cache synchronization subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler.rs (one loop per feed, own cadence + error cadence)
//!     → sources.rs (daemon / quote provider fetch)
//!     → slot.rs (atomic wholesale publish)
//!
//! facade read
//!     → cache.rs (CacheStore: three feeds)
//!     → feed.rs (warm: snapshot; cold: one gated fetch)
//! ```
//!
//! # Design Decisions
//! - Each slot has one periodic writer and any number of readers
//! - A failed refresh never clears or mutates the published value
//! - Staleness is bounded by the scheduler cadence, not the read path

pub mod cache;
pub mod feed;
pub mod scheduler;
pub mod slot;
pub mod sources;
pub mod types;

pub use cache::{CacheStore, FeedStatus, NetworkOverview};
pub use feed::{Feed, FeedError, FeedSource, SharedSource};
pub use scheduler::{spawn_schedulers, FeedScheduler};
pub use slot::{FeedSlot, Snapshot};
pub use types::{ChainSummary, FeedKind, Quote, RateTable, SUPPORTED_FIATS};
