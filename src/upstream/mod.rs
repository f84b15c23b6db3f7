//! Upstream HTTP clients.
//!
//! # Data Flow
//! ```text
//! AppConfig
//!     → daemon.rs (spd API: consensus, tpool, explorer, broadcast)
//!     → quotes.rs (CoinMarketCap quote, getgeoapi rate table)
//!     → request.rs (single attempt, status + decode classification)
//!     → types.rs (typed response contracts)
//! ```
//!
//! # Design Decisions
//! - Clients are stateless and never retry
//! - Every failure carries the endpoint path it came from
//! - Quote clients only exist when their key is configured

pub mod daemon;
pub mod error;
pub mod quotes;
mod request;
pub mod types;

pub use daemon::DaemonClient;
pub use error::{UpstreamError, UpstreamResult};
pub use quotes::{QuoteClient, RateClient};
