//! Client-facing HTTP facade.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, request ID, timeout, body limit, access log)
//!     → handlers.rs
//!         /scprime/data                  → CacheStore (read)
//!         /addresses/transactions/batch  → daemon explorer + pool → reconcile
//!         /transactions                  → daemon validate → daemon broadcast
//!     → response.rs ({"status":"ok"} / {"status":"ko"} bodies)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, StatusBody};
pub use server::{AppState, HttpServer};
