//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! sync + http subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (feed counters and gauges, request counters)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Prometheus scrape endpoint (only when enabled)
//! ```
//!
//! # Design Decisions
//! - Metric updates are no-ops until a recorder is installed
//! - The HTTP access-log span records the request ID, so events logged
//!   while serving a request carry it

pub mod logging;
pub mod metrics;
