//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Daemon readiness check → Spawn schedulers → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Stop scheduler loops → Join tasks → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast before serving: an unreachable or unsynced daemon is fatal
//! - Nothing is fatal once started; feeds degrade to stale values

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{check_daemon, StartupError};
