//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → passed by value to client and scheduler constructors
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no global mutable settings
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::AppConfig;
pub use schema::DaemonConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::QuoteConfig;
pub use schema::RefreshPolicy;
pub use schema::SyncConfig;
