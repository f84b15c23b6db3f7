//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, timeouts > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let sync = &config.sync;
    let positive = [
        ("sync.chain_interval_secs", sync.chain_interval_secs),
        ("sync.chain_error_interval_secs", sync.chain_error_interval_secs),
        ("sync.quote_interval_secs", sync.quote_interval_secs),
        ("sync.quote_error_interval_secs", sync.quote_error_interval_secs),
        ("sync.rates_interval_secs", sync.rates_interval_secs),
        ("sync.rates_error_interval_secs", sync.rates_error_interval_secs),
        ("daemon.timeout_secs", config.daemon.timeout_secs),
        ("quotes.timeout_secs", config.quotes.timeout_secs),
        ("listener.request_timeout_secs", config.listener.request_timeout_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.daemon.port == 0 {
        errors.push(ValidationError::Zero { field: "daemon.port" });
    }
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "listener.max_body_size" });
    }

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_url(&mut errors, "daemon.url", &config.daemon.base_url());
    check_url(&mut errors, "quotes.cmc_api_url", &config.quotes.cmc_api_url);
    check_url(&mut errors, "quotes.rates_api_url", &config.quotes.rates_api_url);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
