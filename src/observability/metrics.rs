//! Metrics collection and exposition.
//!
//! # Metrics
//! - `feed_refresh_total` (counter): refresh attempts by feed, outcome
//! - `feed_consecutive_failures` (gauge): failures since the last success
//! - `feed_last_refresh_timestamp` (gauge): unix seconds of the last publish
//! - `chain_height` (gauge): last synced consensus height
//! - `api_requests_total` (counter): facade requests by route, status

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::sync::types::FeedKind;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_feed_refresh(feed: FeedKind, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("feed_refresh_total", "feed" => feed.as_str(), "outcome" => outcome).increment(1);

    if success {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        gauge!("feed_last_refresh_timestamp", "feed" => feed.as_str()).set(now);
    }
}

pub fn record_feed_failures(feed: FeedKind, failures: u64) {
    gauge!("feed_consecutive_failures", "feed" => feed.as_str()).set(failures as f64);
}

pub fn record_chain_height(height: u64) {
    gauge!("chain_height").set(height as f64);
}

/// Count one facade request; `route` is the matched route template.
pub fn record_request(route: &str, status: u16) {
    counter!(
        "api_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
