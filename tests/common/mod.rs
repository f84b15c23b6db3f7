//! Shared fixtures for the facade integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use mockito::{Mock, ServerGuard};
use serde_json::Value;

use scp_app_api::config::{DaemonConfig, ListenerConfig, QuoteConfig};
use scp_app_api::http::{AppState, HttpServer};
use scp_app_api::sync::CacheStore;
use scp_app_api::upstream::{DaemonClient, QuoteClient, RateClient};

/// Daemon settings pointing at a mock server.
pub fn daemon_config(server: &ServerGuard) -> DaemonConfig {
    let server_url = server.url();
    let (url, port) = server_url.rsplit_once(':').unwrap();
    DaemonConfig {
        url: url.to_string(),
        port: port.parse().unwrap(),
        password: "secret".to_string(),
        ..DaemonConfig::default()
    }
}

/// Gateway wired to one mock server for the daemon and both providers.
pub struct TestApp {
    pub router: Router,
    pub cache: CacheStore,
    pub daemon: DaemonClient,
}

impl TestApp {
    pub fn new(server: &ServerGuard, quotes: QuoteConfig) -> Self {
        let daemon = DaemonClient::new(&daemon_config(server)).unwrap();
        let quote = QuoteClient::from_config(&quotes).unwrap();
        let rates = RateClient::from_config(&quotes).unwrap();
        let cache = CacheStore::from_clients(daemon.clone(), quote, rates);

        let router = HttpServer::build_router(
            &ListenerConfig::default(),
            AppState {
                cache: cache.clone(),
                daemon: daemon.clone(),
            },
        );
        Self {
            router,
            cache,
            daemon,
        }
    }

    /// No quote provider keys.
    pub fn daemon_only(server: &ServerGuard) -> Self {
        Self::new(server, QuoteConfig::default())
    }
}

/// Quote settings with both providers pointing at `server`.
pub fn quotes_on(server: &ServerGuard) -> QuoteConfig {
    QuoteConfig {
        cmc_api_url: server.url(),
        cmc_api_key: Some("cmc-key".to_string()),
        rates_api_url: server.url(),
        rates_api_key: Some("geo-key".to_string()),
        ..QuoteConfig::default()
    }
}

pub async fn mock_consensus(server: &mut ServerGuard, synced: bool, height: u64) -> Mock {
    server
        .mock("GET", "/consensus")
        .with_status(200)
        .with_body(format!(r#"{{"synced": {synced}, "height": {height}}}"#))
        .create_async()
        .await
}

pub async fn mock_fees(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/tpool/fee")
        .with_status(200)
        .with_body(r#"{"minimum": "1000", "maximum": "9000"}"#)
        .create_async()
        .await
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
