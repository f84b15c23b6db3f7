//! Stale-value serving and graceful shutdown over a real listener.

use std::time::Duration;

use mockito::Server;
use scp_app_api::config::{ListenerConfig, RefreshPolicy};
use scp_app_api::http::{AppState, HttpServer};
use scp_app_api::lifecycle::Shutdown;
use scp_app_api::sync::{FeedError, FeedScheduler};

mod common;

use common::{mock_consensus, mock_fees, TestApp};

#[tokio::test]
async fn test_unsynced_refresh_keeps_last_chain_summary() {
    let mut server = Server::new_async().await;
    let synced = mock_consensus(&mut server, true, 100).await;
    mock_fees(&mut server).await;
    let app = TestApp::daemon_only(&server);

    let scheduler =
        FeedScheduler::new(app.cache.chain_feed().clone(), RefreshPolicy::from_secs(10, 60))
            .unwrap();
    scheduler.refresh_once().await.unwrap();
    assert_eq!(app.cache.chain_summary().await.unwrap().height, 100);

    synced.remove_async().await;
    mock_consensus(&mut server, false, 100).await;

    let err = scheduler.refresh_once().await.unwrap_err();
    assert!(matches!(err, FeedError::NotSynced { height: 100 }));
    assert_eq!(app.cache.chain_summary().await.unwrap().height, 100);
    assert_eq!(app.cache.chain_feed().slot().consecutive_failures(), 1);
}

#[tokio::test]
async fn test_daemon_outage_serves_stale_data() {
    let mut server = Server::new_async().await;
    let consensus = mock_consensus(&mut server, true, 55).await;
    let fees = mock_fees(&mut server).await;
    let app = TestApp::daemon_only(&server);

    // Warm the slot, then take the daemon away entirely.
    assert!(app.cache.chain_summary().await.is_some());
    consensus.remove_async().await;
    fees.remove_async().await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let gateway = HttpServer::new(
        &ListenerConfig::default(),
        AppState {
            cache: app.cache.clone(),
            daemon: app.daemon.clone(),
        },
    );
    let handle = tokio::spawn(gateway.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let body: serde_json::Value = client
        .get(format!("http://{addr}/v1/scprime/data"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["networkData"]["consensusHeight"], 55);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
