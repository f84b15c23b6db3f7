//! Daemon readiness check run once before serving.
//!
//! The gateway refuses to start unless the daemon answers the three module
//! probes: consensus (and is synced), transaction pool fees, and an empty
//! explorer batch.

use thiserror::Error;

use crate::upstream::{DaemonClient, UpstreamError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("test call to consensus failed: {0}")]
    Consensus(#[source] UpstreamError),

    #[error("consensus is not synced yet (height {height})")]
    NotSynced { height: u64 },

    #[error("test call to transaction pool failed: {0}")]
    TransactionPool(#[source] UpstreamError),

    #[error("test call to explorer failed: {0}")]
    Explorer(#[source] UpstreamError),
}

/// What a successful readiness check observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonReadiness {
    pub height: u64,
}

/// Probe the daemon modules the gateway depends on.
pub async fn check_daemon(daemon: &DaemonClient) -> Result<DaemonReadiness, StartupError> {
    let consensus = daemon.consensus().await.map_err(StartupError::Consensus)?;
    if !consensus.synced {
        return Err(StartupError::NotSynced {
            height: consensus.height,
        });
    }

    daemon
        .fee_bounds()
        .await
        .map_err(StartupError::TransactionPool)?;

    daemon
        .explorer_addresses(&[])
        .await
        .map_err(StartupError::Explorer)?;

    tracing::info!(height = consensus.height, "Daemon readiness check passed");
    Ok(DaemonReadiness {
        height: consensus.height,
    })
}

/// Multi-line hint printed when the readiness check fails.
pub fn diagnostic(daemon_url: &str) -> String {
    format!(
        "spd daemon connection failed, check that:\n\
         - spd API is running at {daemon_url}\n\
         - spd consensus module is synced\n\
         - spd explorer module is loaded\n\
         - spd transaction pool module is loaded\n\
         - spd.patch has been applied\n\
         Command example: scp-app-api [coinmarketcap api key] [spd api port] [spd api password] [custom port]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DaemonConfig;
    use mockito::{Server, ServerGuard};

    fn daemon_for(server: &ServerGuard) -> DaemonClient {
        let server_url = server.url();
        let (url, port) = server_url.rsplit_once(':').unwrap();
        DaemonClient::new(&DaemonConfig {
            url: url.to_string(),
            port: port.parse().unwrap(),
            ..DaemonConfig::default()
        })
        .unwrap()
    }

    async fn mock_consensus(server: &mut ServerGuard, synced: bool) {
        server
            .mock("GET", "/consensus")
            .with_status(200)
            .with_body(format!(r#"{{"synced": {synced}, "height": 42}}"#))
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn test_ready_daemon_passes() {
        let mut server = Server::new_async().await;
        mock_consensus(&mut server, true).await;
        server
            .mock("GET", "/tpool/fee")
            .with_status(200)
            .with_body(r#"{"minimum": "1", "maximum": "2"}"#)
            .create_async()
            .await;
        let explorer = server
            .mock("POST", "/explorer/addresses/batch")
            .match_body(r#"{"addresses":[]}"#)
            .with_status(200)
            .with_body(r#"{"addresses": null}"#)
            .create_async()
            .await;

        let readiness = check_daemon(&daemon_for(&server)).await.unwrap();
        assert_eq!(readiness.height, 42);
        explorer.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsynced_daemon_fails() {
        let mut server = Server::new_async().await;
        mock_consensus(&mut server, false).await;

        let err = check_daemon(&daemon_for(&server)).await.unwrap_err();
        assert!(matches!(err, StartupError::NotSynced { height: 42 }));
    }

    #[tokio::test]
    async fn test_missing_explorer_fails() {
        let mut server = Server::new_async().await;
        mock_consensus(&mut server, true).await;
        server
            .mock("GET", "/tpool/fee")
            .with_status(200)
            .with_body(r#"{"minimum": "1", "maximum": "2"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/explorer/addresses/batch")
            .with_status(404)
            .create_async()
            .await;

        let err = check_daemon(&daemon_for(&server)).await.unwrap_err();
        assert!(matches!(err, StartupError::Explorer(_)));
    }

    #[test]
    fn test_diagnostic_names_daemon_address() {
        let text = diagnostic("http://127.0.0.1:4280");
        assert!(text.contains("running at http://127.0.0.1:4280"));
        assert!(text.contains("explorer module"));
    }
}
