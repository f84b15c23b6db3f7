//! Single-attempt request execution shared by all upstream clients.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::upstream::error::{UpstreamError, UpstreamResult};

/// Build a `reqwest` client with the given timeout and user agent.
pub(crate) fn build_http_client(
    name: &str,
    timeout: Duration,
    user_agent: Option<&str>,
) -> UpstreamResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(timeout);
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent.to_string());
    }
    builder.build().map_err(|e| UpstreamError::InvalidRequest {
        endpoint: name.to_string(),
        reason: e.to_string(),
    })
}

/// Execute a request once and return the raw body of a 2xx response.
pub(crate) async fn send(endpoint: &str, request: RequestBuilder) -> UpstreamResult<Vec<u8>> {
    let response = request.send().await.map_err(|source| UpstreamError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let status = response.status();
    let body = response.bytes().await.map_err(|source| UpstreamError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;

    tracing::trace!(
        endpoint = endpoint,
        status = status.as_u16(),
        body = %String::from_utf8_lossy(&body),
        "Upstream response"
    );

    if !status.is_success() {
        tracing::debug!(endpoint = endpoint, status = status.as_u16(), "Upstream returned error status");
        return Err(UpstreamError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(body.to_vec())
}

/// Execute a request once and decode a 2xx JSON body into `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    endpoint: &str,
    request: RequestBuilder,
) -> UpstreamResult<T> {
    let body = send(endpoint, request).await?;
    serde_json::from_slice(&body).map_err(|e| UpstreamError::decode(endpoint, e))
}
