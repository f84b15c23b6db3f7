//! Classified failures of upstream HTTP calls.

use thiserror::Error;

/// Errors that can occur while talking to the daemon or a quote provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream answered with a non-2xx status.
    #[error("{endpoint} error {status}")]
    Status { endpoint: String, status: u16 },

    /// DNS, connection, TLS or timeout failure before a response arrived.
    #[error("{endpoint} transport error: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body did not match the expected shape.
    #[error("{endpoint} returned a malformed body: {reason}")]
    Decode { endpoint: String, reason: String },

    /// The request could not be built (bad base URL, header value).
    #[error("invalid request to {endpoint}: {reason}")]
    InvalidRequest { endpoint: String, reason: String },
}

impl UpstreamError {
    /// Endpoint path the failure belongs to.
    pub fn endpoint(&self) -> &str {
        match self {
            UpstreamError::Status { endpoint, .. }
            | UpstreamError::Transport { endpoint, .. }
            | UpstreamError::Decode { endpoint, .. }
            | UpstreamError::InvalidRequest { endpoint, .. } => endpoint,
        }
    }

    /// Numeric status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn decode(endpoint: &str, reason: impl ToString) -> Self {
        UpstreamError::Decode {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = UpstreamError::Status {
            endpoint: "/consensus".to_string(),
            status: 490,
        };
        assert_eq!(err.to_string(), "/consensus error 490");
        assert_eq!(err.status(), Some(490));
        assert_eq!(err.endpoint(), "/consensus");
    }

    #[test]
    fn test_decode_display() {
        let err = UpstreamError::decode("/tpool/fee", "missing field `minimum`");
        assert!(err.to_string().contains("malformed"));
        assert!(err.status().is_none());
    }
}
