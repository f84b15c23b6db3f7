//! Response bodies and error mapping for the facade.
//!
//! Every failure is reported to clients as `{"status":"ko"}`; the status
//! code is the only thing that distinguishes a bad request from a daemon
//! outage.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// `{"status": "ok" | "ko"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

impl StatusBody {
    pub const OK: StatusBody = StatusBody { status: "ok" };
    pub const KO: StatusBody = StatusBody { status: "ko" };
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body did not decode.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// A daemon query needed to answer the request failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The daemon refused to validate or broadcast a transaction set.
    #[error("transaction rejected: {0}")]
    Rejected(#[source] UpstreamError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::MalformedBody(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(error = %self, status = status.as_u16(), "Request failed");
        (status, Json(StatusBody::KO)).into_response()
    }
}
