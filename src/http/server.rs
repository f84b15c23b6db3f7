//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Wire up middleware (request ID, timeout, body limit, tracing)
//! - Count requests per matched route
//! - Serve until the shutdown signal fires

use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ListenerConfig;
use crate::http::handlers;
use crate::http::request::{request_id, request_id_layers, request_span};
use crate::observability::metrics;
use crate::sync::CacheStore;
use crate::upstream::DaemonClient;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub cache: CacheStore,
    pub daemon: DaemonClient,
}

/// HTTP server for the gateway facade.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ListenerConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        let (set_request_id, propagate_request_id) = request_id_layers();

        Router::new()
            .route("/{version}/scprime/data", get(handlers::scprime_data))
            .route(
                "/{version}/addresses/transactions/batch",
                post(handlers::addresses_transactions_batch),
            )
            .route("/{version}/transactions", post(handlers::new_transaction))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(middleware::from_fn(track_requests))
            .layer(RequestBodyLimitLayer::new(config.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(propagate_request_id)
            .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
            .layer(set_request_id)
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let id = request_id(&request).to_string();
    let method = request.method().clone();

    let response = next.run(request).await;
    let status = response.status().as_u16();

    tracing::debug!(request_id = %id, %method, route = %route, status, "Request handled");
    metrics::record_request(&route, status);
    response
}
