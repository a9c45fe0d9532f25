//! Health check endpoints and Prometheus metrics server
//!
//! This module serves health probes and Prometheus metrics for the Ascender
//! services on a port separate from the REST API.

use crate::metrics::collector::MetricsCollector;
use crate::service::app::AppState;
use crate::service::health::{HealthCheck, HealthStatus};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

const SERVICE: &str = "ascender";

/// Health server configuration
#[derive(Debug, Clone)]
pub struct HealthServerConfig {
    /// Port to bind the health server to
    pub port: u16,
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
}

impl Default for HealthServerConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Shared state for the health server
#[derive(Clone)]
pub struct HealthServerState {
    pub metrics_collector: Arc<MetricsCollector>,
    pub app_state: Option<Arc<AppState>>,
}

/// Health server that provides HTTP endpoints for monitoring
pub struct HealthServer {
    config: HealthServerConfig,
    state: HealthServerState,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl HealthServer {
    /// Create a new health server
    pub fn new(config: HealthServerConfig, metrics_collector: Arc<MetricsCollector>) -> Self {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        Self {
            config,
            state: HealthServerState {
                metrics_collector,
                app_state: None,
            },
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Set the application state for health checks
    pub fn with_app_state(mut self, app_state: Arc<AppState>) -> Self {
        self.state.app_state = Some(app_state);
        self
    }

    /// Stop when a message arrives on `shutdown_tx` instead of a private channel
    pub fn with_shutdown(mut self, shutdown_tx: broadcast::Sender<()>) -> Self {
        self.shutdown_rx = shutdown_tx.subscribe();
        self.shutdown_tx = shutdown_tx;
        self
    }

    /// Sender that stops the server once it is serving
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Bind and serve until shutdown is signalled
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid health server address")?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind health server to {}", addr))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    ///
    /// The shutdown receiver is subscribed at construction, so a signal sent
    /// before serving begins is not lost.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let app = self.create_router();
        info!("Health server listening on http://{}", listener.local_addr()?);

        let mut shutdown_rx = self.shutdown_rx;

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("Health server shutdown signal received");
            })
            .await?;

        info!("Health server stopped");
        Ok(())
    }

    /// Create the Axum router with all health endpoints
    fn create_router(&self) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .route("/alive", get(alive_handler))
            .route("/metrics", get(metrics_handler))
            .route("/stats", get(stats_handler))
            .with_state(self.state.clone())
    }

}

/// Root endpoint handler - shows service information
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/health", "/ready", "/alive", "/metrics", "/stats"]
    }))
}

fn status_body(status: &str) -> Json<serde_json::Value> {
    Json(json!({
        "status": status,
        "service": SERVICE,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Full health report; degraded components still answer 200
async fn health_handler(State(state): State<HealthServerState>) -> Response {
    debug!("Health check requested");

    let Some(app_state) = state.app_state else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": SERVICE,
                "version": env!("CARGO_PKG_VERSION"),
                "error": "Service not initialized"
            })),
        )
            .into_response();
    };

    match HealthCheck::check(app_state).await {
        Ok(health) => {
            state
                .metrics_collector
                .update_health_status(health.status.metric_value());
            let code = match health.status {
                HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
                HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
            };
            (code, Json(health)).into_response()
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, status_body("unhealthy")).into_response()
        }
    }
}

/// Plain-text probe answer. Degraded still serves traffic.
fn probe_response(probe: &str, outcome: Option<Result<HealthStatus>>) -> (StatusCode, String) {
    match outcome {
        None => (StatusCode::SERVICE_UNAVAILABLE, "Service not initialized".to_string()),
        Some(Ok(status @ (HealthStatus::Healthy | HealthStatus::Degraded))) => {
            (StatusCode::OK, format!("{}: {}", probe, status))
        }
        Some(Ok(status)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("{}: {}", probe, status),
        ),
        Some(Err(e)) => {
            error!("{} probe failed: {}", probe, e);
            (StatusCode::SERVICE_UNAVAILABLE, format!("{}: error", probe))
        }
    }
}

async fn ready_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    let outcome = match state.app_state {
        Some(app_state) => Some(HealthCheck::readiness_check(app_state).await),
        None => None,
    };
    probe_response("ready", outcome)
}

async fn alive_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    let outcome = match state.app_state {
        Some(app_state) => Some(
            HealthCheck::liveness_check(app_state)
                .await
                .map(|status| match status {
                    // A running process with degraded upstreams is still alive
                    HealthStatus::Degraded => HealthStatus::Healthy,
                    other => other,
                }),
        ),
        None => None,
    };
    probe_response("alive", outcome)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<HealthServerState>) -> Response {
    debug!("Metrics endpoint requested");

    match HealthEndpoints::get_metrics_text(state.metrics_collector).await {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TextEncoder::new().format_type().to_string())],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics",
            )
                .into_response()
        }
    }
}

/// Detailed service statistics endpoint handler
async fn stats_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    debug!("Stats endpoint requested");

    let failure = |error: &str| {
        Json(json!({
            "service": {
                "name": SERVICE,
                "version": env!("CARGO_PKG_VERSION"),
                "status": "error"
            },
            "error": error,
            "timestamp": chrono::Utc::now()
        }))
    };

    let Some(app_state) = state.app_state else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            failure("Service not initialized"),
        );
    };

    match HealthCheck::check(app_state).await {
        Ok(health) => (
            StatusCode::OK,
            Json(json!({
                "service": {
                    "name": health.service,
                    "version": env!("CARGO_PKG_VERSION"),
                    "status": health.status,
                    "uptimeSeconds": health.stats.uptime_seconds
                },
                "entities": health.stats.entities,
                "components": health.checks,
                "timestamp": health.timestamp
            })),
        ),
        Err(e) => {
            error!("Failed to get stats: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                failure("Failed to get service stats"),
            )
        }
    }
}

/// Programmatic access to the same data the endpoints serve
pub struct HealthEndpoints;

impl HealthEndpoints {
    /// Get health status as JSON
    pub async fn get_health_status(app_state: Option<Arc<AppState>>) -> Result<serde_json::Value> {
        let Some(state) = app_state else {
            return Ok(json!({
                "status": "unhealthy",
                "service": SERVICE,
                "error": "Service not initialized"
            }));
        };

        let status = match HealthCheck::check(state).await {
            Ok(health) => health.status,
            Err(_) => HealthStatus::Unhealthy,
        };

        Ok(json!({ "status": status, "service": SERVICE }))
    }

    /// Get metrics as Prometheus text format
    pub async fn get_metrics_text(metrics_collector: Arc<MetricsCollector>) -> Result<String> {
        let metric_families = metrics_collector.registry().gather();
        debug!("Encoding {} metric families", metric_families.len());

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output is not valid UTF-8")
    }
}
