//! Main application state and service coordination
//!
//! This module contains the production AppState that wires the services,
//! their upstream clients, the REST and health servers, and background tasks.

use crate::api::{self, ApiState};
use crate::clients::{GameCatalog, HttpGameCatalog, HttpTeamDirectory, TeamDirectory};
use crate::config::AppConfig;
use crate::metrics::health::HealthServerConfig;
use crate::metrics::{HealthServer, MetricsCollector};
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

/// How often entity gauges and uptime are refreshed
const GAUGE_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Server error: {message}")]
    Server { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Services behind the REST API
    api: ApiState,

    metrics: Arc<MetricsCollector>,

    /// Stops both HTTP servers
    shutdown_tx: broadcast::Sender<()>,

    /// Server tasks, awaited on shutdown
    server_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Periodic tasks, aborted on shutdown
    background_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Service status
    is_running: Arc<RwLock<bool>>,

    started_at: Instant,
}

impl AppState {
    /// Initialize the application with all dependencies
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing {} services", config.service.name);

        let metrics =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        let (team_directory, game_catalog) = Self::initialize_upstreams(&config, &metrics)?;
        let api = ApiState::with_upstreams(metrics.clone(), team_directory, game_catalog);
        info!(
            "Tournaments use the {} team directory",
            api.team_directory.name()
        );

        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            api,
            metrics,
            shutdown_tx,
            server_tasks: Mutex::new(Vec::new()),
            background_tasks: Mutex::new(Vec::new()),
            is_running: Arc::new(RwLock::new(false)),
            started_at: Instant::now(),
        })
    }

    /// Bind the servers and start background tasks
    pub async fn start(self: &Arc<Self>) -> Result<(), ServiceError> {
        info!("Starting {} services", self.config.service.name);

        // Bind before marking running so port conflicts fail startup
        let api_listener = Self::bind(self.config.service.http_port, "API").await?;
        let health_listener = Self::bind(self.config.service.metrics_port, "health").await?;

        *self.is_running.write().await = true;

        self.start_health_server(health_listener).await;
        self.start_api_server(api_listener).await;
        self.start_background_tasks().await;

        info!("✅ {} services started successfully", self.config.service.name);
        Ok(())
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of {}", self.config.service.name);

        *self.is_running.write().await = false;

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to servers: {}", e);
        }

        let servers: Vec<_> = self.server_tasks.lock().await.drain(..).collect();
        for server in servers {
            if let Err(e) = server.await {
                warn!("Server task ended abnormally: {}", e);
            }
        }
        info!("✅ HTTP servers stopped");

        self.stop_background_tasks().await;

        match self.api.entity_counts() {
            Ok(counts) => info!("Final entity counts: {:?}", counts),
            Err(e) => warn!("Failed to read final entity counts: {}", e),
        }

        info!("✅ {} shutdown completed", self.config.service.name);
        Ok(())
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Services behind the REST API
    pub fn api(&self) -> &ApiState {
        &self.api
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Remote clients for the configured upstream URLs; `None` selects the
    /// in-process service
    #[allow(clippy::type_complexity)]
    fn initialize_upstreams(
        config: &AppConfig,
        metrics: &Arc<MetricsCollector>,
    ) -> Result<
        (
            Option<Arc<dyn TeamDirectory>>,
            Option<Arc<dyn GameCatalog>>,
        ),
        ServiceError,
    > {
        let timeout = config.upstream_timeout();
        let configuration_error = |e: anyhow::Error| ServiceError::Configuration {
            message: e.to_string(),
        };

        let team_directory = match &config.upstream.team_service_url {
            Some(url) => {
                info!("Using remote team service at {}", url);
                let directory = HttpTeamDirectory::new(url, timeout)
                    .map_err(configuration_error)?
                    .with_metrics(metrics.clone());
                Some(Arc::new(directory) as Arc<dyn TeamDirectory>)
            }
            None => None,
        };

        let game_catalog = match &config.upstream.game_service_url {
            Some(url) => {
                info!("Using remote game service at {}", url);
                let catalog = HttpGameCatalog::new(url, timeout)
                    .map_err(configuration_error)?
                    .with_metrics(metrics.clone());
                Some(Arc::new(catalog) as Arc<dyn GameCatalog>)
            }
            None => None,
        };

        Ok((team_directory, game_catalog))
    }

    async fn bind(port: u16, what: &str) -> Result<TcpListener, ServiceError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::Server {
                message: format!("Failed to bind {} server to {}: {}", what, addr, e),
            })
    }

    async fn start_health_server(self: &Arc<Self>, listener: TcpListener) {
        let server = HealthServer::new(
            HealthServerConfig {
                port: self.config.service.metrics_port,
                host: "0.0.0.0".to_string(),
            },
            self.metrics.clone(),
        )
        .with_app_state(self.clone())
        .with_shutdown(self.shutdown_tx.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                error!("Health server failed: {}", e);
            }
        });

        self.server_tasks.lock().await.push(handle);
        info!(
            "✅ Health and metrics endpoints on port {}",
            self.config.service.metrics_port
        );
    }

    async fn start_api_server(&self, listener: TcpListener) {
        let app = api::router(self.api.clone());
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let port = self.config.service.http_port;

        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                    info!("API server shutdown signal received");
                })
                .await;

            match served {
                Ok(()) => info!("API server stopped"),
                Err(e) => error!("API server failed: {}", e),
            }
        });

        self.server_tasks.lock().await.push(handle);
        info!("✅ REST API listening on port {}", port);
    }

    /// Start background maintenance tasks
    async fn start_background_tasks(&self) {
        let gauge_task = {
            let api = self.api.clone();
            let metrics = self.metrics.clone();
            let is_running = self.is_running.clone();
            let started_at = self.started_at;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(GAUGE_REFRESH_INTERVAL);
                debug!("Gauge refresh task started");

                while *is_running.read().await {
                    interval.tick().await;

                    metrics
                        .service()
                        .uptime_seconds
                        .set(started_at.elapsed().as_secs() as i64);

                    match api.entity_counts() {
                        Ok(counts) => {
                            for (kind, count) in counts {
                                metrics.update_entity_count(kind, count);
                            }
                        }
                        Err(e) => warn!("Failed to count entities for metrics: {}", e),
                    }
                }

                debug!("Gauge refresh task stopped");
            })
        };

        self.background_tasks.lock().await.push(gauge_task);
        info!("Background maintenance tasks started");
    }

    /// Stop all background tasks
    async fn stop_background_tasks(&self) {
        let tasks: Vec<_> = self.background_tasks.lock().await.drain(..).collect();
        if tasks.is_empty() {
            return;
        }

        info!("Stopping {} background tasks...", tasks.len());
        for task in tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_uses_local_upstreams_by_default() {
        let state = AppState::new(AppConfig::default()).await.unwrap();

        assert!(!state.is_running().await);
        assert_eq!(state.api().team_directory.name(), "local");
        assert_eq!(state.config().service.name, "ascender");
    }

    #[tokio::test]
    async fn test_new_uses_remote_team_service_when_configured() {
        let mut config = AppConfig::default();
        config.upstream.team_service_url = Some("http://teams.internal:8080".to_string());

        let state = AppState::new(config).await.unwrap();
        assert_eq!(state.api().team_directory.name(), "http");
    }

    #[tokio::test]
    async fn test_shutdown_without_start() {
        let state = AppState::new(AppConfig::default()).await.unwrap();
        state.shutdown().await.unwrap();
        assert!(!state.is_running().await);
    }
}
