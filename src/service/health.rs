//! Health check endpoints and monitoring
//!
//! This module provides health check functionality for the Ascender
//! services, including readiness and liveness probes.

use crate::service::app::AppState;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Health check status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Value exported on the `ascender_health_status` gauge
    pub fn metric_value(self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }

    /// The worse of two statuses
    fn combine(self, other: HealthStatus) -> HealthStatus {
        match (self, other) {
            (HealthStatus::Unhealthy, _) | (_, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
            (HealthStatus::Degraded, _) | (_, HealthStatus::Degraded) => HealthStatus::Degraded,
            _ => HealthStatus::Healthy,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Degraded => write!(f, "⚠️  degraded"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// Service statistics
    pub stats: ServiceStats,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional error message if not healthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

impl ComponentCheck {
    fn new(name: &str, start: Instant, status: HealthStatus, message: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Service statistics for health reporting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Stored entities by kind
    pub entities: BTreeMap<String, usize>,
    pub uptime_seconds: u64,
}

impl HealthCheck {
    /// Perform a comprehensive health check of the service
    pub async fn check(app_state: Arc<AppState>) -> Result<Self> {
        let checks = vec![
            Self::check_service_running(&app_state).await,
            Self::check_storage(&app_state),
            Self::check_team_directory(&app_state).await,
        ];

        let status = checks
            .iter()
            .fold(HealthStatus::Healthy, |overall, check| {
                overall.combine(check.status)
            });

        let metrics = app_state.metrics();
        for check in &checks {
            metrics.update_component_health(&check.name, check.status == HealthStatus::Healthy);
        }

        Ok(HealthCheck {
            status,
            service: app_state.config().service.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            checks,
            stats: Self::gather_service_stats(&app_state),
        })
    }

    /// Simple liveness check - just verify service is running
    pub async fn liveness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if app_state.is_running().await {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }

    /// Readiness check - verify service can handle requests
    pub async fn readiness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if !app_state.is_running().await {
            return Ok(HealthStatus::Unhealthy);
        }

        let storage = Self::check_storage(&app_state).status;
        let directory = Self::check_team_directory(&app_state).await.status;
        Ok(storage.combine(directory))
    }

    async fn check_service_running(app_state: &AppState) -> ComponentCheck {
        let start = Instant::now();

        if app_state.is_running().await {
            ComponentCheck::new("service_running", start, HealthStatus::Healthy, None)
        } else {
            ComponentCheck::new(
                "service_running",
                start,
                HealthStatus::Unhealthy,
                Some("Service is not running".to_string()),
            )
        }
    }

    /// Storage is healthy when every store can be read
    fn check_storage(app_state: &AppState) -> ComponentCheck {
        let start = Instant::now();

        match app_state.api().entity_counts() {
            Ok(_) => ComponentCheck::new("storage", start, HealthStatus::Healthy, None),
            Err(e) => ComponentCheck::new(
                "storage",
                start,
                HealthStatus::Unhealthy,
                Some(format!("Storage unavailable: {}", e)),
            ),
        }
    }

    /// A remote team service that cannot be reached degrades tournament
    /// registration but leaves the rest of the API usable
    async fn check_team_directory(app_state: &AppState) -> ComponentCheck {
        let start = Instant::now();
        let directory = app_state.api().team_directory.clone();

        match directory.team_exists(Uuid::nil()).await {
            Ok(_) => ComponentCheck::new("team_directory", start, HealthStatus::Healthy, None),
            Err(e) => {
                warn!("Team directory ({}) probe failed: {}", directory.name(), e);
                ComponentCheck::new(
                    "team_directory",
                    start,
                    HealthStatus::Degraded,
                    Some(format!("{} team directory unreachable: {}", directory.name(), e)),
                )
            }
        }
    }

    fn gather_service_stats(app_state: &AppState) -> ServiceStats {
        let entities = match app_state.api().entity_counts() {
            Ok(counts) => counts
                .into_iter()
                .map(|(kind, count)| (kind.to_string(), count))
                .collect(),
            Err(e) => {
                debug!("Failed to count entities for health check: {}", e);
                BTreeMap::new()
            }
        };

        ServiceStats {
            entities,
            uptime_seconds: app_state.uptime().as_secs(),
        }
    }

    /// Read the report of an instance that is already serving `/health`.
    ///
    /// A 503 still carries a report; only transport or decoding failures
    /// are errors.
    pub async fn fetch(base_url: &str, timeout: Duration) -> Result<Self> {
        let url = format!("{}/health", base_url.trim_end_matches('/'));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build health check client")?;

        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("No answer from {}", url))?;
        debug!("{} answered {}", url, response.status());

        response
            .json::<HealthCheck>()
            .await
            .with_context(|| format!("{} did not return a health report", url))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize health check: {}", e))
    }
}
