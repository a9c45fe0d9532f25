//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the Ascender services using
//! Prometheus metrics.

use crate::matches::{MatchOutcome, ScoreUpdate};
use anyhow::Result;
use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the Ascender services
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// REST API metrics
    http_metrics: HttpMetrics,

    /// Tournament and match metrics
    tournament_metrics: TournamentMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,

    /// Number of stored entities by kind
    pub entities: IntGaugeVec,
}

/// REST API metrics
#[derive(Clone)]
pub struct HttpMetrics {
    /// Requests served, by matched route, method and status code
    pub requests_total: IntCounterVec,

    /// Request latency
    pub request_duration: HistogramVec,

    /// Calls to remote team and game services
    pub upstream_calls_total: IntCounterVec,
}

/// Tournament and match metrics
#[derive(Clone)]
pub struct TournamentMetrics {
    pub tournaments_created_total: IntCounter,

    pub matches_created_total: IntCounter,

    /// Outcomes reported when matches complete, by kind (winner, draw, undetermined)
    pub match_outcomes_total: IntCounterVec,

    /// Score and technical-result mutations, by kind and result
    pub score_mutations_total: IntCounterVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let http_metrics = HttpMetrics::new(&registry)?;
        let tournament_metrics = TournamentMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            http_metrics,
            tournament_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get REST API metrics
    pub fn http(&self) -> &HttpMetrics {
        &self.http_metrics
    }

    /// Get tournament metrics
    pub fn tournament(&self) -> &TournamentMetrics {
        &self.tournament_metrics
    }

    /// Record a served API request
    pub fn record_http_request(&self, route: &str, method: &str, status: u16, duration: Duration) {
        let status = status.to_string();

        self.http_metrics
            .requests_total
            .with_label_values(&[route, method, &status])
            .inc();

        self.http_metrics
            .request_duration
            .with_label_values(&[route, method])
            .observe(duration.as_secs_f64());
    }

    /// Record a call to a remote service
    pub fn record_upstream_call(&self, service: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.http_metrics
            .upstream_calls_total
            .with_label_values(&[service, status])
            .inc();
    }

    pub fn record_tournament_created(&self) {
        self.tournament_metrics.tournaments_created_total.inc();
    }

    pub fn record_match_created(&self) {
        self.tournament_metrics.matches_created_total.inc();
    }

    /// Record the outcome of a match that just completed
    pub fn record_match_outcome(&self, outcome: &MatchOutcome) {
        self.tournament_metrics
            .match_outcomes_total
            .with_label_values(&[outcome.kind()])
            .inc();
    }

    /// Record a score or technical-result mutation
    pub fn record_score_mutation(&self, mutation: &str, result: ScoreUpdate) {
        let result = match result {
            ScoreUpdate::Applied => "applied",
            ScoreUpdate::TeamNotFound => "team_not_found",
        };

        self.tournament_metrics
            .score_mutations_total
            .with_label_values(&[mutation, result])
            .inc();
    }

    /// Update the stored entity count for one kind
    pub fn update_entity_count(&self, kind: &str, count: usize) {
        self.service_metrics
            .entities
            .with_label_values(&[kind])
            .set(count as i64);
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds = IntGauge::new("ascender_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let health_status = IntGauge::new(
            "ascender_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("ascender_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        let entities = IntGaugeVec::new(
            Opts::new("ascender_entities", "Number of stored entities"),
            &["kind"],
        )?;
        registry.register(Box::new(entities.clone()))?;

        Ok(Self {
            uptime_seconds,
            health_status,
            component_health,
            entities,
        })
    }
}

impl HttpMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("ascender_http_requests_total", "Total API requests served"),
            &["route", "method", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "ascender_http_request_duration_seconds",
                "API request duration",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["route", "method"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        let upstream_calls_total = IntCounterVec::new(
            Opts::new(
                "ascender_upstream_calls_total",
                "Calls made to remote team and game services",
            ),
            &["service", "status"],
        )?;
        registry.register(Box::new(upstream_calls_total.clone()))?;

        Ok(Self {
            requests_total,
            request_duration,
            upstream_calls_total,
        })
    }
}

impl TournamentMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let tournaments_created_total = IntCounter::new(
            "ascender_tournaments_created_total",
            "Total tournaments created",
        )?;
        registry.register(Box::new(tournaments_created_total.clone()))?;

        let matches_created_total =
            IntCounter::new("ascender_matches_created_total", "Total matches created")?;
        registry.register(Box::new(matches_created_total.clone()))?;

        let match_outcomes_total = IntCounterVec::new(
            Opts::new(
                "ascender_match_outcomes_total",
                "Outcomes of completed matches",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(match_outcomes_total.clone()))?;

        let score_mutations_total = IntCounterVec::new(
            Opts::new(
                "ascender_score_mutations_total",
                "Score and technical result mutations",
            ),
            &["mutation", "result"],
        )?;
        registry.register(Box::new(score_mutations_total.clone()))?;

        Ok(Self {
            tournaments_created_total,
            matches_created_total,
            match_outcomes_total,
            score_mutations_total,
        })
    }
}
