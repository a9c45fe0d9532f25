//! Metrics and monitoring for the Ascender services
//!
//! This module provides Prometheus metrics collection and the HTTP server
//! exposing health probes and metrics.

pub mod collector;
pub mod health;

pub use collector::{
    HttpMetrics, MetricsCollector, MetricsTimer, ServiceMetrics, TournamentMetrics,
};
pub use health::{HealthEndpoints, HealthServer};
