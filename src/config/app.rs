//! Main application configuration
//!
//! This module defines the configuration structures for the Ascender
//! services, including environment variable and TOML file loading and
//! validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub upstream: UpstreamSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port for the REST API
    pub http_port: u16,
    /// Port for health check and metrics endpoints
    pub metrics_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Location of the team and game services.
///
/// When a URL is absent the in-process service is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub team_service_url: Option<String>,
    pub game_service_url: Option<String>,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "ascender".to_string(),
            log_level: "info".to_string(),
            http_port: 8080,
            metrics_port: 9090,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            team_service_url: None,
            game_service_url: None,
            request_timeout_ms: 5000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse a TOML document. Missing sections and keys take default values.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            self.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(port) = env::var("METRICS_PORT") {
            self.service.metrics_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid METRICS_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Upstream services
        if let Ok(url) = env::var("TEAM_SERVICE_URL") {
            self.upstream.team_service_url = Some(url);
        }
        if let Ok(url) = env::var("GAME_SERVICE_URL") {
            self.upstream.game_service_url = Some(url);
        }
        if let Ok(timeout) = env::var("UPSTREAM_TIMEOUT_MS") {
            self.upstream.request_timeout_ms = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid UPSTREAM_TIMEOUT_MS value: {}", timeout))?;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get upstream request timeout as Duration
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream.request_timeout_ms)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    if config.service.metrics_port == 0 {
        return Err(anyhow!("Metrics port cannot be 0"));
    }
    if config.service.http_port == config.service.metrics_port {
        return Err(anyhow!(
            "HTTP and metrics ports must differ (both {})",
            config.service.http_port
        ));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }
    if config.upstream.request_timeout_ms == 0 {
        return Err(anyhow!("Upstream request timeout must be greater than 0"));
    }

    // Validate upstream URLs
    for (name, url) in [
        ("team service", &config.upstream.team_service_url),
        ("game service", &config.upstream.game_service_url),
    ] {
        if let Some(url) = url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("Invalid {} URL: {}", name, url));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.upstream_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.service.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.service.metrics_port = config.service.http_port;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.upstream.request_timeout_ms = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.upstream.team_service_url = Some("teams:8080".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [service]
            http_port = 8181

            [upstream]
            team_service_url = "http://teams.internal:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.service.http_port, 8181);
        assert_eq!(config.service.metrics_port, 9090);
        assert_eq!(config.service.name, "ascender");
        assert_eq!(
            config.upstream.team_service_url.as_deref(),
            Some("http://teams.internal:8080")
        );
        assert!(config.upstream.game_service_url.is_none());
        assert!(validate_config(&config).is_ok());
    }
}
