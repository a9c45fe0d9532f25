//! Main entry point for the Ascender esports services
//!
//! This is the production entry point that initializes and runs the game,
//! player, team and tournament services with logging, health endpoints and
//! graceful shutdown.

use anyhow::Result;
use ascender::config::AppConfig;
use ascender::service::{AppState, HealthCheck, HealthStatus};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tracing::{error, info, warn};

/// Ascender - esports teams, players and tournaments
#[derive(Parser)]
#[command(
    name = "ascender",
    version,
    about = "REST services for esports games, players, teams and tournaments",
    long_about = "Ascender hosts the game catalog, player profiles, team rosters with join \
                 requests, and tournaments with match scoring behind one REST API, with \
                 Prometheus metrics and health probes on a separate port."
)]
struct Args {
    /// TOML file read instead of the environment
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start the services once, report their health and exit 0 or 1
    #[arg(long)]
    health_check: bool,

    /// Tracing filter, e.g. `info` or `ascender=debug`
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Port of the REST API
    #[arg(long, value_name = "PORT")]
    http_port: Option<u16>,

    /// Port of the health and Prometheus endpoints
    #[arg(long, value_name = "PORT")]
    metrics_port: Option<u16>,

    /// Base URL of a remote team service
    #[arg(long, value_name = "URL")]
    team_service_url: Option<String>,

    /// Base URL of a remote game service
    #[arg(long, value_name = "URL")]
    game_service_url: Option<String>,

    /// Shorthand for `--log-level debug`
    #[arg(short, long)]
    debug: bool,

    /// Validate the merged configuration, print it and exit
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    /// Command line values win over the file and the environment
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.service.log_level = level.clone();
        }
        if self.debug {
            config.service.log_level = "debug".to_string();
        }
        if let Some(port) = self.http_port {
            config.service.http_port = port;
        }
        if let Some(port) = self.metrics_port {
            config.service.metrics_port = port;
        }
        if let Some(url) = &self.team_service_url {
            config.upstream.team_service_url = Some(url.clone());
        }
        if let Some(url) = &self.game_service_url {
            config.upstream.game_service_url = Some(url.clone());
        }
    }
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Ask the instance running on the configured metrics port for its health
/// report and exit 0 when it is healthy, 1 otherwise.
async fn perform_health_check(config: AppConfig) -> Result<()> {
    let base_url = format!("http://127.0.0.1:{}", config.service.metrics_port);
    info!("Checking health of {}", base_url);

    let result = HealthCheck::fetch(&base_url, config.upstream_timeout()).await;

    match result {
        Ok(health) => {
            println!("Health Check: {}", health.status);
            for check in &health.checks {
                println!(
                    "  {}: {}{}",
                    check.name,
                    check.status,
                    check
                        .message
                        .as_deref()
                        .map(|m| format!(" ({})", m))
                        .unwrap_or_default()
                );
            }

            if health.status == HealthStatus::Healthy {
                std::process::exit(0);
            } else {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Log the health report and export its status gauge every 30 seconds
async fn health_check_task(app_state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(30));

    while app_state.is_running().await {
        interval.tick().await;

        match HealthCheck::check(app_state.clone()).await {
            Ok(health) => {
                app_state
                    .metrics()
                    .update_health_status(health.status.metric_value());
                info!(
                    "Health check: {} - {:?}",
                    health.status, health.stats.entities
                );
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
            }
        }
    }
}

fn display_startup_banner(config: &AppConfig) {
    info!("🏆 Ascender esports services");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   API port: {}", config.service.http_port);
    info!("   Metrics port: {}", config.service.metrics_port);
    info!(
        "   Team service: {}",
        config
            .upstream
            .team_service_url
            .as_deref()
            .unwrap_or("in-process")
    );
    info!(
        "   Game service: {}",
        config
            .upstream
            .game_service_url
            .as_deref()
            .unwrap_or("in-process")
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };
    args.apply_overrides(&mut config);

    ascender::config::validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {:#}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if args.health_check {
        return perform_health_check(config).await;
    }

    if args.dry_run {
        display_startup_banner(&config);
        info!("Configuration is valid; not starting (--dry-run)");
        return Ok(());
    }

    display_startup_banner(&config);

    info!("Wiring services...");
    let app_state = match AppState::new(config.clone()).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Could not wire services: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app_state.start().await {
        error!("Could not start servers: {}", e);
        std::process::exit(1);
    }

    let health_task = tokio::spawn(health_check_task(app_state.clone()));

    info!("✅ Ascender is running");

    wait_for_shutdown_signal().await;

    info!("🛑 Stopping, waiting up to {:?}", config.shutdown_timeout());
    health_task.abort();

    match tokio::time::timeout(config.shutdown_timeout(), app_state.shutdown()).await {
        Ok(Ok(())) => info!("✅ Graceful shutdown completed successfully"),
        Ok(Err(e)) => error!("Shutdown failed: {}", e),
        Err(_) => warn!("⚠️  Shutdown timeout exceeded, forcing exit"),
    }

    info!("🛑 Ascender stopped");
    Ok(())
}
