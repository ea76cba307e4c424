//! Vitals Server - Main entry point
//!
//! Registers the configured health checks, serves the health endpoints over
//! HTTP and runs the periodic background reporter.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use vitals::{
    checks::{DiskSpaceCheck, HttpCheck, PostgresCheck, RedisCheck},
    config::Config,
    registry::HealthRegistry,
    reporter::spawn_reporter,
    routes::health_router,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match std::env::var("VITALS_CONFIG") {
        Ok(path) => Config::from_file(&path)?,
        Err(_) => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load config: {}. Using defaults.", e);
            Config::default()
        }),
    };

    // Initialize logging
    telemetry::init_logging(&config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Vitals Server"
    );

    // Populate the registry from configuration
    let registry = Arc::new(HealthRegistry::new());
    register_checks(&registry, &config)?;
    tracing::info!(checks = registry.len(), "Health registry populated");

    // Start the periodic reporter
    let reporter = config
        .reporter
        .enabled
        .then(|| spawn_reporter(registry.clone(), config.reporter.clone()));

    // Build router
    let app = health_router(registry, &config.server.health_path);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!(address = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    if let Some(handle) = reporter {
        handle.abort();
    }
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Register every check whose configuration section is present.
fn register_checks(registry: &HealthRegistry, config: &Config) -> anyhow::Result<()> {
    if let Some(cfg) = &config.checks.postgres {
        let name = cfg.name.clone().unwrap_or_else(|| "postgres".to_string());
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect_lazy(&cfg.url)?;
        let check = PostgresCheck::new(pool).with_name(name.clone());
        registry.register(&name, cfg.kind, Arc::new(check))?;
        tracing::info!(check = %name, kind = %cfg.kind, "Registered postgres health check");
    }

    if let Some(cfg) = &config.checks.redis {
        let name = cfg.name.clone().unwrap_or_else(|| "redis".to_string());
        let check = RedisCheck::from_url(&cfg.url)?.with_name(name.clone());
        registry.register(&name, cfg.kind, Arc::new(check))?;
        tracing::info!(check = %name, kind = %cfg.kind, url = %cfg.url, "Registered redis health check");
    }

    if let Some(cfg) = &config.checks.http {
        let name = cfg.name.clone().unwrap_or_else(|| "http".to_string());
        let check = HttpCheck::new(cfg.urls.clone())
            .with_timeout(cfg.timeout)
            .with_name(name.clone());
        registry.register(&name, cfg.kind, Arc::new(check))?;
        tracing::info!(check = %name, kind = %cfg.kind, urls = cfg.urls.len(), "Registered http health check");
    }

    if let Some(cfg) = &config.checks.disk {
        let name = cfg.name.clone().unwrap_or_else(|| "disk-space".to_string());
        let check = DiskSpaceCheck::new(cfg.path.clone(), cfg.threshold_bytes)
            .with_name(name.clone());
        registry.register(&name, cfg.kind, Arc::new(check))?;
        tracing::info!(
            check = %name,
            kind = %cfg.kind,
            path = %cfg.path.display(),
            "Registered disk space health check"
        );
    }

    Ok(())
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
