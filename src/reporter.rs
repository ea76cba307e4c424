//! Periodic health reporter.
//!
//! A background task that evaluates the same registry the HTTP endpoints
//! read and logs the rendered report on a fixed period. Evaluation errors
//! are logged and the loop keeps going.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn, Level};

use crate::check::CheckKind;
use crate::registry::HealthRegistry;

/// Reporter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReporterConfig {
    /// Whether the reporter task runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Time between evaluations
    #[serde(default = "default_period", with = "humantime_serde")]
    pub period: Duration,

    /// Level the report is logged at (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,

    /// Which checks the reporter evaluates
    #[serde(default = "default_kind")]
    pub kind: CheckKind,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            period: default_period(),
            level: default_level(),
            kind: default_kind(),
        }
    }
}

/// Spawn the reporter task.
///
/// The first report goes out one full period after startup. The returned
/// handle is aborted by the composition root on shutdown.
pub fn spawn_reporter(registry: Arc<HealthRegistry>, config: ReporterConfig) -> JoinHandle<()> {
    let level = parse_level(&config.level);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // An interval's first tick completes immediately; skip it.
        interval.tick().await;

        loop {
            interval.tick().await;
            report_once(&registry, config.kind, level).await;
        }
    })
}

async fn report_once(registry: &HealthRegistry, kind: CheckKind, level: Level) {
    match registry.evaluate(kind).await {
        Ok(report) => match serde_json::to_string(&report) {
            Ok(payload) => log_report(level, &payload),
            Err(e) => error!(error = %e, "failed to render health report"),
        },
        Err(e) => error!(error = %e, "failed to evaluate health checks"),
    }
}

fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or_else(|_| {
        warn!(level = %level, "invalid reporter level, falling back to debug");
        Level::DEBUG
    })
}

fn log_report(level: Level, payload: &str) {
    match level {
        Level::ERROR => error!(report = %payload, "health report"),
        Level::WARN => warn!(report = %payload, "health report"),
        Level::INFO => info!(report = %payload, "health report"),
        Level::DEBUG => debug!(report = %payload, "health report"),
        Level::TRACE => trace!(report = %payload, "health report"),
    }
}

// Default value functions
fn default_enabled() -> bool {
    true
}

fn default_period() -> Duration {
    Duration::from_secs(60)
}

fn default_level() -> String {
    "debug".to_string()
}

fn default_kind() -> CheckKind {
    CheckKind::Both
}
