//! Configuration management.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::check::CheckKind;
use crate::reporter::ReporterConfig;
use crate::telemetry::LoggingConfig;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Periodic health reporter configuration
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Built-in health check configuration
    #[serde(default)]
    pub checks: ChecksConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base path the health endpoints are mounted under
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            health_path: default_health_path(),
        }
    }
}

/// Built-in checks, each enabled by the presence of its section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecksConfig {
    /// PostgreSQL connectivity check
    pub postgres: Option<PostgresCheckConfig>,

    /// Redis connectivity check
    pub redis: Option<RedisCheckConfig>,

    /// Outbound HTTP endpoint check
    pub http: Option<HttpCheckConfig>,

    /// Free disk space check
    pub disk: Option<DiskCheckConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresCheckConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of probe connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Check name override
    pub name: Option<String>,

    /// Which endpoints the check participates in
    #[serde(default)]
    pub kind: CheckKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisCheckConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Check name override
    pub name: Option<String>,

    /// Which endpoints the check participates in
    #[serde(default)]
    pub kind: CheckKind,
}

impl Default for RedisCheckConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            name: None,
            kind: CheckKind::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpCheckConfig {
    /// URLs probed with a HEAD request
    pub urls: Vec<String>,

    /// Per-request timeout
    #[serde(with = "humantime_serde", default = "default_http_timeout")]
    pub timeout: Duration,

    /// Check name override
    pub name: Option<String>,

    /// Which endpoints the check participates in
    #[serde(default)]
    pub kind: CheckKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiskCheckConfig {
    /// Filesystem path whose mount is inspected
    #[serde(default = "default_disk_path")]
    pub path: PathBuf,

    /// Minimum free space before the check reports DOWN
    #[serde(default = "default_disk_threshold")]
    pub threshold_bytes: u64,

    /// Check name override
    pub name: Option<String>,

    /// Which endpoints the check participates in
    #[serde(default)]
    pub kind: CheckKind,
}

impl Default for DiskCheckConfig {
    fn default() -> Self {
        Self {
            path: default_disk_path(),
            threshold_bytes: default_disk_threshold(),
            name: None,
            kind: CheckKind::default(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_health_path() -> String {
    "/health".to_string()
}
fn default_max_connections() -> u32 {
    5
}
fn default_redis_url() -> String {
    "redis://localhost:6379/0".to_string()
}
fn default_http_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_disk_path() -> PathBuf {
    PathBuf::from("/")
}
fn default_disk_threshold() -> u64 {
    crate::checks::DEFAULT_DISK_THRESHOLD_BYTES
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("VITALS").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with environment overrides.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("VITALS").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }
}
