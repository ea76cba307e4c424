//! # Vitals
//!
//! Health check registry and evaluation engine for long-running services.
//!
//! ## Architecture
//!
//! - **Check**: the `HealthCheck` trait plus statuses, kinds and result payloads
//! - **Registry**: named check registration with kind merging and concurrent evaluation
//! - **Checks**: built-in PostgreSQL, Redis, HTTP and disk space probes
//! - **Routes**: HTTP endpoints serving combined, liveness and readiness reports
//! - **Reporter**: periodic background logging of the aggregate report
//! - **Config**: environment and file driven configuration
//! - **Telemetry**: structured logging initialization

pub mod check;
pub mod checks;
pub mod config;
pub mod error;
pub mod registry;
pub mod reporter;
pub mod routes;
pub mod telemetry;

pub use error::{BoxError, HealthError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::check::{
        CheckKind, CheckResult, CheckStatus, DataValue, HealthCheck, HealthReport,
    };
    pub use crate::checks::{DiskSpaceCheck, HttpCheck, PostgresCheck, RedisCheck};
    pub use crate::config::Config;
    pub use crate::error::{BoxError, HealthError, Result};
    pub use crate::registry::HealthRegistry;
    pub use crate::reporter::{spawn_reporter, ReporterConfig};
    pub use crate::routes::health_router;
    pub use crate::telemetry::{init_logging, LoggingConfig};
}
