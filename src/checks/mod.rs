//! Built-in probes.
//!
//! This module provides ready-made [`HealthCheck`](crate::check::HealthCheck)
//! implementations for:
//! - **PostgreSQL**: connection pool and query round trip
//! - **Redis**: connection and PING round trip
//! - **HTTP**: reachability of a list of URLs
//! - **Disk space**: free bytes under a path against a threshold
//!
//! A dependency answering "unavailable" is the expected outcome for a probe,
//! so every probe here reports that as a `Down` result rather than an error.

mod disk;
mod http;
mod postgres;
mod redis;

pub use self::disk::*;
pub use self::http::*;
pub use self::postgres::*;
pub use self::redis::*;
