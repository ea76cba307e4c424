//! Redis probe.

use async_trait::async_trait;
use tracing::error;

use crate::check::{CheckResult, HealthCheck};
use crate::error::BoxError;

/// Probes a Redis server with a PING round trip.
///
/// A fresh connection is dialed per invocation and dropped afterwards;
/// nothing is pooled across checks.
pub struct RedisCheck {
    name: String,
    client: redis::Client,
}

impl RedisCheck {
    /// Create a new Redis probe over the given client.
    pub fn new(client: redis::Client) -> Self {
        Self {
            name: "redis".to_string(),
            client,
        }
    }

    /// Create a new Redis probe from a connection URL.
    pub fn from_url(url: &str) -> Result<Self, redis::RedisError> {
        Ok(Self::new(redis::Client::open(url)?))
    }

    /// Override the check name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Dial and ping once.
    async fn ping(&self) -> Result<(), String> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| format!("failed to connect: {e}"))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| format!("PING failed: {e}"))?;

        if pong != "PONG" {
            return Err(format!("unexpected PING response: {pong}"));
        }

        Ok(())
    }
}

#[async_trait]
impl HealthCheck for RedisCheck {
    async fn check(&self) -> Result<CheckResult, BoxError> {
        match self.ping().await {
            Ok(()) => Ok(CheckResult::up(&self.name)),
            Err(e) => {
                error!(check = %self.name, error = %e, "Redis health check failed");
                Ok(CheckResult::down(&self.name).with_data("error", e))
            }
        }
    }
}
