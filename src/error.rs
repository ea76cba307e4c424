//! Error types for the registry and its HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Boxed error returned by a malfunctioning check.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, HealthError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors surfaced by registry operations.
///
/// A dependency answering "down" is not an error: checks report that as a
/// `Down` result. `Check` covers the remaining case where a probe fails to
/// produce any result at all, which aborts the evaluation it runs in.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("health check name must not be empty")]
    EmptyCheckName,

    #[error("health check '{name}' failed to produce a result: {source}")]
    Check {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl HealthError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyCheckName => "INVALID_CHECK_NAME",
            Self::Check { .. } => "CHECK_MALFUNCTION",
        }
    }
}

impl IntoResponse for HealthError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, code = self.code(), "health evaluation failed");

        let body = serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
