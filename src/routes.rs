//! Health check HTTP routes.
//!
//! Three endpoints share one handler shape and differ only in the filter they
//! evaluate: the base path covers every check, `/live` the liveness subset,
//! `/ready` the readiness subset. An up report answers 200, a down report
//! 503, and an evaluation error 500.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::check::{CheckKind, HealthReport};
use crate::error::Result;
use crate::registry::HealthRegistry;

/// Probe answers must never be served from a cache.
const CACHE_CONTROL: &str = "must-revalidate,no-cache,no-store";

/// Build the health router serving under the given base path.
///
/// The base path is normalized to a leading slash with no trailing one, so
/// both `health` and `/health/` mount at `/health`.
pub fn health_router(registry: Arc<HealthRegistry>, base_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let base = normalize_base_path(base_path);

    Router::new()
        .route(&base, get(health_check))
        .route(&format!("{base}/live"), get(liveness_check))
        .route(&format!("{base}/ready"), get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(registry)
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// GET {base} - every check, regardless of kind
async fn health_check(State(registry): State<Arc<HealthRegistry>>) -> Response {
    respond(registry.evaluate(CheckKind::Both).await)
}

/// GET {base}/live - liveness probe
async fn liveness_check(State(registry): State<Arc<HealthRegistry>>) -> Response {
    respond(registry.evaluate(CheckKind::Liveness).await)
}

/// GET {base}/ready - readiness probe
async fn readiness_check(State(registry): State<Arc<HealthRegistry>>) -> Response {
    respond(registry.evaluate(CheckKind::Readiness).await)
}

fn respond(outcome: Result<HealthReport>) -> Response {
    let mut response = match outcome {
        Ok(report) => {
            let status = if report.is_up() {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (status, Json(report)).into_response()
        }
        Err(e) => e.into_response(),
    };

    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL),
    );
    response
}
