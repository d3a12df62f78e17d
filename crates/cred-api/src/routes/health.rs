//! # Probes and Metrics
//!
//! Unauthenticated endpoints for load balancers, orchestrators and
//! scrapers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::MessageResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/heartbeat", get(heartbeat))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(render_metrics))
}

/// GET /heartbeat
#[utoipa::path(
    get,
    path = "/heartbeat",
    responses((status = 200, description = "Service is running", body = MessageResponse)),
    tag = "health"
)]
pub(crate) async fn heartbeat() -> Json<MessageResponse> {
    Json(MessageResponse::new("Service is up and running"))
}

/// Liveness probe. Always 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. 200 once a storage round-trip succeeds, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => "ready".into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable").into_response()
        }
    }
}

/// Prometheus text exposition, when the recorder is installed.
async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
