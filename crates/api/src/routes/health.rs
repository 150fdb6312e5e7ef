//! Liveness and readiness endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::{Router, routing::get};
use serde::Serialize;
use tracing::error;

use crate::AppState;

/// Liveness payload: the process is up and answering.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the handler runs at all.
    pub status: &'static str,
    /// Service identifier for fleet dashboards.
    pub service: &'static str,
    /// Crate version baked in at compile time.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "vetbill",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness: the database must answer a ping before load balancers may
/// route invoice traffic here.
async fn readiness_check(State(state): State<AppState>) -> Response {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Readiness check failed: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

/// Creates the health routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
}
