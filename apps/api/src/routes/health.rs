//! Liveness and database reachability.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// `GET /health`
///
/// 200 while the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = state.db.health_check().await;
    if !db_ok {
        warn!("Health check: database unreachable");
    }

    let (status, label, database) = if db_ok {
        (StatusCode::OK, "OK", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED", "unreachable")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            timestamp: Utc::now(),
            service: "Sweet Shop API",
            version: env!("CARGO_PKG_VERSION"),
            database,
        }),
    )
}
