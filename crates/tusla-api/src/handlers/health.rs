//! Health check handlers

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorizer: Option<String>,
}

/// Service health. Pings the database and, when configured, the
/// categorization model. A failing model never fails the check.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match tokio::time::timeout(
        CHECK_TIMEOUT,
        sqlx::query("SELECT 1").execute(&state.pool),
    )
    .await
    {
        Ok(Ok(_)) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database health check failed");
            format!("unhealthy: {}", e)
        }
        Err(_) => {
            tracing::error!("Database health check timed out");
            "timeout".to_string()
        }
    };

    let categorizer = match &state.categorizer {
        Some(categorizer) => Some(
            match tokio::time::timeout(CHECK_TIMEOUT, categorizer.health_check()).await {
                Ok(Ok(true)) => "healthy".to_string(),
                Ok(Ok(false)) | Ok(Err(_)) => "unhealthy".to_string(),
                Err(_) => "timeout".to_string(),
            },
        ),
        None => None,
    };

    let healthy = database == "healthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        database,
        categorizer,
    };

    (status_code, Json(response))
}
