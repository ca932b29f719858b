// handlers/health.rs - GET /health

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::handlers::AppState;

/// Probe the directory. An inactive directory or a failed probe raises
/// an operational alert; alert failures themselves stay in the log.
pub async fn run_health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    tracing::info!("health check started");

    match state.directory.describe().await {
        Ok(status) if status.active => {
            tracing::info!("directory is healthy");
            (
                StatusCode::OK,
                Json(json!({ "status": "HEALTHY", "details": status.detail })),
            )
        }
        Ok(status) => {
            let message = format!(
                "Directory {} is not active: {}",
                status.directory_id, status.detail
            );
            tracing::warn!(%message);
            publish_alert(&state, &message).await;
            (
                StatusCode::OK,
                Json(json!({ "status": "ALERT", "details": message })),
            )
        }
        Err(e) => {
            let message = format!(
                "Health check failed for directory {}: {}",
                state.directory_id, e
            );
            tracing::error!(%message);
            publish_alert(&state, &message).await;
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "ERROR", "details": message })),
            )
        }
    }
}

async fn publish_alert(state: &AppState, message: &str) {
    let subject = format!("[ALERT] Directory {} Health Issue", state.directory_id);
    state.alerts.publish(&subject, message).await;
}
