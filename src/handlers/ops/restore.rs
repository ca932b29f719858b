// handlers/ops/restore.rs - POST /api/ops/restore

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::restore::{RestoreApplication, RestoreSummary};

/// Replay a named backup object into the directory. Per-record
/// failures ride inside the summary; only preconditions fail the call.
pub async fn run_restore(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<RestoreSummary>, ApiError> {
    let file = body.get("file").and_then(Value::as_str).unwrap_or("");

    let restore = RestoreApplication::new(state.directory.clone(), state.store.clone());
    let summary = restore.run(file).await?;
    Ok(Json(summary))
}
