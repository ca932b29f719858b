// handlers/admin/delete.rs - DELETE /api/admin/users/:username

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::admin::require_admin;
use crate::handlers::AppState;

/// Remove a directory user. An absent username answers 404, never a
/// generic failure.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers)?;

    tracing::info!(username = %username, "deleting user");
    state.directory.delete_user(&username).await?;

    Ok(Json(json!({
        "message": format!("User {} deleted successfully", username)
    })))
}
