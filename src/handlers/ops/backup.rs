// handlers/ops/backup.rs - POST /api/ops/backup

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::backup::{BackupCapture, BackupSummary};

/// Capture the whole directory into one timestamped backup object.
pub async fn run_backup(State(state): State<AppState>) -> Result<Json<BackupSummary>, ApiError> {
    let capture = BackupCapture::new(
        state.directory.clone(),
        state.store.clone(),
        state.directory_id.clone(),
    );
    let summary = capture.run().await?;
    Ok(Json(summary))
}
