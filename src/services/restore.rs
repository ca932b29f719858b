// Snapshot restore application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::directory::{DirectoryError, DirectoryService, DirectoryUser, NewUser};
use crate::services::password::generate_temporary_password;
use crate::store::{BackupStore, StoreError};

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("no backup file specified")]
    MissingFile,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("backup file undecodable: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreFailure {
    pub username: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreSummary {
    pub status: String,
    pub restored_count: usize,
    /// Records already present in the directory; satisfied, not failed.
    pub skipped_count: usize,
    pub failed_count: usize,
    pub errors: Vec<RestoreFailure>,
    pub restore_time: DateTime<Utc>,
}

/// Replays a backup object into the directory, record by record. One
/// bad record never aborts the run.
pub struct RestoreApplication {
    directory: Arc<dyn DirectoryService>,
    store: Arc<dyn BackupStore>,
}

impl RestoreApplication {
    pub fn new(directory: Arc<dyn DirectoryService>, store: Arc<dyn BackupStore>) -> Self {
        Self { directory, store }
    }

    pub async fn run(&self, file: &str) -> Result<RestoreSummary, RestoreError> {
        if file.trim().is_empty() {
            return Err(RestoreError::MissingFile);
        }

        tracing::info!(file, "fetching backup file");
        let bytes = self.store.get(file).await?;
        let users: Vec<DirectoryUser> =
            serde_json::from_slice(&bytes).map_err(|e| RestoreError::Corrupt(e.to_string()))?;

        let mut restored = 0usize;
        let mut skipped = 0usize;
        let mut errors = Vec::new();

        for user in users {
            match self.restore_one(&user).await {
                Ok(Applied::Restored) => {
                    restored += 1;
                    tracing::info!(username = %user.username, "user restored");
                }
                Ok(Applied::AlreadyPresent) => {
                    skipped += 1;
                    tracing::debug!(username = %user.username, "user already present");
                }
                Err(e) => {
                    tracing::error!(username = %user.username, error = %e,
                        "failed to restore user");
                    errors.push(RestoreFailure {
                        username: user.username.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let summary = RestoreSummary {
            status: "completed".to_string(),
            restored_count: restored,
            skipped_count: skipped,
            failed_count: errors.len(),
            errors,
            restore_time: Utc::now(),
        };
        tracing::info!(restored = summary.restored_count, skipped = summary.skipped_count,
            failed = summary.failed_count, "restore complete");
        Ok(summary)
    }

    async fn restore_one(&self, user: &DirectoryUser) -> Result<Applied, DirectoryError> {
        let create = self
            .directory
            .create_user(NewUser {
                username: user.username.clone(),
                attributes: user.attributes.clone(),
                temporary_password: generate_temporary_password(),
                suppress_invitation: true,
            })
            .await;

        match create {
            Ok(()) => {}
            Err(DirectoryError::AlreadyExists(_)) => return Ok(Applied::AlreadyPresent),
            Err(e) => return Err(e),
        }

        if !user.enabled {
            self.directory.disable_user(&user.username).await?;
        }
        for group in &user.groups {
            self.directory
                .add_user_to_group(&user.username, *group)
                .await?;
        }

        Ok(Applied::Restored)
    }
}

enum Applied {
    Restored,
    AlreadyPresent,
}
