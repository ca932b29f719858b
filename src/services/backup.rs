// Full-directory backup capture

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::directory::model::Group;
use crate::directory::{DirectoryError, DirectoryService, DirectoryUser};
use crate::store::{BackupStore, StoreError};

#[derive(Debug, Error)]
pub enum BackupError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("backup encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSummary {
    pub status: String,
    /// Object key the snapshot was written under.
    pub file: String,
    pub user_count: usize,
    /// Users whose extended detail could not be fetched; their records
    /// carry listing fields only.
    pub degraded_count: usize,
    pub backup_time: DateTime<Utc>,
}

/// Captures the whole directory into one backup object per run.
pub struct BackupCapture {
    directory: Arc<dyn DirectoryService>,
    store: Arc<dyn BackupStore>,
    directory_id: String,
}

impl BackupCapture {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        store: Arc<dyn BackupStore>,
        directory_id: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            store,
            directory_id: directory_id.into(),
        }
    }

    pub async fn run(&self) -> Result<BackupSummary, BackupError> {
        let mut users = self.collect_users().await?;
        let memberships = self.collect_memberships().await?;

        let mut degraded = 0usize;
        for user in &mut users {
            match self.directory.get_user_detail(&user.username).await {
                Ok(detail) => {
                    user.enabled = detail.enabled;
                    user.status = detail.status;
                    user.mfa_settings = detail.mfa_settings;
                    user.preferred_mfa = detail.preferred_mfa;
                    for (name, value) in detail.attributes {
                        user.attributes.entry(name).or_insert(value);
                    }
                }
                Err(e) => {
                    degraded += 1;
                    tracing::warn!(username = %user.username, error = %e,
                        "detail fetch failed, keeping listing fields");
                }
            }
            if let Some(groups) = memberships.get(&user.username) {
                user.groups.extend(groups.iter().copied());
            }
        }

        let now = Utc::now();
        let key = format!("{}_backup_{}.json", self.directory_id, now.to_rfc3339());
        let body = serde_json::to_vec(&users)?;
        self.store.put(&key, &body).await?;

        tracing::info!(file = %key, user_count = users.len(), degraded,
            "backup capture complete");

        Ok(BackupSummary {
            status: "success".to_string(),
            file: key,
            user_count: users.len(),
            degraded_count: degraded,
            backup_time: now,
        })
    }

    /// Drain the full listing, following page tokens to exhaustion.
    async fn collect_users(&self) -> Result<Vec<DirectoryUser>, BackupError> {
        let mut users = Vec::new();
        let mut token = None;
        loop {
            let page = self.directory.list_users(token).await?;
            users.extend(page.users);
            match page.next {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        Ok(users)
    }

    /// One paged sweep per group rather than a lookup per user.
    async fn collect_memberships(
        &self,
    ) -> Result<BTreeMap<String, Vec<Group>>, BackupError> {
        let mut memberships: BTreeMap<String, Vec<Group>> = BTreeMap::new();
        for group in Group::all() {
            let mut token = None;
            loop {
                let page = self.directory.list_users_in_group(group, token).await?;
                for username in page.usernames {
                    memberships.entry(username).or_default().push(group);
                }
                match page.next {
                    Some(next) => token = Some(next),
                    None => break,
                }
            }
        }
        Ok(memberships)
    }
}
