// Backup object store capability
pub mod fs;

use async_trait::async_trait;
use thiserror::Error;

pub use fs::FsBackupStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object '{0}' not found")]
    NotFound(String),

    #[error("invalid object key '{0}'")]
    InvalidKey(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Flat keyed object store holding one backup file per capture run.
#[async_trait]
pub trait BackupStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    async fn get(&self, key: &str) -> StoreResult<Vec<u8>>;
}

/// Object keys must be flat file names. Alphanumerics plus the
/// characters appearing in timestamped backup keys are allowed;
/// anything that could traverse out of the store root is not.
pub fn is_valid_key(key: &str) -> bool {
    if key.is_empty() || key.len() > 255 {
        return false;
    }
    if key.starts_with('.') {
        return false;
    }
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+'))
}
