// Identity directory capability
pub mod ldap;
pub mod model;

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

pub use model::{DirectoryUser, Group, Role};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("directory service error: {0}")]
    Service(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// One page of a full-directory listing.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<DirectoryUser>,
    /// Token for the next page; `None` when the listing is exhausted.
    pub next: Option<String>,
}

/// One page of a group membership listing. Only usernames; membership
/// listings carry no attribute detail.
#[derive(Debug, Clone)]
pub struct GroupPage {
    pub usernames: Vec<String>,
    pub next: Option<String>,
}

/// Request to create a directory user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub attributes: BTreeMap<String, String>,
    pub temporary_password: String,
    /// When true the directory must not send its own invitation.
    pub suppress_invitation: bool,
}

/// Health probe result.
#[derive(Debug, Clone)]
pub struct DirectoryStatus {
    pub directory_id: String,
    pub active: bool,
    pub detail: String,
}

/// The identity directory the service administers. Implementations
/// wrap a concrete backend; handlers and services depend only on this
/// trait.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn list_users(&self, page: Option<String>) -> DirectoryResult<UserPage>;

    async fn list_users_in_group(
        &self,
        group: Group,
        page: Option<String>,
    ) -> DirectoryResult<GroupPage>;

    /// Extended per-user lookup: enablement, lifecycle status, MFA.
    async fn get_user_detail(&self, username: &str) -> DirectoryResult<DirectoryUser>;

    async fn create_user(&self, user: NewUser) -> DirectoryResult<()>;

    async fn set_password(
        &self,
        username: &str,
        password: &str,
        permanent: bool,
    ) -> DirectoryResult<()>;

    async fn disable_user(&self, username: &str) -> DirectoryResult<()>;

    async fn add_user_to_group(&self, username: &str, group: Group) -> DirectoryResult<()>;

    async fn delete_user(&self, username: &str) -> DirectoryResult<()>;

    async fn describe(&self) -> DirectoryResult<DirectoryStatus>;
}
