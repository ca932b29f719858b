// Shared test scaffolding: in-memory capability doubles and an
// in-process router driven through tower's oneshot.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use cmrp_admin_api::alert::AlertPublisher;
use cmrp_admin_api::config::AppConfig;
use cmrp_admin_api::directory::model::{DirectoryUser, Group};
use cmrp_admin_api::directory::{
    DirectoryError, DirectoryResult, DirectoryService, DirectoryStatus, GroupPage, NewUser,
    UserPage,
};
use cmrp_admin_api::handlers::{app, AppState};
use cmrp_admin_api::notify::Notifier;
use cmrp_admin_api::store::{is_valid_key, BackupStore, StoreError, StoreResult};

pub const TEST_DIRECTORY_ID: &str = "cmrp-users";

/// In-memory stand-in for the identity directory. Knobs switch on
/// paging and targeted per-user failures.
pub struct InMemoryDirectory {
    users: Mutex<BTreeMap<String, DirectoryUser>>,
    page_size: usize,
    active: AtomicBool,
    fail_describe: AtomicBool,
    fail_detail_for: Mutex<Option<String>>,
    fail_create_for: Mutex<Option<String>>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
            page_size: 0,
            active: AtomicBool::new(true),
            fail_describe: AtomicBool::new(false),
            fail_detail_for: Mutex::new(None),
            fail_create_for: Mutex::new(None),
        }
    }
}

impl InMemoryDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Force the full listing and group sweeps through multiple pages.
    pub fn with_page_size(page_size: usize) -> Arc<Self> {
        Arc::new(Self {
            page_size,
            ..Self::default()
        })
    }

    pub fn seed(&self, user: DirectoryUser) {
        self.users.lock().unwrap().insert(user.username.clone(), user);
    }

    pub fn clear(&self) {
        self.users.lock().unwrap().clear();
    }

    pub fn user(&self, username: &str) -> Option<DirectoryUser> {
        self.users.lock().unwrap().get(username).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn fail_describe(&self) {
        self.fail_describe.store(true, Ordering::SeqCst);
    }

    pub fn fail_detail_for(&self, username: &str) {
        *self.fail_detail_for.lock().unwrap() = Some(username.to_string());
    }

    pub fn fail_create_for(&self, username: &str) {
        *self.fail_create_for.lock().unwrap() = Some(username.to_string());
    }

    fn paginate<T: Clone>(&self, items: Vec<T>, page: Option<String>) -> (Vec<T>, Option<String>) {
        if self.page_size == 0 {
            return (items, None);
        }
        let start: usize = page.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        let next = (end < items.len()).then(|| end.to_string());
        (items[start..end].to_vec(), next)
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectory {
    async fn list_users(&self, page: Option<String>) -> DirectoryResult<UserPage> {
        let listed: Vec<DirectoryUser> = self
            .users
            .lock()
            .unwrap()
            .values()
            .map(|u| DirectoryUser {
                // Listing calls carry no group membership.
                groups: Default::default(),
                ..u.clone()
            })
            .collect();
        let (users, next) = self.paginate(listed, page);
        Ok(UserPage { users, next })
    }

    async fn list_users_in_group(
        &self,
        group: Group,
        page: Option<String>,
    ) -> DirectoryResult<GroupPage> {
        let members: Vec<String> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.groups.contains(&group))
            .map(|u| u.username.clone())
            .collect();
        let (usernames, next) = self.paginate(members, page);
        Ok(GroupPage { usernames, next })
    }

    async fn get_user_detail(&self, username: &str) -> DirectoryResult<DirectoryUser> {
        if self.fail_detail_for.lock().unwrap().as_deref() == Some(username) {
            return Err(DirectoryError::Service("detail lookup refused".to_string()));
        }
        self.users
            .lock()
            .unwrap()
            .get(username)
            .map(|u| DirectoryUser {
                groups: Default::default(),
                ..u.clone()
            })
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", username)))
    }

    async fn create_user(&self, user: NewUser) -> DirectoryResult<()> {
        if self.fail_create_for.lock().unwrap().as_deref() == Some(user.username.as_str()) {
            return Err(DirectoryError::Service("create refused".to_string()));
        }
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.username) {
            return Err(DirectoryError::AlreadyExists(format!(
                "user {}",
                user.username
            )));
        }
        users.insert(
            user.username.clone(),
            DirectoryUser {
                username: user.username,
                attributes: user.attributes,
                groups: Default::default(),
                enabled: true,
                status: "FORCE_CHANGE_PASSWORD".to_string(),
                mfa_settings: Vec::new(),
                preferred_mfa: None,
            },
        );
        Ok(())
    }

    async fn set_password(
        &self,
        username: &str,
        _password: &str,
        _permanent: bool,
    ) -> DirectoryResult<()> {
        self.users
            .lock()
            .unwrap()
            .contains_key(username)
            .then_some(())
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", username)))
    }

    async fn disable_user(&self, username: &str) -> DirectoryResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(username) {
            Some(user) => {
                user.enabled = false;
                Ok(())
            }
            None => Err(DirectoryError::NotFound(format!("user {}", username))),
        }
    }

    async fn add_user_to_group(&self, username: &str, group: Group) -> DirectoryResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(username) {
            Some(user) => {
                user.groups.insert(group);
                Ok(())
            }
            None => Err(DirectoryError::NotFound(format!("user {}", username))),
        }
    }

    async fn delete_user(&self, username: &str) -> DirectoryResult<()> {
        self.users
            .lock()
            .unwrap()
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", username)))
    }

    async fn describe(&self) -> DirectoryResult<DirectoryStatus> {
        if self.fail_describe.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable("probe refused".to_string()));
        }
        let active = self.active.load(Ordering::SeqCst);
        Ok(DirectoryStatus {
            directory_id: TEST_DIRECTORY_ID.to_string(),
            active,
            detail: if active {
                "directory is active".to_string()
            } else {
                "directory suspended".to_string()
            },
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl BackupStore for MemoryStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingAlerter {
    published: Mutex<Vec<(String, String)>>,
}

impl RecordingAlerter {
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertPublisher for RecordingAlerter {
    async fn publish(&self, subject: &str, message: &str) {
        self.published
            .lock()
            .unwrap()
            .push((subject.to_string(), message.to_string()));
    }
}

pub struct TestApp {
    pub router: Router,
    pub directory: Arc<InMemoryDirectory>,
    pub store: Arc<MemoryStore>,
    pub alerts: Arc<RecordingAlerter>,
}

pub fn test_app_with(directory: Arc<InMemoryDirectory>) -> TestApp {
    let config = AppConfig::from_env();
    let store = MemoryStore::new();
    let alerts = Arc::new(RecordingAlerter::default());
    let state = AppState {
        directory: directory.clone(),
        store: store.clone(),
        alerts: alerts.clone(),
        notifier: Arc::new(Notifier::new(config.brand.clone())),
        directory_id: TEST_DIRECTORY_ID.to_string(),
    };
    TestApp {
        router: app(state, &config),
        directory,
        store,
        alerts,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(InMemoryDirectory::new())
}

pub async fn request(
    router: &Router,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).expect("request build"))
        .await
        .expect("router oneshot");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub const ADMIN_CLAIMS: (&str, &str) = ("x-auth-claims", r#"{"groups":["Admin"]}"#);

pub fn sample_user(username: &str, groups: &[Group], enabled: bool) -> DirectoryUser {
    let attributes: BTreeMap<String, String> = [
        ("email", username.to_string()),
        ("name", format!("Name of {}", username)),
        ("region", "Attica".to_string()),
        ("city", "Athens".to_string()),
        ("telephone", "+301234567".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    DirectoryUser {
        username: username.to_string(),
        attributes,
        groups: groups.iter().copied().collect(),
        enabled,
        status: "CONFIRMED".to_string(),
        mfa_settings: Vec::new(),
        preferred_mfa: None,
    }
}
