// handlers/mod.rs - HTTP surface
//
// Two tiers: admin endpoints behind the group guard (/api/admin/*) and
// operator endpoints without it (/api/ops/*, /health). Deployments are
// expected to restrict network access to the operator routes.
pub mod admin;
pub mod health;
pub mod ops;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::alert::AlertPublisher;
use crate::config::AppConfig;
use crate::directory::DirectoryService;
use crate::notify::Notifier;
use crate::store::BackupStore;

/// Capability handles shared by all handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn DirectoryService>,
    pub store: Arc<dyn BackupStore>,
    pub alerts: Arc<dyn AlertPublisher>,
    pub notifier: Arc<Notifier>,
    pub directory_id: String,
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/health", get(health::run_health_check))
        .merge(admin_routes())
        .merge(ops_routes())
        .layer(cors_layer(&config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/users",
            get(admin::list::list_users).post(admin::create::create_admin_user),
        )
        .route("/api/admin/users/:username", delete(admin::delete::delete_user))
}

fn ops_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ops/backup", post(ops::backup::run_backup))
        .route("/api/ops/restore", post(ops::restore::run_restore))
}

/// Reflect only allow-listed origins; preflights answer with the
/// methods and headers the admin UI sends.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
