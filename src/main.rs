use std::sync::Arc;

use cmrp_admin_api::alert::{AlertPublisher, LogAlerter, WebhookAlerter};
use cmrp_admin_api::config;
use cmrp_admin_api::directory::ldap::LdapDirectory;
use cmrp_admin_api::handlers::{app, AppState};
use cmrp_admin_api::notify::Notifier;
use cmrp_admin_api::store::FsBackupStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up LDAP_ADDR, BACKUP_PATH, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!(directory = %config.directory.directory_id, "starting CMRP admin API");

    let directory = LdapDirectory::new(config.directory.clone())
        .map_err(|e| anyhow::anyhow!("directory configuration invalid: {}", e))?;

    let alerts: Arc<dyn AlertPublisher> = match &config.alert.webhook_url {
        Some(url) => Arc::new(WebhookAlerter::new(url.clone())),
        None => Arc::new(LogAlerter),
    };

    let state = AppState {
        directory: Arc::new(directory),
        store: Arc::new(FsBackupStore::new(config.backup.path.clone())),
        alerts,
        notifier: Arc::new(Notifier::new(config.brand.clone())),
        directory_id: config.directory.directory_id.clone(),
    };

    let router = app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, router).await?;
    Ok(())
}
