use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub directory: DirectoryConfig,
    pub backup: BackupConfig,
    pub alert: AlertConfig,
    pub brand: BrandConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Origins allowed to call the browser-facing admin endpoints.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Stable identifier of the directory, used to key backup files.
    pub directory_id: String,
    pub ldap_addr: String,
    pub bind_dn: Option<String>,
    pub bind_password: Option<String>,
    /// Subtree holding user entries, e.g. `ou=people,dc=cmrp,dc=example`.
    pub users_base_dn: String,
    /// Subtree holding group entries, e.g. `ou=groups,dc=cmrp,dc=example`.
    pub groups_base_dn: String,
    /// Template with a `{uid}` placeholder for a user's dn.
    pub user_dn_template: String,
    /// Template with a `{group}` placeholder for a group's dn.
    pub group_dn_template: String,
    pub page_size: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Root directory of the backup object store.
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Webhook receiving operational alerts. When unset, alerts go to the log.
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    pub color: String,
    pub accent_color: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(v) = env::var("DIRECTORY_ID") {
            self.directory.directory_id = v;
        }
        if let Ok(v) = env::var("LDAP_ADDR") {
            self.directory.ldap_addr = v;
        }
        if let Ok(v) = env::var("LDAP_BIND_DN") {
            self.directory.bind_dn = Some(v);
        }
        if let Ok(v) = env::var("LDAP_BIND_PASSWORD") {
            self.directory.bind_password = Some(v);
        }
        if let Ok(v) = env::var("LDAP_USERS_BASE_DN") {
            self.directory.users_base_dn = v;
        }
        if let Ok(v) = env::var("LDAP_GROUPS_BASE_DN") {
            self.directory.groups_base_dn = v;
        }
        if let Ok(v) = env::var("LDAP_USER_DN_TEMPLATE") {
            self.directory.user_dn_template = v;
        }
        if let Ok(v) = env::var("LDAP_GROUP_DN_TEMPLATE") {
            self.directory.group_dn_template = v;
        }
        if let Ok(v) = env::var("LDAP_PAGE_SIZE") {
            self.directory.page_size = v.parse().unwrap_or(self.directory.page_size);
        }

        if let Ok(v) = env::var("BACKUP_PATH") {
            self.backup.path = v;
        }
        if let Ok(v) = env::var("ALERT_WEBHOOK_URL") {
            self.alert.webhook_url = Some(v);
        }

        if let Ok(v) = env::var("BRAND_NAME") {
            self.brand.name = v;
        }

        self
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                cors_origins: vec![
                    "http://localhost:4200".to_string(),
                    "https://app.cmrp.example".to_string(),
                ],
            },
            directory: DirectoryConfig {
                directory_id: "cmrp-users".to_string(),
                ldap_addr: "ldap://localhost:389".to_string(),
                bind_dn: None,
                bind_password: None,
                users_base_dn: "ou=people,dc=cmrp,dc=example".to_string(),
                groups_base_dn: "ou=groups,dc=cmrp,dc=example".to_string(),
                user_dn_template: "uid={uid},ou=people,dc=cmrp,dc=example".to_string(),
                group_dn_template: "cn={group},ou=groups,dc=cmrp,dc=example".to_string(),
                page_size: 500,
            },
            backup: BackupConfig {
                path: "./backups".to_string(),
            },
            alert: AlertConfig { webhook_url: None },
            brand: BrandConfig {
                name: "CMRP".to_string(),
                color: "#1A1A1A".to_string(),
                accent_color: "#D72638".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
