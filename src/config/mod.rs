use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub site: SiteConfig,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

/// Presentation settings used by the root banner and the generated docs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub openapi_url: String,
    pub docs_url: String,
    pub redoc_url: String,
}

/// Per-route-group enable flags and endpoint defaults.
///
/// Disabled groups are not mounted at all, matching the original deployment
/// model where operators turn off whole endpoint families.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub items_enabled: bool,
    pub models_enabled: bool,
    pub forms_enabled: bool,
    pub docs_enabled: bool,

    /// Default page size when the client does not pass `limit`.
    pub default_limit: i64,
    /// Hard cap applied to any client-supplied `limit`.
    pub max_limit: i64,

    pub show_deleted_default: bool,
    pub delete_permanent_default: bool,
    pub update_deleted_default: bool,
    pub create_version_default: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Environment picks the defaults, specific env vars override.
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Site overrides
        if let Ok(v) = env::var("POSTHOLE_SITE_TITLE") {
            self.site.title = v;
        }
        if let Ok(v) = env::var("POSTHOLE_SITE_DESCRIPTION") {
            self.site.description = v;
        }

        // API overrides
        if let Ok(v) = env::var("POSTHOLE_ITEMS_ENABLED") {
            self.api.items_enabled = v.parse().unwrap_or(self.api.items_enabled);
        }
        if let Ok(v) = env::var("POSTHOLE_MODELS_ENABLED") {
            self.api.models_enabled = v.parse().unwrap_or(self.api.models_enabled);
        }
        if let Ok(v) = env::var("POSTHOLE_FORMS_ENABLED") {
            self.api.forms_enabled = v.parse().unwrap_or(self.api.forms_enabled);
        }
        if let Ok(v) = env::var("POSTHOLE_DOCS_ENABLED") {
            self.api.docs_enabled = v.parse().unwrap_or(self.api.docs_enabled);
        }
        if let Ok(v) = env::var("POSTHOLE_DEFAULT_LIMIT") {
            self.api.default_limit = v.parse().unwrap_or(self.api.default_limit);
        }
        if let Ok(v) = env::var("POSTHOLE_MAX_LIMIT") {
            self.api.max_limit = v.parse().unwrap_or(self.api.max_limit);
        }
        if let Ok(v) = env::var("POSTHOLE_SHOW_DELETED_DEFAULT") {
            self.api.show_deleted_default = v.parse().unwrap_or(self.api.show_deleted_default);
        }
        if let Ok(v) = env::var("POSTHOLE_DELETE_PERMANENT_DEFAULT") {
            self.api.delete_permanent_default =
                v.parse().unwrap_or(self.api.delete_permanent_default);
        }
        if let Ok(v) = env::var("POSTHOLE_UPDATE_DELETED_DEFAULT") {
            self.api.update_deleted_default = v.parse().unwrap_or(self.api.update_deleted_default);
        }
        if let Ok(v) = env::var("POSTHOLE_CREATE_VERSION_DEFAULT") {
            self.api.create_version_default = v.parse().unwrap_or(self.api.create_version_default);
        }

        // Database overrides
        if let Ok(v) = env::var("POSTHOLE_DB_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("POSTHOLE_DB_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs =
                v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        self
    }

    fn base_site() -> SiteConfig {
        SiteConfig {
            title: "Post Hole".to_string(),
            description: "Post Hole is a catch all API that can accept data of any shape, \
                          save it to a database, and allows you to perform CRUD actions on \
                          those records."
                .to_string(),
            openapi_url: "/openapi.json".to_string(),
            docs_url: "/docs".to_string(),
            redoc_url: "/redoc".to_string(),
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            site: Self::base_site(),
            api: ApiConfig {
                items_enabled: true,
                models_enabled: true,
                forms_enabled: true,
                docs_enabled: true,
                default_limit: 100,
                max_limit: 1000,
                show_deleted_default: false,
                delete_permanent_default: false,
                update_deleted_default: false,
                create_version_default: 0.0,
            },
            database: DatabaseConfig { max_connections: 10, acquire_timeout_secs: 30 },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            site: Self::base_site(),
            api: ApiConfig {
                items_enabled: true,
                models_enabled: true,
                forms_enabled: true,
                docs_enabled: true,
                default_limit: 100,
                max_limit: 100,
                show_deleted_default: false,
                delete_permanent_default: false,
                update_deleted_default: false,
                create_version_default: 0.0,
            },
            database: DatabaseConfig { max_connections: 50, acquire_timeout_secs: 5 },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
