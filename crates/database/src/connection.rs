use crate::error::{ConfigError, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use std::time::Duration;

/// Environment variables the server refuses to start without
pub const REQUIRED_ENV_VARS: [&str; 4] = ["DB_HOST", "DB_USER", "DB_PASS", "DB_NAME"];

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Primary database, serving the `main` and `default` tenants
    pub database: String,
    pub max_connections: u32,
    pub tenant_max_connections: u32,
    pub tenant_database_prefix: String,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "consignment".to_string(),
            max_connections: 10,
            tenant_max_connections: 5,
            tenant_database_prefix: "consignment_".to_string(),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Required variables must be
    /// present and non-empty; optional ones fall back to defaults when absent
    /// or unparsable.
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<String> = REQUIRED_ENV_VARS
            .iter()
            .filter(|name| lookup(name).map_or(true, |v| v.is_empty()))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let defaults = Self::default();
        let required = |name: &str| lookup(name).unwrap_or_default();

        Ok(Self {
            host: required("DB_HOST"),
            port: lookup("DB_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            user: required("DB_USER"),
            password: required("DB_PASS"),
            database: required("DB_NAME"),
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            tenant_max_connections: lookup("TENANT_DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tenant_max_connections),
            tenant_database_prefix: lookup("TENANT_DB_PREFIX")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.tenant_database_prefix),
            acquire_timeout: lookup("DB_ACQUIRE_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
        })
    }

    /// Server-level options with no default schema selected
    pub fn server_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Owner of the primary database pool
#[derive(Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let options = config.server_options().database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn into_pool(self) -> MySqlPool {
        self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
