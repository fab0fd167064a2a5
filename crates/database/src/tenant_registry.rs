//! Tenant Connection Registry
//!
//! Resolves a tenant identifier to a connection pool bound to that tenant's
//! database, creating the database and its base schema on first use:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        TenantRegistry                        │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  Main pool ("main" / "default", provisioning)          │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  Tenant pools (unbounded, no TTL, one init per key)    │  │
//! │  │  ┌─────────┐  ┌─────────┐  ┌─────────┐                 │  │
//! │  │  │ shopA   │  │ shopB   │  │ shopC   │  ...            │  │
//! │  │  └─────────┘  └─────────┘  └─────────┘                 │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A tenant entry moves `absent → provisioning → ready`. Failed
//! initializations leave the entry absent; `ready` entries are only dropped
//! by [`TenantRegistry::shutdown`].

use crate::connection::DatabaseConfig;
use crate::error::TenantError;
use crate::schema;
use async_trait::async_trait;
use consign_models::TenantId;
use moka::future::Cache;
use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlDatabaseError, MySqlPoolOptions};
use sqlx::{Connection, MySqlPool};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// MySQL `ER_BAD_DB_ERROR`
const ER_BAD_DB_ERROR: u16 = 1049;

/// Why a liveness probe failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The target database does not exist yet
    UnknownDatabase,
    Other(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDatabase => f.write_str("unknown database"),
            Self::Other(message) => f.write_str(message),
        }
    }
}

/// The only place that inspects driver error codes.
pub fn classify_probe_error(err: &sqlx::Error) -> ProbeFailure {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() {
            if mysql_err.number() == ER_BAD_DB_ERROR {
                return ProbeFailure::UnknownDatabase;
            }
        }
    }
    ProbeFailure::Other(err.to_string())
}

/// Pool factory and SQL capability the registry is built on
#[async_trait]
pub trait PoolConnector: Send + Sync + 'static {
    type Pool: Clone + Send + Sync + 'static;

    /// Build a bounded pool targeting `database` without connecting
    fn open(&self, database: &str, max_connections: u32) -> Self::Pool;

    /// Acquire a connection, ping it, release it
    async fn probe(&self, pool: &Self::Pool) -> Result<(), ProbeFailure>;

    /// Create `database` and its base tables through a connection of `main`
    async fn provision(&self, main: &Self::Pool, database: &str) -> Result<(), String>;

    async fn close(&self, pool: &Self::Pool);
}

/// sqlx-backed connector used in production
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
    acquire_timeout: Duration,
}

impl MySqlConnector {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.server_options(),
            acquire_timeout: config.acquire_timeout,
        }
    }
}

#[async_trait]
impl PoolConnector for MySqlConnector {
    type Pool = MySqlPool;

    fn open(&self, database: &str, max_connections: u32) -> MySqlPool {
        MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect_lazy_with(self.options.clone().database(database))
    }

    async fn probe(&self, pool: &MySqlPool) -> Result<(), ProbeFailure> {
        let mut conn = pool.acquire().await.map_err(|e| classify_probe_error(&e))?;
        conn.ping().await.map_err(|e| classify_probe_error(&e))?;
        Ok(())
    }

    async fn provision(&self, main: &MySqlPool, database: &str) -> Result<(), String> {
        // Returned to the pool on drop, whichever statement fails
        let mut conn = main.acquire().await.map_err(|e| e.to_string())?;

        for statement in schema::provisioning_statements(database) {
            sqlx::Executor::execute(&mut *conn, sqlx::raw_sql(&statement))
                .await
                .map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    async fn close(&self, pool: &MySqlPool) {
        pool.close().await;
    }
}

/// Configuration for the tenant registry
#[derive(Debug, Clone)]
pub struct TenantRegistryConfig {
    /// Prepended to the tenant identifier to name its database
    pub database_prefix: String,
    /// Max connections per tenant pool
    pub tenant_max_connections: u32,
}

impl Default for TenantRegistryConfig {
    fn default() -> Self {
        Self {
            database_prefix: "consignment_".to_string(),
            tenant_max_connections: 5,
        }
    }
}

impl From<&DatabaseConfig> for TenantRegistryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            database_prefix: config.tenant_database_prefix.clone(),
            tenant_max_connections: config.tenant_max_connections,
        }
    }
}

/// Tenant Connection Registry
///
/// Owns the main pool and one lazily created pool per tenant. Cloning is
/// cheap and every clone shares the same pools.
pub struct TenantRegistry<C: PoolConnector = MySqlConnector> {
    connector: Arc<C>,
    main_pool: C::Pool,
    pools: Cache<String, C::Pool>,
    config: TenantRegistryConfig,
}

impl<C: PoolConnector> Clone for TenantRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
            main_pool: self.main_pool.clone(),
            pools: self.pools.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: PoolConnector> TenantRegistry<C> {
    pub fn new(connector: C, main_pool: C::Pool, config: TenantRegistryConfig) -> Self {
        let pools = Cache::builder().name("tenant-pools").build();

        Self {
            connector: Arc::new(connector),
            main_pool,
            pools,
            config,
        }
    }

    /// Pool of the primary database
    pub fn main_pool(&self) -> &C::Pool {
        &self.main_pool
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn config(&self) -> &TenantRegistryConfig {
        &self.config
    }

    /// Get a ready pool for `tenant_id`.
    ///
    /// Concurrent first calls for the same tenant share one initialization.
    pub async fn resolve(&self, tenant_id: &str) -> Result<C::Pool, TenantError> {
        let tenant = TenantId::parse(tenant_id).map_err(|e| TenantError::invalid(tenant_id, e))?;
        self.resolve_tenant(&tenant).await
    }

    pub async fn resolve_tenant(&self, tenant: &TenantId) -> Result<C::Pool, TenantError> {
        if tenant.is_primary() {
            return Ok(self.main_pool.clone());
        }
        let database = self.database_name(tenant)?;

        self.pools
            .try_get_with(
                tenant.as_str().to_string(),
                self.open_tenant_pool(tenant, &database),
            )
            .await
            .map_err(|e| (*e).clone())
    }

    /// Create the tenant database and base tables if they are missing.
    pub async fn provision_tenant_database(&self, tenant_id: &str) -> Result<(), TenantError> {
        let tenant = TenantId::parse(tenant_id).map_err(|e| TenantError::invalid(tenant_id, e))?;
        if tenant.is_primary() {
            return Err(TenantError::InvalidTenant {
                tenant: tenant_id.to_string(),
                reason: "reserved for the primary database".to_string(),
            });
        }
        let database = self.database_name(&tenant)?;
        self.provision(&tenant, &database).await
    }

    /// Close the main pool and every tenant pool, then empty the cache.
    ///
    /// Calling it again only closes already-closed pools.
    pub async fn shutdown(&self) {
        self.connector.close(&self.main_pool).await;

        // A resolve still in flight may insert after this snapshot; its pool
        // is not closed here. Shutdown only runs once the server has drained.
        let cached: Vec<(Arc<String>, C::Pool)> = self.pools.iter().collect();
        for (tenant, pool) in &cached {
            self.connector.close(pool).await;
            self.pools.invalidate(tenant.as_str()).await;
        }
        self.pools.run_pending_tasks().await;

        tracing::info!("Closed main pool and {} tenant pools", cached.len());
    }

    pub fn is_cached(&self, tenant_id: &str) -> bool {
        self.pools.contains_key(tenant_id)
    }

    pub fn stats(&self) -> TenantRegistryStats {
        TenantRegistryStats {
            cached_pools: self.pools.iter().count(),
            database_prefix: self.config.database_prefix.clone(),
        }
    }

    fn database_name(&self, tenant: &TenantId) -> Result<String, TenantError> {
        tenant
            .checked_database_name(&self.config.database_prefix)
            .map_err(|e| TenantError::invalid(tenant.as_str(), e))
    }

    async fn open_tenant_pool(
        &self,
        tenant: &TenantId,
        database: &str,
    ) -> Result<C::Pool, TenantError> {
        let pool = match self.connect(database).await {
            Ok(pool) => pool,
            Err(ProbeFailure::UnknownDatabase) => {
                tracing::info!("Database {} not found, provisioning tenant {}", database, tenant);
                self.provision(tenant, database).await?;
                self.connect(database).await.map_err(|failure| {
                    tracing::error!("Tenant {} unreachable after provisioning: {}", tenant, failure);
                    TenantError::connection(tenant.as_str(), failure)
                })?
            }
            Err(failure) => {
                tracing::warn!("Connection to tenant {} failed: {}", tenant, failure);
                return Err(TenantError::connection(tenant.as_str(), failure));
            }
        };

        tracing::info!(
            "Created connection pool for tenant {} ({}, max {} connections)",
            tenant,
            database,
            self.config.tenant_max_connections
        );

        Ok(pool)
    }

    /// Build a pool and probe it; the pool is closed again if the probe fails
    async fn connect(&self, database: &str) -> Result<C::Pool, ProbeFailure> {
        let pool = self
            .connector
            .open(database, self.config.tenant_max_connections);

        match self.connector.probe(&pool).await {
            Ok(()) => Ok(pool),
            Err(failure) => {
                self.connector.close(&pool).await;
                Err(failure)
            }
        }
    }

    async fn provision(&self, tenant: &TenantId, database: &str) -> Result<(), TenantError> {
        self.connector
            .provision(&self.main_pool, database)
            .await
            .map_err(|message| {
                tracing::error!("Provisioning {} failed: {}", database, message);
                TenantError::provisioning(tenant.as_str(), message)
            })?;

        tracing::info!("✅ Database {} provisioned", database);
        Ok(())
    }
}

/// Registry statistics
#[derive(Debug, Clone, Serialize)]
pub struct TenantRegistryStats {
    pub cached_pools: usize,
    pub database_prefix: String,
}
