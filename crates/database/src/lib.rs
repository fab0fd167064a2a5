pub mod connection;
pub mod error;
pub mod repositories;
pub mod schema;
pub mod tenant_registry;

pub use connection::{Database, DatabaseConfig, REQUIRED_ENV_VARS};
pub use error::{ConfigError, DatabaseError, Result, TenantError};
pub use repositories::{
    addresses::AddressRepository,
    products::ProductRepository,
    users::UserRepository,
};
pub use tenant_registry::{
    classify_probe_error, MySqlConnector, PoolConnector, ProbeFailure, TenantRegistry,
    TenantRegistryConfig, TenantRegistryStats,
};
