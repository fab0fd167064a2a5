use consign_models::InvalidTenantId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Other(String),
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn duplicate(entity: &str, field: &str) -> Self {
        Self::DuplicateEntry(format!("{} with {} already exists", entity, field))
    }

    /// Maps unique-key violations to `DuplicateEntry`, everything else passes through
    pub fn from_insert(err: sqlx::Error, entity: &str, field: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::duplicate(entity, field)
            }
            _ => Self::ConnectionError(err),
        }
    }
}

/// Failures of the tenant connection registry.
///
/// Cloneable so that every caller waiting on a shared pool initialization
/// receives its own copy of the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantError {
    #[error("Invalid tenant '{tenant}': {reason}")]
    InvalidTenant { tenant: String, reason: String },

    #[error("Connection to tenant '{tenant}' failed: {message}")]
    TenantConnection { tenant: String, message: String },

    #[error("Provisioning tenant '{tenant}' failed: {message}")]
    Provisioning { tenant: String, message: String },
}

impl TenantError {
    pub fn invalid(tenant: &str, reason: InvalidTenantId) -> Self {
        Self::InvalidTenant {
            tenant: tenant.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn connection(tenant: &str, message: impl ToString) -> Self {
        Self::TenantConnection {
            tenant: tenant.to_string(),
            message: message.to_string(),
        }
    }

    pub fn provisioning(tenant: &str, message: impl ToString) -> Self {
        Self::Provisioning {
            tenant: tenant.to_string(),
            message: message.to_string(),
        }
    }

    pub fn tenant(&self) -> &str {
        match self {
            Self::InvalidTenant { tenant, .. }
            | Self::TenantConnection { tenant, .. }
            | Self::Provisioning { tenant, .. } => tenant,
        }
    }

    /// Caller errors as opposed to server-side failures
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidTenant { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),
}
