// Tenant context for request handling

use consign_models::TenantId;
use sqlx::MySqlPool;

/// Tenant of the current request and the pool resolved for it
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: TenantId,
    pub pool: MySqlPool,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId, pool: MySqlPool) -> Self {
        Self { tenant_id, pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}
