use crate::handlers::{tenant_error, ApiError};
use crate::middleware::AuthUser;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use consign_tenant::TenantContext;
use std::sync::Arc;

/// Resolve the request's tenant to a pool and attach a `TenantContext`.
///
/// On protected routes this runs after `require_auth`, so the tenant bound
/// into the caller's token is used instead of the header.
pub async fn resolve_tenant(
    State(state): State<Arc<crate::AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claim = request
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.tenant_id.clone());

    let tenant_id = state
        .tenant_extractor
        .extract_tenant_id(claim.as_deref(), request.headers())
        .map_err(tenant_error)?;

    let pool = state
        .registry
        .resolve_tenant(&tenant_id)
        .await
        .map_err(tenant_error)?;

    tracing::debug!("Request bound to tenant {}", tenant_id);
    request
        .extensions_mut()
        .insert(TenantContext::new(tenant_id, pool));

    Ok(next.run(request).await)
}
