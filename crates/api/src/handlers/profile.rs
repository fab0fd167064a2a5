use super::{auth_error, database_error, ApiError, ApiResponse};
use crate::middleware::AuthUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use consign_database::UserRepository;
use consign_models::{UpdateUser, UserProfile};
use consign_tenant::TenantContext;
use std::sync::Arc;

/// Profile of the caller
pub async fn me(
    Extension(user): Extension<AuthUser>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = UserRepository::new(tenant.pool().clone())
        .profile(user.user_id)
        .await
        .map_err(database_error)?;

    Ok(Json(profile))
}

pub async fn get_profile(
    Path(user_id): Path<i32>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = UserRepository::new(tenant.pool().clone())
        .profile(user_id)
        .await
        .map_err(database_error)?;

    Ok(Json(profile))
}

/// Partial update of the caller's account and address
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Extension(tenant): Extension<TenantContext>,
    Json(update): Json<UpdateUser>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .auth_service
        .update_user(tenant.pool(), user.user_id, update)
        .await
        .map_err(auth_error)?;

    tracing::info!("Updated user {} in tenant {}", user.user_id, tenant.tenant_id);
    Ok(Json(ApiResponse::ok("User updated successfully", profile)))
}
