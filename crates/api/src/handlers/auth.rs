use super::{auth_error, ApiError, ApiResponse};
use crate::middleware::AuthUser;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Extension, Json};
use consign_auth::{AuthResponse, LoginRequest};
use consign_models::{NewUser, User};
use consign_tenant::TenantContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

/// Create an account in the request's tenant
pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<TenantContext>,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let user = state
        .auth_service
        .register(tenant.pool(), &tenant.tenant_id, request)
        .await
        .map_err(auth_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User registered successfully", user)),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<TenantContext>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = state
        .auth_service
        .login(tenant.pool(), &tenant.tenant_id, request)
        .await
        .map_err(auth_error)?;

    Ok(Json(response))
}

/// Echo the caller decoded from the token
pub async fn check_auth(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}
