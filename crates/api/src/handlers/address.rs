use super::{database_error, validation_error, ApiError, ApiResponse};
use crate::middleware::AuthUser;
use axum::{extract::Path, Extension, Json};
use consign_database::AddressRepository;
use consign_models::{Address, UpdateAddress};
use consign_tenant::TenantContext;
use serde::Serialize;
use validator::Validate;

/// A user's address, serialized as `{}` when none is stored
#[derive(Debug, Serialize)]
pub struct AddressResponse {
    #[serde(flatten)]
    pub address: Option<Address>,
}

pub async fn get_address(
    Path(user_id): Path<i32>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<AddressResponse>, ApiError> {
    let address = AddressRepository::new(tenant.pool().clone())
        .find_by_user(user_id)
        .await
        .map_err(database_error)?;

    Ok(Json(AddressResponse { address }))
}

/// Create or update the caller's address
pub async fn update_address(
    Extension(user): Extension<AuthUser>,
    Extension(tenant): Extension<TenantContext>,
    Json(update): Json<UpdateAddress>,
) -> Result<Json<ApiResponse<Address>>, ApiError> {
    update.validate().map_err(validation_error)?;

    let address = AddressRepository::new(tenant.pool().clone())
        .upsert(user.user_id, &update)
        .await
        .map_err(database_error)?;

    Ok(Json(ApiResponse::ok("Address updated successfully", address)))
}
