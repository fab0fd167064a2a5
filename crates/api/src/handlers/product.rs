use super::{database_error, validation_error, ApiError, ApiResponse};
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};
use consign_database::ProductRepository;
use consign_models::{NewProduct, Product, UpdateProduct};
use consign_tenant::TenantContext;
use validator::Validate;

fn products(tenant: &TenantContext) -> ProductRepository {
    ProductRepository::new(tenant.pool().clone())
}

pub async fn list_products(
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let items = products(&tenant).list().await.map_err(database_error)?;
    Ok(Json(items))
}

pub async fn create_product(
    Extension(tenant): Extension<TenantContext>,
    Json(request): Json<NewProduct>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    request.validate().map_err(validation_error)?;

    let product = products(&tenant)
        .create(&request)
        .await
        .map_err(database_error)?;

    tracing::info!(
        "Created product {} in tenant {}",
        product.product_id,
        tenant.tenant_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Product created successfully", product)),
    ))
}

pub async fn get_product(
    Path(product_id): Path<i32>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<Product>, ApiError> {
    let product = products(&tenant)
        .find_by_id(product_id)
        .await
        .map_err(database_error)?;

    Ok(Json(product))
}

pub async fn update_product(
    Path(product_id): Path<i32>,
    Extension(tenant): Extension<TenantContext>,
    Json(update): Json<UpdateProduct>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    update.validate().map_err(validation_error)?;

    let product = products(&tenant)
        .update(product_id, &update)
        .await
        .map_err(database_error)?;

    Ok(Json(ApiResponse::ok("Product updated successfully", product)))
}

pub async fn delete_product(
    Path(product_id): Path<i32>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<StatusCode, ApiError> {
    products(&tenant)
        .delete(product_id)
        .await
        .map_err(database_error)?;

    tracing::info!("Deleted product {} in tenant {}", product_id, tenant.tenant_id);
    Ok(StatusCode::NO_CONTENT)
}
