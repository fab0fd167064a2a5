pub mod address;
pub mod auth;
pub mod error;
pub mod health;
pub mod product;
pub mod profile;

pub use auth::ErrorResponse;
pub use error::{auth_error, database_error, tenant_error, validation_error, ApiError};

use serde::Serialize;

/// Envelope for successful mutations
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }
}
