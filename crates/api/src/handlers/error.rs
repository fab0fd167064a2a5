// Mapping of crate errors onto HTTP responses

use super::ErrorResponse;
use axum::{http::StatusCode, Json};
use consign_auth::AuthError;
use consign_database::{DatabaseError, TenantError};
use validator::ValidationErrors;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, message: &str) -> ApiError {
    (status, Json(ErrorResponse::new(error, message)))
}

pub fn database_error(err: DatabaseError) -> ApiError {
    match &err {
        DatabaseError::NotFound(msg) => api_error(StatusCode::NOT_FOUND, "not_found", msg),
        DatabaseError::DuplicateEntry(msg) => api_error(StatusCode::CONFLICT, "duplicate", msg),
        DatabaseError::InvalidInput(msg) => {
            api_error(StatusCode::BAD_REQUEST, "invalid_input", msg)
        }
        DatabaseError::ConnectionError(_) | DatabaseError::Other(_) => {
            tracing::error!("Database error: {}", err);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Database error",
            )
        }
    }
}

pub fn auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::InvalidCredentials => api_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "Invalid username or password",
        ),
        AuthError::InvalidToken(_) | AuthError::TokenExpired | AuthError::JwtError(_) => {
            api_error(StatusCode::UNAUTHORIZED, "invalid_token", &err.to_string())
        }
        AuthError::WeakPassword(_) => {
            api_error(StatusCode::BAD_REQUEST, "weak_password", &err.to_string())
        }
        AuthError::ValidationError(_) => {
            api_error(StatusCode::BAD_REQUEST, "validation_error", &err.to_string())
        }
        AuthError::AlreadyExists(msg) => api_error(StatusCode::BAD_REQUEST, "user_exists", &msg),
        AuthError::DatabaseError(e) => database_error(e),
        AuthError::PasswordHashError(_) => {
            tracing::error!("Password hashing failed: {}", err);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            )
        }
    }
}

pub fn validation_error(err: ValidationErrors) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", &err.to_string())
}

pub fn tenant_error(err: TenantError) -> ApiError {
    if err.is_client_error() {
        return api_error(StatusCode::BAD_REQUEST, "invalid_tenant", &err.to_string());
    }

    tracing::error!("Tenant '{}' unavailable: {}", err.tenant(), err);
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "tenant_unavailable",
        &format!("Database for tenant '{}' is unavailable", err.tenant()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use consign_models::InvalidTenantId;

    #[test]
    fn test_invalid_tenant_is_bad_request() {
        let (status, Json(body)) =
            tenant_error(TenantError::invalid("bad name", InvalidTenantId::InvalidCharacters));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "invalid_tenant");
    }

    #[test]
    fn test_tenant_failures_are_server_errors() {
        let (status, Json(body)) = tenant_error(TenantError::provisioning("shopA", "denied"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.message.contains("shopA"));
        assert!(!body.message.contains("denied"));

        let (status, _) = tenant_error(TenantError::connection("shopA", "refused"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(auth_error(AuthError::InvalidCredentials).0, StatusCode::UNAUTHORIZED);
        assert_eq!(auth_error(AuthError::TokenExpired).0, StatusCode::UNAUTHORIZED);
        assert_eq!(
            auth_error(AuthError::AlreadyExists("taken".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            auth_error(AuthError::DatabaseError(DatabaseError::not_found("User", "7"))).0,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let (status, _) = database_error(DatabaseError::duplicate("User", "email"));
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
