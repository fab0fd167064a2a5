use crate::handlers::ErrorResponse;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use consign_auth::{AuthService, Claims};
use consign_models::Role;
use serde::Serialize;
use std::sync::Arc;

/// Authenticated user context
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub tenant_id: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = consign_auth::AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id()?,
            username: claims.username,
            role: claims.role,
            tenant_id: claims.tenant_id,
        })
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "missing_auth_header",
                    "Authorization header is required",
                )),
            )
        })?
        .to_str()
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "invalid_auth_header",
                    "Invalid Authorization header format",
                )),
            )
        })?;

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "invalid_auth_scheme",
                "Authorization header must use Bearer scheme",
            )),
        ));
    };

    Ok(token.trim().to_string())
}

/// Validate JWT and return the caller
pub fn validate_token(
    auth_service: &AuthService,
    token: &str,
) -> Result<AuthUser, (StatusCode, Json<ErrorResponse>)> {
    auth_service
        .jwt
        .validate_token(token)
        .and_then(AuthUser::try_from)
        .map_err(|e| {
            tracing::debug!("Token validation failed: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("invalid_token", &e.to_string())),
            )
        })
}

/// Middleware to require authentication
pub async fn require_auth(
    State(state): State<Arc<crate::AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_bearer_token(&headers)?;
    let user = validate_token(&state.auth_service, &token)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        let token = extract_bearer_token(&with_authorization("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let (status, Json(body)) = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "missing_auth_header");
    }

    #[test]
    fn test_other_schemes_are_rejected() {
        let (status, Json(body)) =
            extract_bearer_token(&with_authorization("Basic dXNlcjpwYXNz")).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "invalid_auth_scheme");
    }
}
