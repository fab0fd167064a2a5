use crate::handlers;
use crate::middleware;
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Tenant from the X-Tenant-Id header
    let public = Router::new()
        .route("/api/auth/signup", post(handlers::auth::register))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route_layer(from_fn_with_state(state.clone(), middleware::resolve_tenant))
        .route_layer(from_fn_with_state(state.clone(), middleware::rate_limit_api));

    // Layers run bottom-up: rate limit, auth, then the tenant bound into the token
    let protected = Router::new()
        .route("/api/check-auth", get(handlers::auth::check_auth))
        .route("/api/profile", get(handlers::profile::me))
        .route("/api/profile/:user_id", get(handlers::profile::get_profile))
        .route("/api/update-user", put(handlers::profile::update_user))
        .route("/api/addresses", put(handlers::address::update_address))
        .route("/api/addresses/:user_id", get(handlers::address::get_address))
        .route(
            "/api/products",
            get(handlers::product::list_products).post(handlers::product::create_product),
        )
        .route(
            "/api/products/:product_id",
            get(handlers::product::get_product)
                .put(handlers::product::update_product)
                .delete(handlers::product::delete_product),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::resolve_tenant))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .route_layer(from_fn_with_state(state.clone(), middleware::rate_limit_api));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(public)
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use consign_auth::{AuthService, JwtService};
    use consign_database::{
        DatabaseConfig, MySqlConnector, PoolConnector, TenantRegistry, TenantRegistryConfig,
    };
    use consign_models::{Role, TenantId};
    use consign_tenant::{TenantExtractor, TENANT_HEADER};
    use crate::middleware::RateLimiter;
    use std::time::Duration;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    fn app() -> Router {
        app_with_limit(100)
    }

    // Pools are lazy; none of the tested paths reaches the server
    fn app_with_limit(max_requests: u32) -> Router {
        let config = DatabaseConfig::default();
        let connector = MySqlConnector::new(&config);
        let main_pool = connector.open(&config.database, 1);

        let state = Arc::new(AppState {
            registry: TenantRegistry::new(
                connector,
                main_pool,
                TenantRegistryConfig::from(&config),
            ),
            auth_service: AuthService::new(JwtService::new(SECRET)),
            tenant_extractor: TenantExtractor::new(),
            rate_limiter: RateLimiter::new(max_requests, Duration::from_secs(900)),
            body_limit: 10 * 1024,
        });

        create_router(state)
    }

    #[tokio::test]
    async fn test_health_needs_no_tenant() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["tenants"]["cached_pools"], 0);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = app()
            .oneshot(Request::get("/api/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_tenant_header_is_rejected() {
        let request = Request::post("/api/auth/login")
            .header(TENANT_HEADER, "shop-a")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"ana","password":"secret123"}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_check_auth_with_valid_token() {
        let token = JwtService::new(SECRET)
            .generate_token(7, "ana", Role::User, &TenantId::primary())
            .unwrap();

        let request = Request::get("/api/check-auth")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let token = JwtService::new("some-other-secret")
            .generate_token(7, "ana", Role::User, &TenantId::primary())
            .unwrap();

        let request = Request::get("/api/check-auth")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_api_requests_over_the_limit_get_429() {
        let app = app_with_limit(2);
        let request = || {
            Request::get("/api/check-auth")
                .header("x-forwarded-for", "198.51.100.4")
                .body(Body::empty())
                .unwrap()
        };

        for _ in 0..2 {
            let response = app.clone().oneshot(request()).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "rate_limit_exceeded");

        // Health sits outside /api
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let password = "x".repeat(11 * 1024);
        let body = serde_json::json!({ "username": "ana", "password": password }).to_string();

        let request = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
