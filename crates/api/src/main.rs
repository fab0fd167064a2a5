// Consignment API Server
// Main entry point for the multi-tenant consignment shop REST API

mod config;
mod handlers;
mod middleware;
mod routes;

use anyhow::Context;
use config::Config;
use consign_auth::{AuthService, JwtService};
use consign_database::{Database, MySqlConnector, TenantRegistry, TenantRegistryConfig};
use consign_tenant::TenantExtractor;
use dotenvy::dotenv;
use middleware::RateLimiter;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub registry: TenantRegistry,
    pub auth_service: AuthService,
    pub tenant_extractor: TenantExtractor,
    pub rate_limiter: RateLimiter,
    pub body_limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,consign_api=debug,tower_http=debug".to_string()),
        )
        .init();

    tracing::info!("Starting consignment API server");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Invalid configuration")?;
    tracing::info!("Server: {}:{}", config.server_host, config.server_port);

    // Primary database
    tracing::info!(
        "Connecting to database {} on {}:{}",
        config.database.database,
        config.database.host,
        config.database.port
    );
    let database = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    database.ping().await.context("Database ping failed")?;
    tracing::info!("Database connected");

    let registry = TenantRegistry::new(
        MySqlConnector::new(&config.database),
        database.into_pool(),
        TenantRegistryConfig::from(&config.database),
    );
    tracing::info!(
        "Tenant registry ready (prefix '{}')",
        registry.config().database_prefix
    );

    let jwt_service =
        JwtService::new(&config.jwt_secret).with_expiration_hours(config.jwt_expiration_hours);

    let state = Arc::new(AppState {
        registry,
        auth_service: AuthService::new(jwt_service),
        tenant_extractor: TenantExtractor::new(),
        rate_limiter: RateLimiter::new(config.rate_limit_max_requests, config.rate_limit_window),
        body_limit: config.body_limit_bytes,
    });

    let app = routes::create_router(state.clone())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server ready at http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Closing database pools");
    state.registry.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
