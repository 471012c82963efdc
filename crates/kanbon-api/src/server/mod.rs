//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::Router;
use kanbon_common::{AppConfig, AppError, JwtService};
use kanbon_core::SnowflakeGenerator;
use kanbon_db::{
    create_pool, run_migrations, DatabaseConfig, PgAccountRepository, PgFieldRepository,
    PgFormRepository, PgOrganizationRepository, PgSystemMessageRepository,
};
use kanbon_service::{AuthService, LogMailer, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(Router::new()
        .merge(health_routes())
        .merge(api)
        .with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL ready");

    let service_context = ServiceContextBuilder::new()
        .account_repo(Arc::new(PgAccountRepository::new(pool.clone())))
        .system_message_repo(Arc::new(PgSystemMessageRepository::new(pool.clone())))
        .organization_repo(Arc::new(PgOrganizationRepository::new(pool.clone())))
        .form_repo(Arc::new(PgFormRepository::new(pool.clone())))
        .field_repo(Arc::new(PgFieldRepository::new(pool.clone())))
        .jwt_service(Arc::new(JwtService::from_config(&config.jwt)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .mailer(Arc::new(LogMailer))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    if let Some((email, password)) = config.bootstrap.superuser() {
        AuthService::new(&service_context)
            .ensure_superuser(email, password)
            .await?;
    }

    Ok(AppState::new(service_context, pool, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let state = create_app_state(config).await?;
    let app = create_app(state)?;
    run_server(app, &addr).await
}
