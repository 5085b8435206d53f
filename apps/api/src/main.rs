//! Back-office API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod diagnostics;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use backoffice_application::{ActivityLogService, ErrorAggregator, ProductCatalogService};
use backoffice_core::AppError;
use backoffice_infrastructure::{
    MIGRATOR, PostgresActivityLogRepository, PostgresProductRepository,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::diagnostics::DiagnosticHooks;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let error_aggregator = Arc::new(ErrorAggregator::new());
    let hooks = DiagnosticHooks::install(Arc::clone(&error_aggregator))?;
    hooks.spawn_supervised("startup-store-check", verify_store(pool.clone()));

    let app_state = AppState {
        activity_log_service: ActivityLogService::new(Arc::new(
            PostgresActivityLogRepository::new(pool.clone()),
        )),
        product_catalog_service: ProductCatalogService::new(Arc::new(
            PostgresProductRepository::new(pool.clone()),
        )),
        error_aggregator,
        pagination: config.pagination,
        postgres_pool: Some(pool),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "backoffice-api listening");

    let served = axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")));

    hooks.teardown();
    served
}

/// Confirms both catalog tables answer after migrations.
async fn verify_store(pool: PgPool) -> Result<(), AppError> {
    for statement in [
        "SELECT 1 FROM admin_activity_logs LIMIT 1",
        "SELECT 1 FROM products LIMIT 1",
    ] {
        sqlx::query(statement)
            .fetch_optional(&pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("store check '{statement}' failed: {error}"))
            })?;
    }

    Ok(())
}
