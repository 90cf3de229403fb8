//! rolegate API composition root.

#![forbid(unsafe_code)]

mod admin_permission;
mod api_config;
mod api_router;
mod api_services;
mod auth;
mod bootstrap;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use rolegate_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{
    build_memory_session_layer, build_memory_state, build_postgres_session_layer,
    build_postgres_state, connect_and_migrate,
};
use crate::bootstrap::bootstrap_access;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        connect_and_migrate(required_database_url(&config)?).await?;
        info!("database migrations applied successfully");
        return Ok(());
    }

    let app = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_and_migrate(required_database_url(&config)?).await?;
            let app_state = build_postgres_state(pool.clone());
            bootstrap_access(
                &app_state,
                config.root_role_name.as_str(),
                config.bootstrap_admin.as_ref(),
            )
            .await?;

            let session_layer = build_postgres_session_layer(pool, config.cookie_secure).await?;
            build_router(app_state, config.frontend_url.as_str(), session_layer)?
        }
        StorageBackend::Memory => {
            let app_state = build_memory_state();
            bootstrap_access(
                &app_state,
                config.root_role_name.as_str(),
                config.bootstrap_admin.as_ref(),
            )
            .await?;

            let session_layer = build_memory_session_layer(config.cookie_secure);
            build_router(app_state, config.frontend_url.as_str(), session_layer)?
        }
    };

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, storage = ?config.storage_backend, "rolegate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn required_database_url(config: &ApiConfig) -> Result<&str, AppError> {
    config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))
}
