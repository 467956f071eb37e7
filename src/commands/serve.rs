//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;

use crate::api::{create_app, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!(environment = %config.environment, "starting server");

    // Connect before serving anything; a broken store fails the boot.
    let db = Arc::new(Database::connect(&config).await?);

    let app_state = AppState::from_config(db, config);
    let app = create_app(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Server running on http://{addr}");
    tracing::info!("Health check: http://{addr}/health");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}
