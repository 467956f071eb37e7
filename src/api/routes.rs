//! Application route configuration.

use std::any::Any;
use std::time::Duration;

use axum::{
    extract::State, http::StatusCode, middleware, response::IntoResponse, response::Json,
    routing::get, Router,
};
use serde::Serialize;
use serde_json::json;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::observe_middleware;
use super::AppState;
use crate::config::HEALTH_PROBE_TIMEOUT_SECS;
use crate::errors::AppError;

/// A domain registration function: takes the shared state (for
/// route-level middleware) and returns the domain's router.
type DomainRoutes = fn(AppState) -> Router<AppState>;

/// Domain route table. Prefixes are disjoint, so order only affects the
/// startup log.
const DOMAIN_ROUTES: [(&str, DomainRoutes); 10] = [
    ("/api/users", handlers::users::routes),
    ("/api/products", handlers::products::routes),
    ("/api/orders", handlers::orders::routes),
    ("/api/chat", handlers::chat::routes),
    ("/api/cards", handlers::cards::routes),
    ("/api/transactions", handlers::transactions::routes),
    ("/api/bills", handlers::bills::routes),
    ("/api/emis", handlers::emis::routes),
    ("/api/cibil", handlers::cibil::routes),
    ("/api/notifications", handlers::notifications::routes),
];

/// Create the application router with all domain routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new().route("/health", get(health));

    for (prefix, routes) in DOMAIN_ROUTES {
        tracing::info!(prefix, "mounting domain routes");
        router = router.nest(prefix, routes(state.clone()));
    }

    // Layer order: the last layer added sees the request first, so the
    // observe middleware wraps the panic guard and always stamps CORS
    // headers, even on error responses.
    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(observe_middleware))
        .with_state(state)
}

/// Wrap the router so `/api/users/1` and `/api/users/1/` resolve to the
/// same handler. Normalization must happen before route matching, which
/// is why the layer wraps the whole `Router` instead of being added via
/// `Router::layer`.
pub fn create_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(state))
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint: actively pings MongoDB under a bounded timeout.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let probe = tokio::time::timeout(
        Duration::from_secs(HEALTH_PROBE_TIMEOUT_SECS),
        state.database.ping(),
    )
    .await;

    let error = match probe {
        Ok(Ok(())) => {
            return (
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy",
                    message: "Backend with MongoDB is running",
                    database: Some("connected"),
                    error: None,
                }),
            );
        }
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("ping timed out after {HEALTH_PROBE_TIMEOUT_SECS}s"),
    };

    tracing::error!(category = "health_check", error = %error, "MongoDB ping failed");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(HealthResponse {
            status: "unhealthy",
            message: "MongoDB connection failed",
            database: None,
            error: Some(error),
        }),
    )
}

/// Fallback for unmatched routes. Expected traffic, so not logged as an
/// error.
async fn not_found() -> AppError {
    AppError::NotFound
}

/// Convert a caught handler panic into the uniform 500 envelope; the
/// panic detail goes to the log only.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(category = "panic", error = %detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
