//! Integration tests for the HTTP surface.
//!
//! These drive the real router through `tower::ServiceExt::oneshot` with
//! a mock auth service and a lazily-connected store pointed at an
//! unreachable address, so request-pipeline behavior (CORS, trailing
//! slashes, error envelopes, health failure) is observable without
//! infrastructure. Happy-path persistence tests require a running
//! MongoDB and live behind `#[ignore]`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use bson::oid::ObjectId;
use tower::ServiceExt;

use ccms_backend::api::create_app;
use ccms_backend::domain::{NewUser, User};
use ccms_backend::errors::{AppError, AppResult};
use ccms_backend::services::{AuthService, Claims, TokenResponse};
use ccms_backend::{AppState, Config, Database, Environment};

/// Token accepted by the mock auth service.
const VALID_TOKEN: &str = "valid-test-token";

// =============================================================================
// Mock Services for Testing
// =============================================================================

/// Mock auth service that accepts one fixed token.
struct MockAuthService {
    user_id: ObjectId,
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn register(&self, new_user: NewUser) -> AppResult<User> {
        User::create(new_user)
    }

    async fn login(&self, _username: String, _password: String) -> AppResult<TokenResponse> {
        Ok(TokenResponse {
            access_token: VALID_TOKEN.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        if token == VALID_TOKEN {
            Ok(Claims {
                sub: self.user_id.to_hex(),
                username: "resool".to_string(),
                exp: i64::MAX,
                iat: 0,
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

/// State wired to an unreachable store that fails fast, so handler
/// database errors and health failures are observable.
async fn test_state() -> AppState {
    let mut config =
        Config::for_environment(Environment::Testing).expect("test config should load");
    config.mongodb_uri =
        "mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=200&connectTimeoutMS=200".to_string();

    let database = Arc::new(
        Database::connect_lazy(&config)
            .await
            .expect("lazy connect should not touch the network"),
    );
    AppState::new(
        Arc::new(MockAuthService {
            user_id: ObjectId::new(),
        }),
        database,
    )
}

async fn send(request: Request<Body>) -> axum::response::Response {
    let app = create_app(test_state().await);
    app.oneshot(request).await.expect("infallible service")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

// =============================================================================
// CORS Contract
// =============================================================================

#[tokio::test]
async fn every_response_carries_the_cors_headers() {
    let request = Request::builder()
        .uri("/definitely-not-a-route")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .expect("request builds");

    let response = send(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
        "Content-Type,Authorization"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "GET,PUT,POST,DELETE,OPTIONS"
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn error_responses_carry_the_cors_headers_too() {
    // Auth failure (401) still exits through the observe middleware.
    let request = Request::builder()
        .uri("/api/cards")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .expect("request builds");

    let response = send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn allow_origin_is_omitted_without_an_origin_header() {
    let response = send(get("/api/transactions/categories")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
}

// =============================================================================
// Error Normalizer
// =============================================================================

#[tokio::test]
async fn unknown_routes_return_the_fixed_not_found_envelope() {
    let response = send(get("/api/nothing-here")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({ "error": "Not found" }));
}

#[tokio::test]
async fn database_failures_return_the_fixed_internal_error_envelope() {
    // Valid token, unreachable store: the handler's find fails and the
    // detail must not leak to the client.
    let request = Request::builder()
        .uri("/api/cards")
        .header(header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))
        .body(Body::empty())
        .expect("request builds");

    let response = send(request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn protected_routes_reject_missing_tokens() {
    let response = send(get("/api/cards")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_reject_invalid_tokens() {
    let request = Request::builder()
        .uri("/api/notifications")
        .header(header::AUTHORIZATION, "Bearer not-the-right-token")
        .body(Body::empty())
        .expect("request builds");

    let response = send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Trailing Slashes
// =============================================================================

#[tokio::test]
async fn trailing_slashes_resolve_to_the_same_handler() {
    let payload = serde_json::json!({
        "principal_amount": 24000.0,
        "interest_rate": 12.5,
        "tenure_months": 12,
    });

    let plain = send(post_json("/api/emis/calculator", &payload)).await;
    let slashed = send(post_json("/api/emis/calculator/", &payload)).await;
    assert_eq!(plain.status(), StatusCode::OK);
    assert_eq!(slashed.status(), StatusCode::OK);

    let plain_body = body_json(plain).await;
    let slashed_body = body_json(slashed).await;
    assert_eq!(plain_body, slashed_body);
}

#[tokio::test]
async fn trailing_slash_on_static_routes_also_resolves() {
    let response = send(get("/api/bills/types/")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Health Reporter
// =============================================================================

#[tokio::test]
async fn health_reports_unhealthy_against_an_unreachable_store() {
    let response = send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["message"], "MongoDB connection failed");
    assert!(
        !body["error"].as_str().unwrap_or_default().is_empty(),
        "failure detail should be reported"
    );
    assert!(body.get("database").is_none());
}

// Happy-path health (`database: "connected"`) and the seed utility need a
// reachable MongoDB:
//   docker run -p 27017:27017 mongo
//   cargo test -- --ignored
#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn health_reports_healthy_against_a_reachable_store() {
    let config = Config::for_environment(Environment::Testing).expect("test config should load");
    let database = Arc::new(
        Database::connect(&config)
            .await
            .expect("MongoDB should be reachable"),
    );
    let state = AppState::new(
        Arc::new(MockAuthService {
            user_id: ObjectId::new(),
        }),
        database,
    );

    let app = create_app(state);
    let response = app
        .oneshot(get("/health"))
        .await
        .expect("infallible service");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

// =============================================================================
// Public Endpoints
// =============================================================================

#[tokio::test]
async fn transaction_categories_are_public() {
    let response = send(get("/api/transactions/categories")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let categories = body["categories"].as_array().expect("categories array");
    assert!(categories.iter().any(|c| c == "groceries"));
}

#[tokio::test]
async fn bill_types_are_public() {
    let response = send(get("/api/bills/types")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["types"].as_array().is_some());
}

#[tokio::test]
async fn emi_calculator_computes_the_installment() {
    let payload = serde_json::json!({
        "principal_amount": 12000.0,
        "interest_rate": 0.0,
        "tenure_months": 12,
    });

    let response = send(post_json("/api/emis/calculator", &payload)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["emi_amount"], 1000.0);
    assert_eq!(body["total_amount"], 12000.0);
    assert_eq!(body["total_interest"], 0.0);
}

#[tokio::test]
async fn emi_calculator_rejects_invalid_tenure() {
    let payload = serde_json::json!({
        "principal_amount": 12000.0,
        "interest_rate": 10.0,
        "tenure_months": 0,
    });

    let response = send(post_json("/api/emis/calculator", &payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some());
}
