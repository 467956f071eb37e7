//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers (one module per business domain)
//! - Middleware (authentication, request observation)
//! - Custom extractors
//! - Route composition

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::{create_app, create_router};
pub use state::AppState;
