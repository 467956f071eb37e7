//! Application services layer.
//!
//! Services orchestrate domain logic and infrastructure behind traits so
//! handlers and tests depend on abstractions.

mod auth_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
