//! Application state - dependency injection container.
//!
//! Carries the process-wide configuration and the shared database
//! handle into every handler, instead of ambient module-level globals.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, Authenticator};

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Shared MongoDB handle
    pub database: Arc<Database>,
}

impl AppState {
    /// Build state from an established connection and the loaded config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let auth_service = Arc::new(Authenticator::new(database.clone(), config));
        Self {
            auth_service,
            database,
        }
    }

    /// Build state with a manually injected auth service (used by tests).
    pub fn new(auth_service: Arc<dyn AuthService>, database: Arc<Database>) -> Self {
        Self {
            auth_service,
            database,
        }
    }
}
