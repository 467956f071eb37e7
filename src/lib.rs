//! Personal-finance management backend.
//!
//! REST endpoints for users, cards, transactions, bills, EMIs, CIBIL
//! score tracking, and notifications, backed by MongoDB.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations (`serve`, `seed`)
//! - **config**: Environment presets and application configuration
//! - **domain**: Document models and core business types
//! - **services**: Application use cases (authentication)
//! - **infra**: Infrastructure concerns (MongoDB connection)
//! - **api**: HTTP handlers, middleware, and route composition
//! - **types**: Shared types (pagination)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Seed demo data for a user
//! cargo run -- seed --username resool
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::{Config, Environment};
pub use errors::{AppError, AppResult};
pub use infra::Database;
