//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `seed`  - Populate fixture data for one user

pub mod args;

pub use args::{Cli, Commands};
