//! Infrastructure layer - External systems integration
//!
//! This module handles external system concerns, currently the MongoDB
//! connection shared by every request handler.

pub mod db;

pub use db::Database;
