//! HTTP request handlers, one module per business domain.
//!
//! Every module exposes `routes(AppState) -> Router<AppState>`; the
//! route composer treats all ten identically.

pub mod bills;
pub mod cards;
pub mod chat;
pub mod cibil;
pub mod emis;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod transactions;
pub mod users;

use bson::oid::ObjectId;

use crate::errors::{AppError, AppResult};

/// Parse a path segment as an ObjectId.
pub(crate) fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::bad_request(format!("invalid id: {id}")))
}
