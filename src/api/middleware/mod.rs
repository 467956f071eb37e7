//! API middleware.

mod auth;
mod observe;

pub use auth::{auth_middleware, CurrentUser};
pub use observe::observe_middleware;
