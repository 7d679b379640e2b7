//! REST API implementation.

use axum::Router;

pub mod greeting_api;

/// Constructs the REST API routes.
pub fn api() -> Router {
    Router::new().merge(greeting_api::routes())
}
