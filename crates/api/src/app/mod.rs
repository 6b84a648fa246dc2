//! HTTP application wiring (Axum router).
//!
//! - `routes/`: handlers, one file per resource
//! - `dto.rs`: form/query parsing into domain inputs
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use parlor_infra::Inventory;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router around a shared inventory.
pub fn build_app(inventory: Arc<Inventory>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::logging_middleware))
                .layer(Extension(inventory)),
        )
}
