use axum::Router;

pub mod inventory;
pub mod products;
pub mod system;

/// Router for every inventory endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/inventory", inventory::router())
}
