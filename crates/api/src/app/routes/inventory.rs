use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use parlor_infra::Inventory;

use crate::app::errors;

pub fn router() -> Router {
    Router::new()
        .route("/summary", get(summary))
        .route("/reload", post(reload))
}

/// Totals over the cached inventory. Does not touch the store.
pub async fn summary(Extension(inventory): Extension<Arc<Inventory>>) -> axum::response::Response {
    (StatusCode::OK, Json(inventory.summary())).into_response()
}

pub async fn reload(Extension(inventory): Extension<Arc<Inventory>>) -> axum::response::Response {
    match inventory.reload().await {
        Ok(count) => (StatusCode::OK, Json(json!({ "status": "ok", "products": count }))).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}
