use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use parlor_infra::Inventory;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/:id/update", post(update_product))
        .route("/:id/delete", post(delete_product))
}

/// Refresh the cache, then list it. A failed refresh is logged and the last
/// good contents are served.
pub async fn list_products(
    Extension(inventory): Extension<Arc<Inventory>>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    if let Some(pattern) = query.pattern() {
        return match inventory.search_store(pattern).await {
            Ok(found) => (StatusCode::OK, Json(found)).into_response(),
            Err(e) => errors::repository_error_to_response(e),
        };
    }

    if let Err(e) = inventory.reload().await {
        tracing::warn!(error = %e, "serving cached products after failed reload");
    }
    (StatusCode::OK, Json(inventory.products())).into_response()
}

pub async fn create_product(
    Extension(inventory): Extension<Arc<Inventory>>,
    Form(form): Form<dto::ProductForm>,
) -> axum::response::Response {
    let draft = match form.into_draft() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match inventory.add_product(draft).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(inventory): Extension<Arc<Inventory>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match inventory.fetch(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product)).into_response(),
        Ok(None) => errors::not_found(format!("product {id} not found")),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(inventory): Extension<Arc<Inventory>>,
    Path(id): Path<String>,
    Form(form): Form<dto::ProductForm>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let update = match form.into_update() {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match inventory.update_product(id, update).await {
        Ok(Some(product)) => {
            (StatusCode::OK, Json(json!({ "status": "ok", "product": product }))).into_response()
        }
        Ok(None) => errors::not_found(format!("product {id} not found")),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(inventory): Extension<Arc<Inventory>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match inventory.remove_product(id).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "status": "ok", "deleted": true }))).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": "not_found", "deleted": false })),
        )
            .into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}
