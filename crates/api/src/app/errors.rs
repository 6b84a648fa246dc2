use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use parlor_core::DomainError;
use parlor_infra::RepositoryError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    match err {
        RepositoryError::Validation(e) => domain_error_to_response(e),
        RepositoryError::Persistence(msg) => {
            tracing::error!(error = %msg, "request failed in the product store");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", msg)
        }
    }
}

pub fn not_found(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", message)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
