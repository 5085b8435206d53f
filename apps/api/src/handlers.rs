use axum::Json;
use axum::http::StatusCode;

use crate::error::ErrorResponse;

pub mod activity;
pub mod diagnostics;
pub mod health;
pub mod products;
mod query;


/// Envelope for methods a route does not serve.
pub async fn method_not_allowed_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}
