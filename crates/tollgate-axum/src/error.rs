//! Uniform denial response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Body message for every authentication failure
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Authentication Error: Not Authenticated";

/// Request is not authenticated.
///
/// Renders as `401` with a fixed JSON body; the underlying reason is only
/// logged, never sent.
#[derive(Debug, Clone, Copy, Default, thiserror::Error)]
#[error("not authenticated")]
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        let body = json!({
            "message": NOT_AUTHENTICATED_MESSAGE,
            "status": StatusCode::UNAUTHORIZED.as_u16(),
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
