//! Authentication handlers (login, logout, me)

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tollgate_axum::{append_set_cookies, HttpExchange, RequireSession};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Application identifier; selects the token lifetimes
    pub app: String,
    pub user_id: String,
    /// Opaque payload carried in the session
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub app: String,
    pub user_id: String,
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Attach every cookie the exchange wrote to `response`.
fn with_cookies(mut response: Response, exchange: HttpExchange<'_>) -> Response {
    append_set_cookies(response.headers_mut(), &exchange.into_set_cookies());
    response
}

/// POST /login
///
/// Issue a session cookie for the given user
pub async fn login(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    if req.app.is_empty() {
        return Err(ApiError::BadRequest("app is required".to_string()));
    }
    if req.user_id.is_empty() {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }

    let mut exchange = HttpExchange::new(&uri, &headers);
    state
        .lifecycle
        .issue(&mut exchange, &req.app, req.user_id.clone(), req.data.clone())?;

    let body = SessionInfo {
        app: req.app,
        user_id: req.user_id,
        data: req.data,
    };
    Ok(with_cookies(
        (StatusCode::OK, Json(body)).into_response(),
        exchange,
    ))
}

/// POST /logout
///
/// Clear the session cookie. Succeeds without a session.
pub async fn logout(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let mut exchange = HttpExchange::new(&uri, &headers);
    state.lifecycle.revoke(&mut exchange);

    with_cookies(Json(LogoutResponse { success: true }).into_response(), exchange)
}

/// GET /me
///
/// Return the user data carried by the current session
pub async fn me(session: RequireSession) -> Json<SessionInfo> {
    let user = session.0.into_inner();
    Json(SessionInfo {
        app: user.app,
        user_id: user.sub,
        data: user.data,
    })
}
