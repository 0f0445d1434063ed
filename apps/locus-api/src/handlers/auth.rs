//! 健康检查与运维登录 handlers
//!
//! - GET /health
//! - POST /auth/token

use api_contract::{ApiResponse, LoginRequest, TokenResponse};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use locus_auth::AuthError;

use crate::AppState;
use crate::utils::response::{auth_error, internal_auth_error};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// 运维登录：校验用户名/口令并签发 access token。
///
/// 用户名不匹配与口令错误返回同一个 401，不区分原因。
pub async fn issue_token(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth.login(&req.username, &req.password) {
        Ok(tokens) => {
            let response = TokenResponse {
                access_token: tokens.access_token,
                token_type: "Bearer".to_string(),
                expires_in: tokens.expires_in,
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(AuthError::InvalidCredentials) => auth_error(StatusCode::UNAUTHORIZED),
        Err(err) => internal_auth_error(err),
    }
}
