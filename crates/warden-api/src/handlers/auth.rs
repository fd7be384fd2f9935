//! Auth handlers: login, refresh, logout, dev login.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use warden_core::types::UserIdentity;

use crate::dto::request::{DevLoginRequest, LoginRequest, LogoutRequest, RefreshRequest};
use crate::dto::response::{ApiResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let identity = state
        .credentials
        .authenticate(&req.email, &req.password)
        .await?;
    let pair = state.sessions.issue_pair(identity).await?;
    Ok(Json(ApiResponse::ok(pair.into())))
}

/// POST /v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let pair = state.sessions.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(pair.into())))
}

/// POST /v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    state.sessions.revoke_refresh(&req.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/auth/login-dev
///
/// Only mounted when `auth.dev_login_enabled` is set.
pub async fn dev_login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DevLoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let identity = UserIdentity::new(req.user_id, req.role_id);
    let pair = state.sessions.issue_pair(identity).await?;

    info!(user_id = identity.user_id, role_id = identity.role_id, "Dev login");
    Ok(Json(ApiResponse::ok(pair.into())))
}
