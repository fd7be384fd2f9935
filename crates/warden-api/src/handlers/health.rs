//! Health check handlers.

use axum::Json;
use axum::extract::State;

use warden_core::error::{AppError, ErrorKind};

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::error::ApiError;
use crate::state::AppState;

fn ok() -> HealthResponse {
    HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// GET /livez
pub async fn livez() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(ok()))
}

/// GET /readyz
///
/// Ready once both the session store and the policy rule source answer.
pub async fn readyz(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let store = state.sessions.store().health_check().await;
    require_healthy("Session store", store)?;

    let rules = state.enforcer.source_health().await;
    require_healthy("Policy rule source", rules)?;

    Ok(Json(ApiResponse::ok(ok())))
}

fn require_healthy(dependency: &str, check: Result<bool, AppError>) -> Result<(), AppError> {
    match check {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::service_unavailable(format!("{dependency} unhealthy"))),
        Err(e) => Err(AppError::with_source(
            ErrorKind::ServiceUnavailable,
            format!("{dependency} unreachable"),
            e,
        )),
    }
}
