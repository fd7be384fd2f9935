//! Policy administration handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use warden_auth::rbac::ScheduleOutcome;
use warden_core::error::AppError;

use crate::dto::response::{ApiResponse, PolicyStatusResponse, ReloadResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /v1/policy
pub async fn status(State(state): State<AppState>) -> Json<ApiResponse<PolicyStatusResponse>> {
    let stats = state.reloader.stats();
    Json(ApiResponse::ok(PolicyStatusResponse {
        generation: state.enforcer.generation(),
        rules: state.enforcer.rule_count().await,
        reloads_completed: stats.completed(),
        reloads_failed: stats.failed(),
    }))
}

/// POST /v1/policy/reload
///
/// Queues a reload and returns without waiting for it.
pub async fn reload(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<ApiResponse<ReloadResponse>>), ApiError> {
    let reason = format!("requested by user {}", auth.user_id);

    let outcome = match state.reloader.schedule(reason) {
        ScheduleOutcome::Queued => "queued",
        ScheduleOutcome::Coalesced => "coalesced",
        ScheduleOutcome::Closed => {
            return Err(AppError::service_unavailable("Policy reload worker is not running").into());
        }
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(ReloadResponse {
            outcome: outcome.to_string(),
        })),
    ))
}
