//! GET /v1/me

use axum::Json;

use crate::dto::response::{ApiResponse, IdentityResponse};
use crate::extractors::AuthUser;

/// Returns the identity the access token proved.
pub async fn me(auth: AuthUser) -> Json<ApiResponse<IdentityResponse>> {
    Json(ApiResponse::ok(auth.0.into()))
}
