//! Request gate middleware.

use axum::extract::{OriginalUri, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// Admits the request through the [`RequestGate`](warden_auth::RequestGate)
/// and attaches the caller's `UserIdentity` as a request extension.
///
/// Policy rules name full paths, so the path checked is the original URI
/// even when the route is nested.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().as_str().to_string();
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let identity = state
        .gate
        .admit(authorization.as_deref(), &path, &method)
        .await?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
